use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

use crate::heatpump::Violation;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_SELECT_MODEL: &str = "main_menu.select_model";
    pub const MAIN_MENU_SET_POWER: &str = "main_menu.set_power";
    pub const MAIN_MENU_TOGGLE_ZONE: &str = "main_menu.toggle_zone";
    pub const MAIN_MENU_CIRCUIT: &str = "main_menu.circuit";
    pub const MAIN_MENU_DHW: &str = "main_menu.dhw";
    pub const MAIN_MENU_SUMMARY: &str = "main_menu.summary";
    pub const MAIN_MENU_DIAGRAM: &str = "main_menu.diagram";
    pub const MAIN_MENU_SAVE: &str = "main_menu.save";
    pub const MAIN_MENU_LOAD: &str = "main_menu.load";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const PROMPT_SELECT: &str = "prompt.select";
    pub const PROMPT_POWER: &str = "prompt.power";
    pub const PROMPT_RECORD_ID: &str = "prompt.record_id";
    pub const PROMPT_OUTPUT_FILE: &str = "prompt.output_file";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const STATUS_MODEL: &str = "status.model";
    pub const STATUS_NONE: &str = "status.none";
    pub const STATUS_POWER: &str = "status.power";
    pub const STATUS_ZONES: &str = "status.zones";
    pub const STATUS_CIRCUIT: &str = "status.circuit";
    pub const STATUS_DHW: &str = "status.dhw";
    pub const STATUS_ON: &str = "status.on";
    pub const STATUS_OFF: &str = "status.off";

    pub const CHANGE_ACCEPTED: &str = "change.accepted";
    pub const CHANGE_REJECTED: &str = "change.rejected";

    pub const SUMMARY_BUFFER: &str = "summary.buffer";
    pub const SUMMARY_EXPANSION: &str = "summary.expansion";
    pub const SUMMARY_MANDATORY: &str = "summary.mandatory";
    pub const SUMMARY_OPTIONAL: &str = "summary.optional";
    pub const SUMMARY_VALID: &str = "summary.valid";
    pub const SUMMARY_INVALID: &str = "summary.invalid";

    pub const DIAGRAM_WRITTEN: &str = "diagram.written";
    pub const DIAGRAM_BLOCKED: &str = "diagram.blocked";
    pub const STORE_SAVED: &str = "store.saved";
    pub const STORE_LOADED: &str = "store.loaded";
    pub const STORE_EMPTY: &str = "store.empty";
    pub const STORE_AVAILABLE: &str = "store.available";

    pub const SETTINGS_CURRENT_LANGUAGE: &str = "settings.current_language";
    pub const SETTINGS_PROMPT_LANGUAGE: &str = "settings.prompt_language";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const VIOLATION_MODEL_NOT_SELECTED: &str = "violation.model_not_selected";
    pub const VIOLATION_TOO_MANY_ZONES: &str = "violation.too_many_zones";
    pub const VIOLATION_TEMPERATURE: &str = "violation.supply_temperature_too_low";
    pub const VIOLATION_SAFETY_COMPONENT: &str = "violation.missing_safety_component";
    pub const VIOLATION_CIRCUIT_COMPONENT: &str = "violation.missing_circuit_component";
    pub const VIOLATION_ZONE_COMPONENT: &str = "violation.missing_zone_component";
    pub const VIOLATION_POWER: &str = "violation.heating_power_not_positive";

    pub const CATALOG_MODELS: &str = "catalog.models";
    pub const CATALOG_ZONE_TYPES: &str = "catalog.zone_types";
    pub const CATALOG_COMPONENTS: &str = "catalog.components";
    pub const CATALOG_CIRCUITS: &str = "catalog.circuits";
    pub const CATALOG_MODEL_LIMITS: &str = "catalog.model_limits";
    pub const CATALOG_MODEL_CHOICE: &str = "catalog.model_choice";
    pub const CATALOG_HIGH_TEMPERATURE: &str = "catalog.high_temperature";
    pub const CATALOG_FLOOR_HEATING: &str = "catalog.floor_heating";
    pub const CATALOG_RADIATORS: &str = "catalog.radiators";
    pub const CATALOG_REQUIRES: &str = "catalog.requires";
    pub const CATALOG_REQUIRED: &str = "catalog.required";
    pub const CATALOG_POSITION_INPUT: &str = "catalog.position_input";
    pub const CATALOG_POSITION_OUTPUT: &str = "catalog.position_output";
    pub const CATALOG_POSITION_CIRCUIT: &str = "catalog.position_circuit";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Fr,
    Ko,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("fr") {
            Language::Fr
        } else if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Ko => "ko",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(en/fr/ko)에 따라 내장 언어팩으로 번역기를 생성한다. 알 수 없는 코드는 en.
    pub fn new(lang_code: &str) -> Self {
        Self::new_with_pack(lang_code, None)
    }

    /// 언어 코드 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// 디렉터리에 해당 파일이 없으면 내장 언어팩을 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let lang = Language::from_code(lang_code);
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang.as_code()))
            .or_else(|| built_in_pack(lang));
        Self { lang, overrides }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 번역을 가져온다. 언어팩에 없으면 영어 문자열로 폴백한다.
    pub fn t(&self, key: &str) -> String {
        self.overrides
            .as_ref()
            .and_then(|m| m.get(key).cloned())
            .or_else(|| en(key).map(str::to_string))
            .unwrap_or_else(|| format!("[{key}]"))
    }

    /// `{name}` 형태의 자리표시자를 채운 번역을 반환한다.
    pub fn tf(&self, key: &str, vars: &[(&str, String)]) -> String {
        fill_template(&self.t(key), vars)
    }

    /// 위반 항목을 현재 언어로 표시한다.
    /// 언어팩에 템플릿이 없으면(영어 포함) 위반의 기본 메시지를 쓴다.
    pub fn violation(&self, violation: &Violation) -> String {
        use keys::*;
        let (key, vars): (&str, Vec<(&str, String)>) = match violation {
            Violation::ModelNotSelected => (VIOLATION_MODEL_NOT_SELECTED, Vec::new()),
            Violation::TooManyZones { limit, count } => (
                VIOLATION_TOO_MANY_ZONES,
                vec![("count", count.to_string()), ("limit", limit.to_string())],
            ),
            Violation::SupplyTemperatureTooLow {
                zone_type,
                model_max,
                zone_min,
            } => (
                VIOLATION_TEMPERATURE,
                vec![
                    ("zone_type", zone_type.clone()),
                    ("model_max", model_max.to_string()),
                    ("zone_min", zone_min.to_string()),
                ],
            ),
            Violation::MissingSafetyComponent { name, .. } => {
                (VIOLATION_SAFETY_COMPONENT, vec![("name", name.clone())])
            }
            Violation::MissingCircuitComponent { name, circuit, .. } => (
                VIOLATION_CIRCUIT_COMPONENT,
                vec![("name", name.clone()), ("circuit", circuit.to_string())],
            ),
            Violation::MissingZoneComponent {
                zone_type, name, ..
            } => (
                VIOLATION_ZONE_COMPONENT,
                vec![("name", name.clone()), ("zone_type", zone_type.clone())],
            ),
            Violation::HeatingPowerNotPositive => (VIOLATION_POWER, Vec::new()),
        };
        match self.overrides.as_ref().and_then(|m| m.get(key)) {
            Some(template) => fill_template(template, &vars),
            None => violation.to_string(),
        }
    }
}

fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("{{{k}}}"), v);
    }
    out
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("en") => Some("en".into()),
        other if other.starts_with("fr") => Some("fr".into()),
        other if other.starts_with("ko") => Some("ko".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    get_locale()
        .and_then(|loc| normalize_locale_string(&loc))
        .or_else(|| {
            ["LC_ALL", "LANG"]
                .iter()
                .filter_map(|var| std::env::var(var).ok())
                .find_map(|v| normalize_locale_string(&v))
        })
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default();
    normalize_lang(lang)
}

/// TOML 기반 언어팩을 로드한다. 형식: 섹션/키로 구성된 문자열 테이블.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let path = Path::new(dir).join(format!("{lang}.toml"));
    let content = fs::read_to_string(path).ok()?;
    parse_toml_to_map(&content)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// 내장 언어팩(파일이 없어도 동작하도록 빌드 시 포함). 영어는 `en()`이 담당한다.
fn built_in_pack(lang: Language) -> Option<HashMap<String, String>> {
    match lang {
        Language::Fr => parse_toml_to_map(include_str!("../locales/fr.toml")),
        Language::Ko => parse_toml_to_map(include_str!("../locales/ko.toml")),
        Language::En => None,
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting configurator.",
        MAIN_MENU_TITLE => "\n=== Nextherm Configurator ===",
        MAIN_MENU_SELECT_MODEL => "1) Select heat pump model",
        MAIN_MENU_SET_POWER => "2) Set heating power",
        MAIN_MENU_TOGGLE_ZONE => "3) Add/remove zone",
        MAIN_MENU_CIRCUIT => "4) Circuit type",
        MAIN_MENU_DHW => "5) Domestic hot water on/off",
        MAIN_MENU_SUMMARY => "6) Sizing summary",
        MAIN_MENU_DIAGRAM => "7) Export diagram",
        MAIN_MENU_SAVE => "8) Save configuration",
        MAIN_MENU_LOAD => "9) Load configuration",
        MAIN_MENU_SETTINGS => "10) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        PROMPT_SELECT => "Select: ",
        PROMPT_POWER => "Heating power [kW]: ",
        PROMPT_RECORD_ID => "Record id: ",
        PROMPT_OUTPUT_FILE => "Output file (enter = diagram.json): ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        STATUS_MODEL => "Model:",
        STATUS_NONE => "(none)",
        STATUS_POWER => "Power:",
        STATUS_ZONES => "Zones:",
        STATUS_CIRCUIT => "Circuit:",
        STATUS_DHW => "DHW:",
        STATUS_ON => "on",
        STATUS_OFF => "off",
        CHANGE_ACCEPTED => "Change applied.",
        CHANGE_REJECTED => "Change rejected, previous configuration kept:",
        SUMMARY_BUFFER => "Buffer tank: {litres} L",
        SUMMARY_EXPANSION => "Expansion tank: {litres} L",
        SUMMARY_MANDATORY => "Mandatory components:",
        SUMMARY_OPTIONAL => "Optional components:",
        SUMMARY_VALID => "Configuration is valid.",
        SUMMARY_INVALID => "Configuration has problems:",
        DIAGRAM_WRITTEN => "Diagram written to {path}",
        DIAGRAM_BLOCKED => "Diagram not generated, fix these problems first:",
        STORE_SAVED => "Saved as {id}",
        STORE_LOADED => "Loaded {id}",
        STORE_EMPTY => "No saved configurations.",
        STORE_AVAILABLE => "Saved configurations:",
        SETTINGS_CURRENT_LANGUAGE => "Current language: {lang}",
        SETTINGS_PROMPT_LANGUAGE => "Language (en/fr/ko, enter to cancel): ",
        SETTINGS_SAVED => "Language changed to {lang}",
        CATALOG_MODELS => "Models:",
        CATALOG_ZONE_TYPES => "Zone types:",
        CATALOG_COMPONENTS => "Components:",
        CATALOG_CIRCUITS => "Circuits:",
        CATALOG_MODEL_LIMITS => "zones <= {max_zones}, max {max_temp} °C",
        CATALOG_MODEL_CHOICE => "{name} ({max_zones} zones, {max_temp} °C)",
        CATALOG_HIGH_TEMPERATURE => "high temperature",
        CATALOG_FLOOR_HEATING => "floor heating",
        CATALOG_RADIATORS => "radiators",
        CATALOG_REQUIRES => "requires",
        CATALOG_REQUIRED => "required",
        CATALOG_POSITION_INPUT => "input",
        CATALOG_POSITION_OUTPUT => "output",
        CATALOG_POSITION_CIRCUIT => "circuit",
        _ => return None,
    })
}
