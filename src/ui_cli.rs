use std::io::{self, Write};

use crate::app::AppError;
use crate::heatpump::{
    Catalog, CircuitType, ComponentPosition, SizingSummary, SystemConfiguration, Violation,
};
use crate::i18n::{keys, Translator};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SelectModel,
    SetPower,
    ToggleZone,
    Circuit,
    Dhw,
    Summary,
    Diagram,
    Save,
    Load,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    for key in [
        keys::MAIN_MENU_TITLE,
        keys::MAIN_MENU_SELECT_MODEL,
        keys::MAIN_MENU_SET_POWER,
        keys::MAIN_MENU_TOGGLE_ZONE,
        keys::MAIN_MENU_CIRCUIT,
        keys::MAIN_MENU_DHW,
        keys::MAIN_MENU_SUMMARY,
        keys::MAIN_MENU_DIAGRAM,
        keys::MAIN_MENU_SAVE,
        keys::MAIN_MENU_LOAD,
        keys::MAIN_MENU_SETTINGS,
        keys::MAIN_MENU_EXIT,
    ] {
        println!("{}", tr.t(key));
    }
    loop {
        let sel = read_line(&tr.t(keys::PROMPT_MENU_SELECT))?;
        let choice = match sel.trim() {
            "1" => MenuChoice::SelectModel,
            "2" => MenuChoice::SetPower,
            "3" => MenuChoice::ToggleZone,
            "4" => MenuChoice::Circuit,
            "5" => MenuChoice::Dhw,
            "6" => MenuChoice::Summary,
            "7" => MenuChoice::Diagram,
            "8" => MenuChoice::Save,
            "9" => MenuChoice::Load,
            "10" => MenuChoice::Settings,
            "0" => MenuChoice::Exit,
            _ => {
                println!("{}", tr.t(keys::INVALID_SELECTION_RETRY));
                continue;
            }
        };
        return Ok(choice);
    }
}

/// 현재 구성 상태를 한 블록으로 출력한다.
pub fn print_status(tr: &Translator, catalog: &Catalog, config: &SystemConfiguration) {
    let model = catalog
        .model(&config.pac_type)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| tr.t(keys::STATUS_NONE));
    let zones = if config.zones.is_empty() {
        tr.t(keys::STATUS_NONE)
    } else {
        config
            .zones
            .iter()
            .map(|z| z.zone_type.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let dhw = if config.has_dhw() {
        tr.t(keys::STATUS_ON)
    } else {
        tr.t(keys::STATUS_OFF)
    };
    println!();
    println!("{} {model}", tr.t(keys::STATUS_MODEL));
    println!("{} {:.1} kW", tr.t(keys::STATUS_POWER), config.heating_power);
    println!("{} {zones}", tr.t(keys::STATUS_ZONES));
    println!("{} {}", tr.t(keys::STATUS_CIRCUIT), config.circuit_type);
    println!("{} {dhw}", tr.t(keys::STATUS_DHW));
}

/// 모델 목록에서 하나를 고른다. 엔터만 누르면 None.
pub fn choose_model(tr: &Translator, catalog: &Catalog) -> Result<Option<String>, AppError> {
    let labels: Vec<String> = catalog
        .models()
        .iter()
        .map(|m| {
            tr.tf(
                keys::CATALOG_MODEL_CHOICE,
                &[
                    ("name", m.name.clone()),
                    ("max_zones", m.max_zones.to_string()),
                    ("max_temp", m.max_supply_temp.to_string()),
                ],
            )
        })
        .collect();
    Ok(choose_index(tr, &labels)?.map(|i| catalog.models()[i].id.clone()))
}

pub fn choose_zone_type(tr: &Translator, catalog: &Catalog) -> Result<Option<String>, AppError> {
    let labels: Vec<String> = catalog
        .zone_types()
        .iter()
        .map(|z| format!("{} [{}]", z.name, z.id))
        .collect();
    Ok(choose_index(tr, &labels)?.map(|i| catalog.zone_types()[i].id.clone()))
}

pub fn choose_circuit(tr: &Translator) -> Result<Option<CircuitType>, AppError> {
    let labels: Vec<String> = CircuitType::ALL.iter().map(|c| c.to_string()).collect();
    Ok(choose_index(tr, &labels)?.map(|i| CircuitType::ALL[i]))
}

fn choose_index(tr: &Translator, labels: &[String]) -> Result<Option<usize>, AppError> {
    for (i, label) in labels.iter().enumerate() {
        println!("{}) {label}", i + 1);
    }
    loop {
        let sel = read_line(&tr.t(keys::PROMPT_SELECT))?;
        let sel = sel.trim();
        if sel.is_empty() {
            return Ok(None);
        }
        match sel.parse::<usize>() {
            Ok(n) if (1..=labels.len()).contains(&n) => return Ok(Some(n - 1)),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 카탈로그 전체(모델/존 타입/부품/회로)를 현재 언어로 나열한다.
pub fn print_catalog(tr: &Translator, catalog: &Catalog) {
    println!("{}", tr.t(keys::CATALOG_MODELS));
    for m in catalog.models() {
        let mut flags = Vec::new();
        if m.high_temperature {
            flags.push(tr.t(keys::CATALOG_HIGH_TEMPERATURE));
        }
        if m.supports_floor_heating {
            flags.push(tr.t(keys::CATALOG_FLOOR_HEATING));
        }
        if m.supports_radiators {
            flags.push(tr.t(keys::CATALOG_RADIATORS));
        }
        let limits = tr.tf(
            keys::CATALOG_MODEL_LIMITS,
            &[
                ("max_zones", m.max_zones.to_string()),
                ("max_temp", m.max_supply_temp.to_string()),
            ],
        );
        println!("  {:<16} {:<32} {limits} [{}]", m.id, m.name, flags.join(", "));
    }
    println!("{}", tr.t(keys::CATALOG_ZONE_TYPES));
    for z in catalog.zone_types() {
        println!(
            "  {:<20} {:<32} {} [{}]",
            z.id,
            z.name,
            tr.t(keys::CATALOG_REQUIRES),
            z.required_components.join(", ")
        );
    }
    println!("{}", tr.t(keys::CATALOG_COMPONENTS));
    for c in catalog.components() {
        let position = match c.position {
            ComponentPosition::Input => tr.t(keys::CATALOG_POSITION_INPUT),
            ComponentPosition::Output => tr.t(keys::CATALOG_POSITION_OUTPUT),
            ComponentPosition::Circuit => tr.t(keys::CATALOG_POSITION_CIRCUIT),
        };
        let required = if c.required {
            format!(" ({})", tr.t(keys::CATALOG_REQUIRED))
        } else {
            String::new()
        };
        println!("  {:<16} {:<28} {position}{required}", c.id, c.name);
    }
    println!("{}", tr.t(keys::CATALOG_CIRCUITS));
    for circuit in CircuitType::ALL {
        println!(
            "  {:<10} {} [{}]",
            circuit.as_str(),
            tr.t(keys::CATALOG_REQUIRES),
            catalog.circuit_requirements(circuit).join(", ")
        );
    }
}

pub fn print_violations(tr: &Translator, violations: &[Violation]) {
    for v in violations {
        println!("  - {}", tr.violation(v));
    }
}

pub fn print_summary(tr: &Translator, summary: &SizingSummary) {
    println!();
    println!("{} - {:.1} kW", summary.model_name, summary.heating_power_kw);
    if let Some(litres) = summary.buffer_tank_l {
        println!("{}", tr.tf(keys::SUMMARY_BUFFER, &[("litres", format!("{litres:.0}"))]));
    }
    println!(
        "{}",
        tr.tf(
            keys::SUMMARY_EXPANSION,
            &[("litres", format!("{:.0}", summary.expansion_tank_l))]
        )
    );
    println!("{}", tr.t(keys::SUMMARY_MANDATORY));
    for line in &summary.mandatory {
        let specs = line
            .specs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        if specs.is_empty() {
            println!("  - {}", line.name);
        } else {
            println!("  - {} ({specs})", line.name);
        }
    }
    println!("{} {}", tr.t(keys::SUMMARY_OPTIONAL), summary.optional.join(", "));
    if summary.is_accepted() {
        println!("{}", tr.t(keys::SUMMARY_VALID));
    } else {
        println!("{}", tr.t(keys::SUMMARY_INVALID));
        print_violations(tr, &summary.violations);
    }
}

pub fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Err(AppError::InputClosed);
    }
    Ok(buf)
}

pub fn read_f64(tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        match s.trim().replace(',', ".").parse::<f64>() {
            Ok(v) if v.is_finite() => return Ok(v),
            _ => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}
