use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigError};
use crate::heatpump::{
    self, ApplyError, Catalog, CatalogError, ConfigurationError, DhwConfig, Mutation,
    SummaryError, SystemConfiguration,
};
use crate::i18n::{self, keys, Translator};
use crate::store::{ConfigurationStore, StoreError};
use crate::ui_cli::{self, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 파일/콘솔 입출력 오류
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// 표준 입력이 닫힘(EOF)
    #[error("input closed")]
    InputClosed,
}

/// 대화형 세션 상태. 현재 구성은 항상 마지막으로 수락된 구성이다.
pub struct Session<'a, S: ConfigurationStore> {
    pub catalog: &'a Catalog,
    pub store: S,
    pub tr: Translator,
    pub config: Config,
    /// 설정 변경 시 저장할 경로
    pub config_path: PathBuf,
    pub current: SystemConfiguration,
}

impl<'a, S: ConfigurationStore> Session<'a, S> {
    pub fn new(
        catalog: &'a Catalog,
        store: S,
        tr: Translator,
        config: Config,
        config_path: PathBuf,
    ) -> Self {
        let mut current = SystemConfiguration {
            heating_power: config.default_heating_power_kw,
            ..SystemConfiguration::default()
        };
        heatpump::refresh(catalog, &mut current);
        Self {
            catalog,
            store,
            tr,
            config,
            config_path,
            current,
        }
    }

    /// 변경을 시도하고, 거부되면 위반을 출력한 뒤 이전 구성을 유지한다.
    /// 수락되면 true.
    pub fn apply(&mut self, mutation: Mutation) -> Result<bool, AppError> {
        match heatpump::try_apply(self.catalog, &self.current, mutation) {
            Ok(next) => {
                self.current = next;
                println!("{}", self.tr.t(keys::CHANGE_ACCEPTED));
                Ok(true)
            }
            Err(ApplyError::Rejected(violations)) => {
                println!("{}", self.tr.t(keys::CHANGE_REJECTED));
                ui_cli::print_violations(&self.tr, &violations);
                Ok(false)
            }
            Err(ApplyError::Malformed(e)) => Err(e.into()),
        }
    }

    /// 검증을 통과한 경우에만 다이어그램을 파일로 쓴다.
    pub fn export_diagram(&self, path: &Path) -> Result<bool, AppError> {
        let violations = heatpump::validate(self.catalog, &self.current)?;
        if !violations.is_empty() {
            println!("{}", self.tr.t(keys::DIAGRAM_BLOCKED));
            ui_cli::print_violations(&self.tr, &violations);
            return Ok(false);
        }
        let diagram = heatpump::project(self.catalog, &self.current);
        fs::write(path, diagram.to_json_pretty()?)?;
        tracing::info!(path = %path.display(), nodes = diagram.nodes.len(), "diagram exported");
        println!(
            "{}",
            self.tr
                .tf(keys::DIAGRAM_WRITTEN, &[("path", path.display().to_string())])
        );
        Ok(true)
    }

    pub fn save(&self, id: &str) -> Result<(), AppError> {
        self.store.save(id, &self.current)?;
        println!("{}", self.tr.tf(keys::STORE_SAVED, &[("id", id.to_string())]));
        Ok(())
    }

    /// 저장된 레코드를 불러와 부품 목록을 다시 도출한다.
    pub fn load(&mut self, id: &str) -> Result<(), AppError> {
        let mut record = self.store.load(id)?;
        record.check_well_formed(self.catalog)?;
        heatpump::refresh(self.catalog, &mut record);
        self.current = record;
        println!("{}", self.tr.tf(keys::STORE_LOADED, &[("id", id.to_string())]));
        Ok(())
    }

    fn handle(&mut self, choice: MenuChoice) -> Result<(), AppError> {
        let tr = self.tr.clone();
        match choice {
            MenuChoice::SelectModel => {
                if let Some(id) = ui_cli::choose_model(&tr, self.catalog)? {
                    self.apply(Mutation::SelectModel(id))?;
                }
            }
            MenuChoice::SetPower => {
                let kw = ui_cli::read_f64(&tr, &tr.t(keys::PROMPT_POWER))?;
                self.apply(Mutation::SetHeatingPower(kw))?;
            }
            MenuChoice::ToggleZone => {
                if let Some(zone) = ui_cli::choose_zone_type(&tr, self.catalog)? {
                    self.apply(Mutation::ToggleZone(zone))?;
                }
            }
            MenuChoice::Circuit => {
                if let Some(circuit) = ui_cli::choose_circuit(&tr)? {
                    self.apply(Mutation::SetCircuitType(circuit))?;
                }
            }
            MenuChoice::Dhw => {
                let dhw = if self.current.has_dhw() {
                    None
                } else {
                    Some(DhwConfig::default())
                };
                self.apply(Mutation::SetDhw(dhw))?;
            }
            MenuChoice::Summary => match heatpump::summarize(self.catalog, &self.current) {
                Ok(summary) => ui_cli::print_summary(&tr, &summary),
                Err(SummaryError::Sizing(_)) => {
                    println!("{}", tr.t(keys::SUMMARY_INVALID));
                    ui_cli::print_violations(&tr, &heatpump::validate(self.catalog, &self.current)?);
                }
                Err(e) => return Err(e.into()),
            },
            MenuChoice::Diagram => {
                let input = ui_cli::read_line(&tr.t(keys::PROMPT_OUTPUT_FILE))?;
                let path = match input.trim() {
                    "" => "diagram.json",
                    p => p,
                };
                self.export_diagram(Path::new(path))?;
            }
            MenuChoice::Save => {
                let id = ui_cli::read_line(&tr.t(keys::PROMPT_RECORD_ID))?;
                self.save(id.trim())?;
            }
            MenuChoice::Load => {
                let ids = self.store.list()?;
                if ids.is_empty() {
                    println!("{}", tr.t(keys::STORE_EMPTY));
                    return Ok(());
                }
                println!("{} {}", tr.t(keys::STORE_AVAILABLE), ids.join(", "));
                let id = ui_cli::read_line(&tr.t(keys::PROMPT_RECORD_ID))?;
                self.load(id.trim())?;
            }
            MenuChoice::Settings => {
                println!(
                    "{}",
                    tr.tf(
                        keys::SETTINGS_CURRENT_LANGUAGE,
                        &[("lang", tr.language_code().to_string())]
                    )
                );
                let input = ui_cli::read_line(&tr.t(keys::SETTINGS_PROMPT_LANGUAGE))?;
                if !input.trim().is_empty() {
                    let lang = i18n::resolve_language(input.trim(), None);
                    self.tr = Translator::new_with_pack(&lang, self.config.lang_pack_dir.as_deref());
                    self.config.language = lang.clone();
                    self.config.save_to(&self.config_path)?;
                    println!("{}", self.tr.tf(keys::SETTINGS_SAVED, &[("lang", lang)]));
                }
            }
            MenuChoice::Exit => {}
        }
        Ok(())
    }
}

/// 저장소/파일 오류는 세션을 끝내지 않고 출력만 한다.
fn recoverable(err: &AppError) -> bool {
    matches!(
        err,
        AppError::Store(_)
            | AppError::Io(_)
            | AppError::Json(_)
            | AppError::Config(_)
            | AppError::Configuration(_)
    )
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run<S: ConfigurationStore>(session: &mut Session<'_, S>) -> Result<(), AppError> {
    loop {
        ui_cli::print_status(&session.tr, session.catalog, &session.current);
        let choice = match ui_cli::main_menu(&session.tr) {
            Ok(choice) => choice,
            Err(AppError::InputClosed) => MenuChoice::Exit,
            Err(e) => return Err(e),
        };
        if choice == MenuChoice::Exit {
            println!("{}", session.tr.t(keys::APP_EXIT));
            break;
        }
        match session.handle(choice) {
            Ok(()) => {}
            Err(AppError::InputClosed) => break,
            Err(e) if recoverable(&e) => {
                tracing::warn!(error = %e, "menu action failed");
                println!("{}: {e}", session.tr.t(keys::ERROR_PREFIX));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
