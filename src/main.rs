use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use nextherm_configurator::{
    app::{self, AppError, Session},
    config::{self, Config},
    heatpump::{self, Catalog, SystemConfiguration},
    i18n::{self, keys, Translator},
    store::{self, JsonFileStore},
    ui_cli,
};

/// Nextherm 히트펌프 설비 구성/검증 도구.
#[derive(Debug, Parser)]
#[command(name = "nextherm_configurator", version, about)]
struct Cli {
    /// 표시 언어 (auto/en/fr/ko)
    #[arg(long, short = 'L', global = true, default_value = "auto")]
    lang: String,
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 카탈로그의 모델/존 타입/부품/회로를 나열한다
    Catalog,
    /// 모델과 출력으로 버퍼탱크/팽창탱크 용량을 계산한다
    Size {
        #[arg(long)]
        model: String,
        /// 난방 출력(kW)
        #[arg(long)]
        power: f64,
    },
    /// 구성 레코드(JSON)를 검증한다. 위반이 있으면 실패 코드로 종료한다
    Check { file: PathBuf },
    /// 검증된 구성 레코드를 다이어그램 JSON으로 변환한다
    Diagram {
        file: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// 사이징 요약을 JSON으로 출력한다
    Summary { file: PathBuf },
    /// 대화형 구성 메뉴 (기본값)
    Interactive,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let cfg = match config::load_from(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&cfg);

    let lang = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let tr = Translator::new_with_pack(&lang, cfg.lang_pack_dir.as_deref());
    match try_run(cli, cfg, &tr) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("{}: {err}", tr.t(keys::ERROR_PREFIX));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cfg: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cfg.log_filter.as_str().into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn try_run(cli: Cli, cfg: Config, tr: &Translator) -> Result<ExitCode, AppError> {
    let catalog = Catalog::load_or_builtin(cfg.catalog_path.as_deref())?;
    match cli.command.unwrap_or(Command::Interactive) {
        Command::Catalog => {
            ui_cli::print_catalog(tr, &catalog);
            Ok(ExitCode::SUCCESS)
        }
        Command::Size { model, power } => {
            let request = SystemConfiguration {
                pac_type: model,
                heating_power: power,
                ..SystemConfiguration::default()
            };
            let buffer = heatpump::buffer_tank_capacity(&catalog, &request);
            let expansion = heatpump::expansion_tank_capacity(&catalog, &request);
            match (buffer, expansion) {
                (Ok(buffer), Ok(expansion)) => {
                    println!("{}", tr.tf(keys::SUMMARY_BUFFER, &[("litres", format!("{buffer:.0}"))]));
                    println!(
                        "{}",
                        tr.tf(keys::SUMMARY_EXPANSION, &[("litres", format!("{expansion:.0}"))])
                    );
                    Ok(ExitCode::SUCCESS)
                }
                (Err(e), _) | (_, Err(e)) => {
                    eprintln!("{}: {e}", tr.t(keys::ERROR_PREFIX));
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Check { file } => {
            let record = read_refreshed(&catalog, &file)?;
            let violations = heatpump::validate(&catalog, &record)?;
            if violations.is_empty() {
                println!("{}", tr.t(keys::SUMMARY_VALID));
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{}", tr.t(keys::SUMMARY_INVALID));
                ui_cli::print_violations(tr, &violations);
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Diagram { file, out } => {
            let record = read_refreshed(&catalog, &file)?;
            let violations = heatpump::validate(&catalog, &record)?;
            if !violations.is_empty() {
                eprintln!("{}", tr.t(keys::DIAGRAM_BLOCKED));
                for v in &violations {
                    eprintln!("  - {}", tr.violation(v));
                }
                return Ok(ExitCode::FAILURE);
            }
            let json = heatpump::project(&catalog, &record).to_json_pretty()?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!(
                        "{}",
                        tr.tf(keys::DIAGRAM_WRITTEN, &[("path", path.display().to_string())])
                    );
                }
                None => println!("{json}"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Summary { file } => {
            let record = read_refreshed(&catalog, &file)?;
            let summary = heatpump::summarize(&catalog, &record)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Interactive => {
            let store = JsonFileStore::new(cfg.store_dir.clone());
            let mut session = Session::new(&catalog, store, tr.clone(), cfg, cli.config);
            app::run(&mut session)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// 레코드를 읽고 부품 목록을 카탈로그 기준으로 다시 도출한다.
fn read_refreshed(catalog: &Catalog, path: &Path) -> Result<SystemConfiguration, AppError> {
    let mut record = store::read_record(path)?;
    heatpump::refresh(catalog, &mut record);
    Ok(record)
}
