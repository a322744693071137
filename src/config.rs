use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드 (auto/en/fr/ko)
    pub language: String,
    /// 외부 언어팩 디렉터리. 없으면 내장 언어팩만 사용한다.
    pub lang_pack_dir: Option<String>,
    /// 카탈로그 파일 경로. 없으면 내장 Nextherm 카탈로그를 사용한다.
    pub catalog_path: Option<PathBuf>,
    /// 구성 레코드 저장 디렉터리
    pub store_dir: PathBuf,
    /// RUST_LOG가 없을 때 사용할 로그 필터
    pub log_filter: String,
    /// 새 구성을 시작할 때의 기본 난방 출력(kW)
    pub default_heating_power_kw: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            lang_pack_dir: None,
            catalog_path: None,
            store_dir: PathBuf::from("configurations"),
            log_filter: "warn".into(),
            default_heating_power_kw: 0.0,
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 지정 경로의 설정을 로드한다. 파일이 없으면 기본값을 그 경로에 저장하고 반환한다.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save_to(path)?;
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 지정 경로에 TOML로 저장한다.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
