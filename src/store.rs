//! 구성 레코드 저장소. 실제 서비스에서는 외부 DB가 담당하며, 여기서는 id별 JSON 파일로 보관한다.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::heatpump::SystemConfiguration;

/// 저장/로드 오류.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid record id '{0}' (allowed: letters, digits, '_' and '-')")]
    InvalidId(String),
    #[error("record '{0}' not found")]
    NotFound(String),
    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("record serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// id로 구분되는 구성 레코드 저장소.
pub trait ConfigurationStore {
    fn save(&self, id: &str, record: &SystemConfiguration) -> Result<(), StoreError>;
    fn load(&self, id: &str) -> Result<SystemConfiguration, StoreError>;
    /// 저장된 id를 정렬해 반환한다.
    fn list(&self) -> Result<Vec<String>, StoreError>;
    fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// 디렉터리 하나에 `<id>.json` 파일로 저장한다.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        check_id(id)?;
        Ok(self.dir.join(format!("{id}.json")))
    }
}

fn check_id(id: &str) -> Result<(), StoreError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

impl ConfigurationStore for JsonFileStore {
    fn save(&self, id: &str, record: &SystemConfiguration) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(record)?;
        fs::write(&path, content)?;
        tracing::info!(id, path = %path.display(), "configuration saved");
        Ok(())
    }

    fn load(&self, id: &str) -> Result<SystemConfiguration, StoreError> {
        let path = self.path_for(id)?;
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let record = serde_json::from_str(&content)?;
        tracing::info!(id, "configuration loaded");
        Ok(record)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if check_id(stem).is_ok() {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

/// 파일 경로에서 구성 레코드 하나를 직접 읽는다. CLI의 `check`/`diagram`/`summary`가 사용한다.
pub fn read_record(path: impl AsRef<Path>) -> Result<SystemConfiguration, StoreError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
