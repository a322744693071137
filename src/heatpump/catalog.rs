//! 히트펌프 모델/존 타입/안전 부품/회로 타입을 담는 정적 참조 카탈로그.
//! 기본 카탈로그는 `catalog/nextherm.toml`을 빌드 시 포함하며, 설정으로 다른 파일을 지정할 수 있다.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// 수영장 존 타입 id. 다이어그램에서 보조 루프(필터/펌프/열교환기)를 붙일 때 사용한다.
pub const POOL_ZONE_ID: &str = "pool";

/// 부품 사양 값(용량 등). 직렬화 순서를 고정하기 위해 BTreeMap을 사용한다.
pub type Specs = BTreeMap<String, f64>;

/// 카탈로그 로드/검증 오류.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate {table} id: {id}")]
    DuplicateId { table: &'static str, id: String },
    #[error("model {id}: {reason}")]
    InvalidModel { id: String, reason: &'static str },
    #[error("zone type {id}: min supply temperature {min} °C is above max {max} °C")]
    InvalidZoneBounds { id: String, min: i32, max: i32 },
    #[error("{owner} references unknown component {component}")]
    UnknownComponent { owner: String, component: String },
    #[error("circuit type {0} has no requirement entry")]
    MissingCircuit(CircuitType),
}

/// 히트펌프(PAC) 제품 라인.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatPumpModel {
    pub id: String,
    pub name: String,
    pub max_zones: u32,
    pub supports_floor_heating: bool,
    pub supports_radiators: bool,
    /// 최대 공급수 온도(°C)
    pub max_supply_temp: i32,
    /// 고온형 여부. 버퍼탱크 계수 선택에 사용한다.
    #[serde(default)]
    pub high_temperature: bool,
}

/// 방열기/부하의 종류(바닥 난방, 라디에이터, 수영장 등).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub required_components: Vec<String>,
    #[serde(default)]
    pub min_supply_temp: Option<i32>,
    #[serde(default)]
    pub max_supply_temp: Option<i32>,
}

/// 유압 루프 상의 부품 위치. 다이어그램 배치에만 쓰인다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentPosition {
    Input,
    Output,
    Circuit,
}

/// 유압/안전 부품.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyComponent {
    pub id: String,
    pub name: String,
    pub position: ComponentPosition,
    /// true면 구성과 무관하게 항상 필수
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub specs: Specs,
}

/// 회로 타입.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CircuitType {
    #[default]
    Standard,
    Pool,
    Barrage,
}

impl CircuitType {
    pub const ALL: [CircuitType; 3] = [CircuitType::Standard, CircuitType::Pool, CircuitType::Barrage];

    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitType::Standard => "standard",
            CircuitType::Pool => "pool",
            CircuitType::Barrage => "barrage",
        }
    }
}

impl std::fmt::Display for CircuitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CircuitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CircuitType::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown circuit type: {s}"))
    }
}

/// 회로 타입별 추가 필수 부품.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitRequirement {
    pub circuit: CircuitType,
    #[serde(default)]
    pub requires: Vec<String>,
}

/// 탱크 용량 계수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankSizing {
    /// 버퍼탱크로 사용할 부품 id
    pub buffer_tank_id: String,
    /// 표준형 버퍼탱크 계수(L/kW)
    pub capacity_per_kw: f64,
    /// 고온형 버퍼탱크 계수(L/kW)
    pub capacity_per_kw_high_temp: f64,
    /// 팽창탱크 기본 용량(L)
    pub expansion_base_l: f64,
    /// 고온형일 때 추가되는 팽창탱크 용량(L)
    pub expansion_extra_l: f64,
    /// 이 온도(°C)를 초과하면 추가 용량을 더한다
    pub high_temp_threshold_c: i32,
}

impl Default for TankSizing {
    fn default() -> Self {
        Self {
            buffer_tank_id: "buffer_tank".into(),
            capacity_per_kw: 15.0,
            capacity_per_kw_high_temp: 20.0,
            expansion_base_l: 8.0,
            expansion_extra_l: 50.0,
            high_temp_threshold_c: 55,
        }
    }
}

/// 카탈로그 파일 구조. `Catalog::new`로 검증한 뒤에만 사용한다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub sizing: TankSizing,
    #[serde(default)]
    pub models: Vec<HeatPumpModel>,
    #[serde(default)]
    pub zone_types: Vec<ZoneType>,
    #[serde(default)]
    pub components: Vec<SafetyComponent>,
    #[serde(default)]
    pub circuits: Vec<CircuitRequirement>,
}

/// 검증된 읽기 전용 카탈로그.
#[derive(Debug, Clone)]
pub struct Catalog {
    data: CatalogData,
}

const BUILTIN_CATALOG: &str = include_str!("../../catalog/nextherm.toml");

impl Catalog {
    /// 참조 무결성을 검사한 뒤 카탈로그를 만든다.
    pub fn new(data: CatalogData) -> Result<Self, CatalogError> {
        check_unique("model", data.models.iter().map(|m| m.id.as_str()))?;
        check_unique("zone type", data.zone_types.iter().map(|z| z.id.as_str()))?;
        check_unique("component", data.components.iter().map(|c| c.id.as_str()))?;

        for model in &data.models {
            if model.max_zones < 1 {
                return Err(CatalogError::InvalidModel {
                    id: model.id.clone(),
                    reason: "max_zones must be at least 1",
                });
            }
            if model.max_supply_temp <= 0 {
                return Err(CatalogError::InvalidModel {
                    id: model.id.clone(),
                    reason: "max_supply_temp must be positive",
                });
            }
        }

        let known: HashSet<&str> = data.components.iter().map(|c| c.id.as_str()).collect();
        let ensure_known = |owner: String, component: &str| {
            if known.contains(component) {
                Ok(())
            } else {
                Err(CatalogError::UnknownComponent {
                    owner,
                    component: component.to_string(),
                })
            }
        };

        for zone in &data.zone_types {
            if let (Some(min), Some(max)) = (zone.min_supply_temp, zone.max_supply_temp) {
                if min > max {
                    return Err(CatalogError::InvalidZoneBounds {
                        id: zone.id.clone(),
                        min,
                        max,
                    });
                }
            }
            for id in &zone.required_components {
                ensure_known(format!("zone type {}", zone.id), id)?;
            }
        }

        for circuit in CircuitType::ALL {
            let count = data.circuits.iter().filter(|c| c.circuit == circuit).count();
            match count {
                0 => return Err(CatalogError::MissingCircuit(circuit)),
                1 => {}
                _ => {
                    return Err(CatalogError::DuplicateId {
                        table: "circuit",
                        id: circuit.to_string(),
                    })
                }
            }
        }
        for circuit in &data.circuits {
            for id in &circuit.requires {
                ensure_known(format!("circuit type {}", circuit.circuit), id)?;
            }
        }
        ensure_known("tank sizing".to_string(), &data.sizing.buffer_tank_id)?;

        Ok(Self { data })
    }

    /// 빌드에 포함된 Nextherm 기본 카탈로그.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn from_toml_str(src: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = toml::from_str(src)?;
        Self::new(data)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 설정에 카탈로그 경로가 있으면 그 파일을, 없으면 기본 카탈로그를 사용한다.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(p) => {
                tracing::info!(path = %p.display(), "loading catalog file");
                Self::load(p)
            }
            None => Self::builtin(),
        }
    }

    pub fn sizing(&self) -> &TankSizing {
        &self.data.sizing
    }

    pub fn models(&self) -> &[HeatPumpModel] {
        &self.data.models
    }

    pub fn zone_types(&self) -> &[ZoneType] {
        &self.data.zone_types
    }

    pub fn components(&self) -> &[SafetyComponent] {
        &self.data.components
    }

    pub fn model(&self, id: &str) -> Option<&HeatPumpModel> {
        self.data.models.iter().find(|m| m.id == id)
    }

    pub fn zone_type(&self, id: &str) -> Option<&ZoneType> {
        self.data.zone_types.iter().find(|z| z.id == id)
    }

    pub fn component(&self, id: &str) -> Option<&SafetyComponent> {
        self.data.components.iter().find(|c| c.id == id)
    }

    /// 항상 필수인 부품을 카탈로그 선언 순서대로 반환한다.
    pub fn required_components(&self) -> impl Iterator<Item = &SafetyComponent> {
        self.data.components.iter().filter(|c| c.required)
    }

    pub fn circuit_requirements(&self, circuit: CircuitType) -> &[String] {
        self.data
            .circuits
            .iter()
            .find(|c| c.circuit == circuit)
            .map(|c| c.requires.as_slice())
            .unwrap_or(&[])
    }

    /// 부품 id의 표시 이름. 카탈로그에 없으면 id를 그대로 쓴다.
    pub fn component_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.component(id).map(|c| c.name.as_str()).unwrap_or(id)
    }
}

fn check_unique<'a>(
    table: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                table,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
