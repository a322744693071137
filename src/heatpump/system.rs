use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, CircuitType, SafetyComponent};

/// 구조적으로 잘못된 구성. 위반(Violation)과 달리 호출 측 프로그래밍 오류로 취급한다.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("malformed configuration: {0}")]
    Malformed(String),
}

/// 구성에 포함된 존 하나.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(rename = "type")]
    pub zone_type: String,
}

impl Zone {
    pub fn new(zone_type: impl Into<String>) -> Self {
        Self {
            zone_type: zone_type.into(),
        }
    }
}

/// 급탕(ECS) 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DhwConfig {
    pub tank_volume_l: f64,
    pub setpoint_c: f64,
}

impl Default for DhwConfig {
    fn default() -> Self {
        Self {
            tank_volume_l: 200.0,
            setpoint_c: 55.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub mandatory: Vec<SafetyComponent>,
    #[serde(default)]
    pub optional: Vec<String>,
}

impl Components {
    pub fn has_mandatory(&self, id: &str) -> bool {
        self.mandatory.iter().any(|c| c.id == id)
    }
}

/// 사용자가 단계적으로 채워가는 설비 구성.
///
/// `zones`는 레코드에 반드시 존재해야 한다. 누락된 레코드는 빈 목록으로 보정하지 않고
/// 역직렬화 단계에서 실패한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfiguration {
    /// 모델 id. 빈 문자열이면 미선택.
    #[serde(default)]
    pub pac_type: String,
    /// 난방 출력(kW)
    pub heating_power: f64,
    pub zones: Vec<Zone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhw: Option<DhwConfig>,
    #[serde(default)]
    pub circuit_type: CircuitType,
    #[serde(default)]
    pub components: Components,
}

impl Default for SystemConfiguration {
    fn default() -> Self {
        Self {
            pac_type: String::new(),
            heating_power: 0.0,
            zones: Vec::new(),
            dhw: None,
            circuit_type: CircuitType::Standard,
            components: Components::default(),
        }
    }
}

impl SystemConfiguration {
    pub fn has_dhw(&self) -> bool {
        self.dhw.is_some()
    }

    pub fn is_model_selected(&self) -> bool {
        !self.pac_type.is_empty()
    }

    /// 카탈로그 기준으로 구조적 결함을 검사한다.
    pub fn check_well_formed(&self, catalog: &Catalog) -> Result<(), ConfigurationError> {
        if !self.heating_power.is_finite() {
            return Err(ConfigurationError::Malformed(format!(
                "heating power is not a finite number: {}",
                self.heating_power
            )));
        }
        if let Some(zone) = self
            .zones
            .iter()
            .find(|z| catalog.zone_type(&z.zone_type).is_none())
        {
            return Err(ConfigurationError::Malformed(format!(
                "unknown zone type: {}",
                zone.zone_type
            )));
        }
        if let Some(dhw) = &self.dhw {
            if !dhw.tank_volume_l.is_finite() || !dhw.setpoint_c.is_finite() {
                return Err(ConfigurationError::Malformed(
                    "domestic hot water settings must be finite numbers".into(),
                ));
            }
        }
        Ok(())
    }
}
