//! 견적/PDF/메일 쪽으로 넘기는 사이징 요약 데이터.

use serde::Serialize;

use super::catalog::{Catalog, CircuitType, Specs};
use super::resolver;
use super::sizing::{self, SizingError};
use super::system::{ConfigurationError, DhwConfig, SystemConfiguration};
use super::validator::{self, Violation};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SummaryError {
    #[error(transparent)]
    Sizing(#[from] SizingError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentLine {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Specs::is_empty")]
    pub specs: Specs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneLine {
    pub zone_type: String,
    pub name: String,
}

/// 완성된 사이징 결과. 외부 문서 생성기에 그대로 전달한다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingSummary {
    pub model_id: String,
    pub model_name: String,
    pub heating_power_kw: f64,
    pub circuit_type: CircuitType,
    /// 수영장 회로는 버퍼탱크가 없으므로 None
    pub buffer_tank_l: Option<f64>,
    pub expansion_tank_l: f64,
    pub mandatory: Vec<ComponentLine>,
    pub optional: Vec<String>,
    pub zones: Vec<ZoneLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhw: Option<DhwConfig>,
    pub violations: Vec<Violation>,
}

impl SizingSummary {
    pub fn is_accepted(&self) -> bool {
        self.violations.is_empty()
    }
}

/// 모델이 선택된 구성의 요약을 만든다. 부품 목록은 사본에서 다시 도출하므로
/// 저장된 목록이 오래되었어도 용량과 부품 사양이 일치한다.
pub fn summarize(
    catalog: &Catalog,
    config: &SystemConfiguration,
) -> Result<SizingSummary, SummaryError> {
    config.check_well_formed(catalog)?;
    let mut refreshed = config.clone();
    resolver::refresh(catalog, &mut refreshed);
    let config = &refreshed;

    let model = catalog
        .model(&config.pac_type)
        .ok_or_else(|| SizingError::UnknownModel(config.pac_type.clone()))?;
    let buffer_tank_l = if config.circuit_type == CircuitType::Pool {
        None
    } else {
        Some(sizing::buffer_tank_capacity(catalog, config)?)
    };
    let expansion_tank_l = sizing::expansion_tank_capacity(catalog, config)?;

    let violations = validator::validate(catalog, config)?;

    Ok(SizingSummary {
        model_id: model.id.clone(),
        model_name: model.name.clone(),
        heating_power_kw: config.heating_power,
        circuit_type: config.circuit_type,
        buffer_tank_l,
        expansion_tank_l,
        mandatory: config
            .components
            .mandatory
            .iter()
            .map(|c| ComponentLine {
                id: c.id.clone(),
                name: c.name.clone(),
                specs: c.specs.clone(),
            })
            .collect(),
        optional: config.components.optional.clone(),
        zones: config
            .zones
            .iter()
            .map(|z| ZoneLine {
                zone_type: z.zone_type.clone(),
                name: catalog
                    .zone_type(&z.zone_type)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| z.zone_type.clone()),
            })
            .collect(),
        dhw: config.dhw.clone(),
        violations,
    })
}
