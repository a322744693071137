//! 구성의 물리적/상업적 일관성을 검사하고, 변경 적용 여부를 판정한다.

use std::collections::HashSet;
use std::mem::{self, Discriminant};

use serde::Serialize;

use super::catalog::{Catalog, CircuitType};
use super::resolver;
use super::system::{ConfigurationError, DhwConfig, SystemConfiguration, Zone};

/// 검증 위반 항목. 오류가 아니라 사용자에게 보여줄 데이터다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("select a model")]
    ModelNotSelected,
    #[error("zone count {count} exceeds model limit of {limit}")]
    TooManyZones { limit: u32, count: usize },
    #[error(
        "model max temperature {model_max} °C insufficient for zone type {zone_type} (needs {zone_min} °C)"
    )]
    SupplyTemperatureTooLow {
        zone_type: String,
        model_max: i32,
        zone_min: i32,
    },
    #[error("component {name} is required for circuit safety")]
    MissingSafetyComponent { component: String, name: String },
    #[error("component {name} is required for circuit type {circuit}")]
    MissingCircuitComponent {
        component: String,
        name: String,
        circuit: CircuitType,
    },
    #[error("component {name} is required for zone type {zone_type}")]
    MissingZoneComponent {
        zone_type: String,
        component: String,
        name: String,
    },
    #[error("power must be greater than 0 kW")]
    HeatingPowerNotPositive,
}

/// 위반의 원인. 한도/온도 같은 수치는 제외하고 종류와 대상 id만 남긴다.
pub type ViolationCause<'a> = (Discriminant<Violation>, Option<&'a str>, Option<&'a str>);

impl Violation {
    /// 같은 원인에서 수치만 달라진 위반은 같은 원인으로 본다.
    pub fn cause(&self) -> ViolationCause<'_> {
        let kind = mem::discriminant(self);
        match self {
            Violation::ModelNotSelected
            | Violation::TooManyZones { .. }
            | Violation::HeatingPowerNotPositive => (kind, None, None),
            Violation::SupplyTemperatureTooLow { zone_type, .. } => {
                (kind, Some(zone_type.as_str()), None)
            }
            Violation::MissingSafetyComponent { component, .. }
            | Violation::MissingCircuitComponent { component, .. } => {
                (kind, Some(component.as_str()), None)
            }
            Violation::MissingZoneComponent {
                zone_type,
                component,
                ..
            } => (kind, Some(zone_type.as_str()), Some(component.as_str())),
        }
    }
}

/// 위반 목록을 순서대로 반환한다. 빈 목록이면 다이어그램 생성/저장이 가능하다.
///
/// 모든 검사를 수행한다. 단 모델을 찾지 못하면 모델에 의존하는 검사(존 수, 온도,
/// 부품)는 건너뛴다. 존 요구 부품은 필수/선택 목록 어느 쪽에든 있으면 된다.
pub fn validate(
    catalog: &Catalog,
    config: &SystemConfiguration,
) -> Result<Vec<Violation>, ConfigurationError> {
    config.check_well_formed(catalog)?;
    let mut violations = Vec::new();

    match catalog.model(&config.pac_type) {
        None => violations.push(Violation::ModelNotSelected),
        Some(model) => {
            if config.zones.len() > model.max_zones as usize {
                violations.push(Violation::TooManyZones {
                    limit: model.max_zones,
                    count: config.zones.len(),
                });
            }

            let mut seen = HashSet::new();
            for zone in &config.zones {
                if !seen.insert(zone.zone_type.as_str()) {
                    continue;
                }
                let Some(zone_type) = catalog.zone_type(&zone.zone_type) else {
                    continue;
                };
                if let Some(min) = zone_type.min_supply_temp {
                    if model.max_supply_temp < min {
                        violations.push(Violation::SupplyTemperatureTooLow {
                            zone_type: zone_type.id.clone(),
                            model_max: model.max_supply_temp,
                            zone_min: min,
                        });
                    }
                }
            }

            for component in catalog.required_components() {
                if !config.components.has_mandatory(&component.id) {
                    violations.push(Violation::MissingSafetyComponent {
                        component: component.id.clone(),
                        name: component.name.clone(),
                    });
                }
            }

            for id in catalog.circuit_requirements(config.circuit_type) {
                if !config.components.has_mandatory(id) {
                    violations.push(Violation::MissingCircuitComponent {
                        component: id.clone(),
                        name: catalog.component_name(id).to_string(),
                        circuit: config.circuit_type,
                    });
                }
            }

            let mut seen = HashSet::new();
            for zone in &config.zones {
                if !seen.insert(zone.zone_type.as_str()) {
                    continue;
                }
                let Some(zone_type) = catalog.zone_type(&zone.zone_type) else {
                    continue;
                };
                for id in &zone_type.required_components {
                    let listed = config.components.has_mandatory(id)
                        || config.components.optional.iter().any(|o| o == id);
                    if !listed {
                        violations.push(Violation::MissingZoneComponent {
                            zone_type: zone_type.id.clone(),
                            component: id.clone(),
                            name: catalog.component_name(id).to_string(),
                        });
                    }
                }
            }
        }
    }

    if config.heating_power <= 0.0 {
        violations.push(Violation::HeatingPowerNotPositive);
    }

    Ok(violations)
}

/// 사용자 조작 하나.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SelectModel(String),
    SetHeatingPower(f64),
    AddZone(String),
    RemoveZone(usize),
    /// 해당 타입의 존이 있으면 마지막 것을 제거하고, 없으면 추가한다.
    ToggleZone(String),
    SetCircuitType(CircuitType),
    SetDhw(Option<DhwConfig>),
}

/// 변경 적용 실패.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApplyError {
    /// 변경으로 새 위반이 생겨 거부됨. 새로 생긴 위반만 담는다.
    #[error("change rejected: {}", join_violations(.0))]
    Rejected(Vec<Violation>),
    #[error(transparent)]
    Malformed(#[from] ConfigurationError),
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// 변경을 사본에 적용하고 부품을 다시 도출한 뒤 검증한다.
///
/// 변경 전에 없던 원인의 위반이 하나라도 생기면 `ApplyError::Rejected`를 반환하고,
/// 그렇지 않으면 새 구성을 반환한다. 기존 위반의 수치만 바뀐 경우(존 수 초과 상태에서
/// 존을 하나 지우는 등)는 새 위반이 아니다. 입력 구성은 건드리지 않는다.
pub fn try_apply(
    catalog: &Catalog,
    config: &SystemConfiguration,
    mutation: Mutation,
) -> Result<SystemConfiguration, ApplyError> {
    let mut baseline = config.clone();
    resolver::refresh(catalog, &mut baseline);
    let before = validate(catalog, &baseline)?;

    let mut next = config.clone();
    apply(&mut next, mutation.clone())?;
    resolver::refresh(catalog, &mut next);
    let after = validate(catalog, &next)?;

    let known: HashSet<ViolationCause<'_>> = before.iter().map(Violation::cause).collect();
    let introduced: Vec<Violation> = after
        .iter()
        .filter(|v| !known.contains(&v.cause()))
        .cloned()
        .collect();
    if introduced.is_empty() {
        tracing::debug!(?mutation, "mutation accepted");
        Ok(next)
    } else {
        tracing::warn!(?mutation, count = introduced.len(), "mutation rejected");
        Err(ApplyError::Rejected(introduced))
    }
}

fn apply(config: &mut SystemConfiguration, mutation: Mutation) -> Result<(), ConfigurationError> {
    match mutation {
        Mutation::SelectModel(id) => config.pac_type = id,
        Mutation::SetHeatingPower(kw) => config.heating_power = kw,
        Mutation::AddZone(zone_type) => config.zones.push(Zone::new(zone_type)),
        Mutation::RemoveZone(index) => {
            if index >= config.zones.len() {
                return Err(ConfigurationError::Malformed(format!(
                    "zone index {index} out of range ({} zones)",
                    config.zones.len()
                )));
            }
            config.zones.remove(index);
        }
        Mutation::ToggleZone(zone_type) => {
            match config.zones.iter().rposition(|z| z.zone_type == zone_type) {
                Some(pos) => {
                    config.zones.remove(pos);
                }
                None => config.zones.push(Zone::new(zone_type)),
            }
        }
        Mutation::SetCircuitType(circuit) => config.circuit_type = circuit,
        Mutation::SetDhw(dhw) => config.dhw = dhw,
    }
    Ok(())
}
