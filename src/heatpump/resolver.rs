//! 현재 구성에서 필수 부품 목록과 추가 가능한 선택 부품 목록을 도출한다.
//!
//! 리졸버는 관대하다. 모델이 없거나 존 타입을 모르면 가능한 만큼만 채우고,
//! 유효성 판단은 전적으로 validator에 맡긴다.

use super::catalog::{Catalog, CircuitType, SafetyComponent};
use super::sizing;
use super::system::SystemConfiguration;

pub const CAPACITY_SPEC: &str = "capacity";

/// 필수 부품 목록을 계산한다.
///
/// 순서: 카탈로그 필수 부품 → (수영장 회로가 아니면) 버퍼탱크 → 회로 타입 부품
/// → 존 순서대로 각 존의 요구 부품. id 중복은 첫 항목을 유지한다.
pub fn resolve_mandatory(catalog: &Catalog, config: &SystemConfiguration) -> Vec<SafetyComponent> {
    let mut out: Vec<SafetyComponent> = Vec::new();

    for component in catalog.required_components() {
        push_unique(&mut out, component.clone());
    }

    if config.circuit_type != CircuitType::Pool {
        if let Some(tank) = catalog.component(&catalog.sizing().buffer_tank_id) {
            let mut tank = tank.clone();
            match sizing::buffer_tank_capacity(catalog, config) {
                Ok(capacity) => {
                    tank.specs.insert(CAPACITY_SPEC.to_string(), capacity);
                }
                Err(e) => tracing::debug!(error = %e, "buffer tank added without capacity"),
            }
            push_unique(&mut out, tank);
        }
    }

    for id in catalog.circuit_requirements(config.circuit_type) {
        if let Some(component) = catalog.component(id) {
            push_unique(&mut out, component.clone());
        }
    }

    for zone in &config.zones {
        let Some(zone_type) = catalog.zone_type(&zone.zone_type) else {
            tracing::warn!(zone_type = %zone.zone_type, "skipping unknown zone type");
            continue;
        };
        for id in &zone_type.required_components {
            if let Some(component) = catalog.component(id) {
                push_unique(&mut out, component.clone());
            }
        }
    }

    tracing::debug!(
        count = out.len(),
        circuit = %config.circuit_type,
        "resolved mandatory components"
    );
    out
}

/// 필수 목록에 없는 카탈로그 부품 id를 카탈로그 순서대로 반환한다.
pub fn resolve_optional(catalog: &Catalog, mandatory: &[SafetyComponent]) -> Vec<String> {
    catalog
        .components()
        .iter()
        .filter(|c| !mandatory.iter().any(|m| m.id == c.id))
        .map(|c| c.id.clone())
        .collect()
}

/// 구성의 부품 목록을 다시 도출해 덮어쓴다.
pub fn refresh(catalog: &Catalog, config: &mut SystemConfiguration) {
    let mandatory = resolve_mandatory(catalog, config);
    config.components.optional = resolve_optional(catalog, &mandatory);
    config.components.mandatory = mandatory;
}

/// 같은 id가 이미 있으면 없는 사양 키만 보강하고, 없으면 뒤에 붙인다.
fn push_unique(list: &mut Vec<SafetyComponent>, component: SafetyComponent) {
    match list.iter_mut().find(|c| c.id == component.id) {
        Some(existing) => {
            for (key, value) in component.specs {
                existing.specs.entry(key).or_insert(value);
            }
        }
        None => list.push(component),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatpump::catalog::ComponentPosition;

    fn part(id: &str, specs: &[(&str, f64)]) -> SafetyComponent {
        SafetyComponent {
            id: id.into(),
            name: id.into(),
            position: ComponentPosition::Circuit,
            required: false,
            specs: specs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn duplicate_keeps_first_specs_and_adds_missing_keys() {
        let mut list = vec![part("buffer_tank", &[("capacity", 240.0)])];
        push_unique(
            &mut list,
            part("buffer_tank", &[("capacity", 0.0), ("height_mm", 1200.0)]),
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].specs["capacity"], 240.0);
        assert_eq!(list[0].specs["height_mm"], 1200.0);
    }
}
