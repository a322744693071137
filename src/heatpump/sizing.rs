//! 모델과 출력으로부터 버퍼탱크/팽창탱크 용량을 계산한다.

use super::catalog::{Catalog, HeatPumpModel};
use super::system::SystemConfiguration;

/// 용량 계산 오류.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SizingError {
    /// 카탈로그에 없는 모델 id
    #[error("unknown heat pump model: '{0}'")]
    UnknownModel(String),
}

fn selected_model<'a>(
    catalog: &'a Catalog,
    config: &SystemConfiguration,
) -> Result<&'a HeatPumpModel, SizingError> {
    catalog
        .model(&config.pac_type)
        .ok_or_else(|| SizingError::UnknownModel(config.pac_type.clone()))
}

/// 버퍼탱크 용량(L) = 출력(kW) × 계수. 고온형 모델은 고온 계수를 쓴다.
pub fn buffer_tank_capacity(
    catalog: &Catalog,
    config: &SystemConfiguration,
) -> Result<f64, SizingError> {
    let model = selected_model(catalog, config)?;
    let sizing = catalog.sizing();
    let coefficient = if model.high_temperature {
        sizing.capacity_per_kw_high_temp
    } else {
        sizing.capacity_per_kw
    };
    Ok(config.heating_power * coefficient)
}

/// 팽창탱크 용량(L) = 기본 용량 + (최대 공급온도가 임계값 초과 시 추가 용량).
pub fn expansion_tank_capacity(
    catalog: &Catalog,
    config: &SystemConfiguration,
) -> Result<f64, SizingError> {
    let model = selected_model(catalog, config)?;
    let sizing = catalog.sizing();
    let extra = if model.max_supply_temp > sizing.high_temp_threshold_c {
        sizing.expansion_extra_l
    } else {
        0.0
    };
    Ok(sizing.expansion_base_l + extra)
}
