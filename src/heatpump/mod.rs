//! 히트펌프 설비 구성/검증 엔진.
//!
//! 카탈로그 → 용량 계산 → 부품 도출 → 검증 → 다이어그램 순으로 의존한다.
//! 모든 함수는 카탈로그를 참조로 받는 순수 함수이며 내부 상태를 갖지 않는다.

pub mod catalog;
pub mod diagram;
pub mod resolver;
pub mod sizing;
pub mod summary;
pub mod system;
pub mod validator;

pub use catalog::{
    Catalog, CatalogError, CircuitType, ComponentPosition, HeatPumpModel, SafetyComponent,
    ZoneType,
};
pub use diagram::{project, Diagram};
pub use resolver::{refresh, resolve_mandatory, resolve_optional};
pub use sizing::{buffer_tank_capacity, expansion_tank_capacity, SizingError};
pub use summary::{summarize, SizingSummary, SummaryError};
pub use system::{Components, ConfigurationError, DhwConfig, SystemConfiguration, Zone};
pub use validator::{try_apply, validate, ApplyError, Mutation, Violation, ViolationCause};
