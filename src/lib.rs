//! 히트펌프 설비 구성 엔진을 라이브러리로 분리하여 CLI 외의 화면/서비스에서도 재사용한다.

pub mod app;
pub mod config;
pub mod heatpump;
pub mod i18n;
pub mod store;
pub mod ui_cli;
