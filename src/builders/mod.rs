//! Builders that assemble the service and application from configuration.

pub mod app_builder;
pub mod service_builder;

pub use app_builder::{build_app, TaskApp};
pub use service_builder::{TaskServiceBuilder, DEFAULT_WORK_MAX, DEFAULT_WORK_MIN};
