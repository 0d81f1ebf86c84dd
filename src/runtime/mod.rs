//! HTTP transport and API surface.

pub mod api;

pub use api::{router, AppState, CreateTaskRequest, TaskResponse, TaskSummaryResponse};
