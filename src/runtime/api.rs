//! HTTP transport over [`TaskService`]: request/response models and routes.
//!
//! | Method | Path          | Success                 |
//! |--------|---------------|-------------------------|
//! | POST   | `/tasks`      | 201 `TaskResponse`      |
//! | GET    | `/tasks`      | 200 `[TaskSummaryResponse]` |
//! | GET    | `/tasks/{id}` | 200 `TaskResponse`      |
//! | GET    | `/health`     | 200 `HealthResponse`    |
//!
//! A task rejected by the pool is answered with 503 and the failed record.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::core::{PoolState, PoolStats, ServiceError, Task, TaskId, TaskService, TaskStatus, WorkerPool};

/// Shared state for all routes.
#[derive(Clone)]
pub struct AppState {
    /// Task operations.
    pub service: Arc<TaskService>,
    /// Pool, for health reporting.
    pub pool: Arc<WorkerPool>,
}

impl AppState {
    /// Bundle the service and pool.
    #[must_use]
    pub const fn new(service: Arc<TaskService>, pool: Arc<WorkerPool>) -> Self {
        Self { service, pool }
    }
}

/// `POST /tasks` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Required; rejected when blank.
    #[serde(default)]
    pub title: String,
    /// Optional free text.
    #[serde(default)]
    pub description: Option<String>,
}

/// Full task representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Task id.
    pub id: TaskId,
    /// Title.
    pub title: String,
    /// Description, empty when not supplied.
    pub description: String,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            error: task.error.filter(|e| !e.is_empty()),
        }
    }
}

/// Task representation used by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummaryResponse {
    /// Task id.
    pub id: TaskId,
    /// Title.
    pub title: String,
    /// Lifecycle status.
    pub status: TaskStatus,
}

impl From<Task> for TaskSummaryResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            status: task.status,
        }
    }
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
}

/// Health payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server answers.
    pub status: String,
    /// Pool lifecycle state.
    pub pool: PoolState,
    /// Pool counters.
    pub stats: PoolStats,
}

/// Errors returned by handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A service error, mapped by kind.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// Malformed request body.
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Service(err) => match err {
                ServiceError::InvalidInput | ServiceError::InvalidId => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                ServiceError::Rejected { task, .. } => {
                    return (
                        StatusCode::SERVICE_UNAVAILABLE,
                        Json(TaskResponse::from(*task)),
                    )
                        .into_response();
                }
                ServiceError::StoreNil | ServiceError::PoolNil | ServiceError::Store(_) => {
                    tracing::error!(error = %err, "Internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    )
                }
            },
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Build the router with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", post(create_task).get(list_tasks))
        .route("/tasks/{id}", get(get_task))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /tasks - Create a task and submit it to the pool
async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let description = req.description.as_deref().unwrap_or_default();

    let task = state.service.create_task(&req.title, description)?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

/// GET /tasks/{id} - Get a task by id
async fn get_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let id: TaskId = raw_id
        .trim()
        .parse()
        .map_err(|_| ServiceError::InvalidId)?;

    let task = state.service.get_task(id)?;
    Ok(Json(task.into()))
}

/// GET /tasks - List all tasks
async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskSummaryResponse>>, ApiError> {
    let tasks = state.service.list_tasks()?;
    Ok(Json(tasks.into_iter().map(Into::into).collect()))
}

/// GET /health - Liveness and pool state
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        pool: state.pool.state(),
        stats: state.pool.stats(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PoolError;
    use std::time::Duration;

    fn failed_task() -> Task {
        let mut task = Task::new("B", "", 0, Duration::from_secs(1));
        task.id = 2;
        task.status = TaskStatus::Failed;
        task.error = Some("task pool is full".into());
        task
    }

    #[test]
    fn test_task_response_omits_missing_error() {
        let task = Task::new("A", "d", 0, Duration::from_secs(1));
        let json = serde_json::to_value(TaskResponse::from(task)).unwrap();
        assert_eq!(json["status"], "pending");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_task_response_includes_error() {
        let json = serde_json::to_value(TaskResponse::from(failed_task())).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "task pool is full");
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (ApiError::from(ServiceError::InvalidInput), StatusCode::BAD_REQUEST),
            (ApiError::from(ServiceError::InvalidId), StatusCode::BAD_REQUEST),
            (ApiError::from(ServiceError::NotFound(1)), StatusCode::NOT_FOUND),
            (ApiError::from(ServiceError::StoreNil), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::BadRequest("bad".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::from(ServiceError::Rejected {
                    task: Box::new(failed_task()),
                    reason: PoolError::Full,
                }),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
