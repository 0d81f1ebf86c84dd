//! Error types for store, pool, and service operations.

use thiserror::Error;

use super::task::{Task, TaskId};

/// Errors produced by a task store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record exists for the identifier.
    #[error("task not found")]
    NotFound(TaskId),
}

/// Errors produced by the worker pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The admission queue is at capacity.
    #[error("task pool is full")]
    Full,
    /// Shutdown has been initiated; no new admissions.
    #[error("task pool is closed")]
    Closed,
    /// Workers were still draining when the shutdown deadline elapsed.
    #[error("shutdown deadline exceeded")]
    DeadlineExceeded,
    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Errors surfaced by the task service to the transport layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Title was empty after trimming.
    #[error("invalid input")]
    InvalidInput,
    /// Identifier was zero or negative.
    #[error("invalid task id")]
    InvalidId,
    /// No task exists for the identifier.
    #[error("task not found")]
    NotFound(TaskId),
    /// Service constructed without a store.
    #[error("task store is nil")]
    StoreNil,
    /// Service constructed without a pool.
    #[error("task pool is nil")]
    PoolNil,
    /// The pool refused the task; it has been marked failed with `reason`.
    #[error("{reason}")]
    Rejected {
        /// The task record, now in `Failed` status.
        task: Box<Task>,
        /// The pool error that caused the rejection.
        reason: PoolError,
    },
    /// Store failure that is not a lookup miss.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// The failed task record carried by a rejection, if any.
    #[must_use]
    pub fn rejected_task(&self) -> Option<&Task> {
        match self {
            Self::Rejected { task, .. } => Some(task.as_ref()),
            _ => None,
        }
    }

    /// The pool error behind a rejection, if any.
    #[must_use]
    pub const fn pool_error(&self) -> Option<&PoolError> {
        match self {
            Self::Rejected { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
