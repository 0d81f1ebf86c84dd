//! Core task model, store capabilities, worker pool, and service.

pub mod error;
pub mod service;
pub mod store;
pub mod task;
pub mod worker_pool;

pub use error::{AppResult, PoolError, ServiceError, StoreError};
pub use service::TaskService;
pub use store::{TaskStore, WorkerStore};
pub use task::{Task, TaskId, TaskStatus};
pub use worker_pool::{PoolState, PoolStats, TaskSubmitter, WorkerPool};
