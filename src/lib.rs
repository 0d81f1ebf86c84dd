//! # Task Worker Pool
//!
//! Accepts task submissions over HTTP, records each task's lifecycle, and runs
//! the work asynchronously on a bounded pool of background worker threads.
//!
//! ## Components
//!
//! - **Task store** ([`infra::InMemoryTaskStore`]): owns task records, assigns
//!   strictly increasing ids, and applies status changes atomically
//! - **Worker pool** ([`core::WorkerPool`]): a fixed-capacity FIFO admission
//!   queue plus dedicated worker threads that move tasks
//!   `Pending -> Running -> Done`
//! - **Task service** ([`core::TaskService`]): validates input, creates the
//!   record, submits it, and marks it `Failed` when the pool refuses it
//! - **HTTP API** ([`runtime::api`]): axum routes over the service
//!
//! ## Backpressure
//!
//! Admission never blocks. When the queue is full, or shutdown has begun, the
//! submission is rejected immediately and the task is stored as `Failed` with
//! the reason, so callers get a fast and explicit signal.
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use task_worker_pool::core::{TaskService, TaskStatus, WorkerPool};
//! use task_worker_pool::infra::InMemoryTaskStore;
//!
//! let store = Arc::new(InMemoryTaskStore::new());
//! let pool = Arc::new(WorkerPool::new(1, store.clone()));
//! let service = TaskService::builder()
//!     .store(store.clone())
//!     .pool(pool.clone())
//!     .work_duration(Duration::from_millis(5), Duration::from_millis(10))
//!     .build()
//!     .unwrap();
//!
//! // no workers yet: the first task fills the queue, the second is rejected
//! let a = service.create_task("A", "").unwrap();
//! assert_eq!(a.status, TaskStatus::Pending);
//! let err = service.create_task("B", "").unwrap_err();
//! assert_eq!(err.to_string(), "task pool is full");
//!
//! pool.start(1).unwrap();
//! pool.shutdown(Duration::from_secs(5)).unwrap();
//! assert_eq!(store.get(a.id).unwrap().status, TaskStatus::Done);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Task model, store capabilities, worker pool, and service.
pub mod core;
/// Configuration for the server, pool, and simulated work.
pub mod config;
/// Builders that assemble components from configuration.
pub mod builders;
/// Storage adapters.
pub mod infra;
/// HTTP transport.
pub mod runtime;
/// Shared utilities.
pub mod util;
