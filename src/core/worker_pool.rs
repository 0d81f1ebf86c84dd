//! Bounded worker pool that drives stored tasks through their lifecycle.
//!
//! The pool owns a fixed-capacity FIFO admission queue of task identifiers and
//! a set of dedicated worker threads pulling from it. Admission never blocks:
//! a submission is either accepted into the queue or rejected immediately with
//! [`PoolError::Full`] or [`PoolError::Closed`].
//!
//! # Lifecycle
//!
//! `Open -> Closing -> Closed`. The first call to `shutdown` closes admission
//! and the queue; workers drain what is already queued and exit. Later calls
//! only wait. There is no way back to `Open`.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use task_worker_pool::core::{PoolError, WorkerPool};
//! use task_worker_pool::infra::InMemoryTaskStore;
//!
//! let store = Arc::new(InMemoryTaskStore::new());
//! let pool = WorkerPool::new(1, store);
//!
//! // no workers started, so the queue fills up
//! pool.enqueue(1).unwrap();
//! assert!(matches!(pool.enqueue(2), Err(PoolError::Full)));
//!
//! pool.shutdown(Duration::from_secs(1)).unwrap();
//! assert!(matches!(pool.enqueue(3), Err(PoolError::Closed)));
//! ```

mod native;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::core::{PoolError, TaskId};

pub use native::WorkerPool;

/// Something that accepts task identifiers for background execution.
///
/// The task service submits through this seam so it can be exercised
/// without real worker threads.
pub trait TaskSubmitter: Send + Sync + 'static {
    /// Try to admit `id` without blocking.
    ///
    /// # Errors
    ///
    /// - `PoolError::Closed` if shutdown has been initiated
    /// - `PoolError::Full` if the admission queue is at capacity
    fn enqueue(&self, id: TaskId) -> Result<(), PoolError>;
}

/// Lifecycle state of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolState {
    /// Accepting submissions.
    Open,
    /// Admission closed, workers draining.
    Closing,
    /// Admission closed and every worker has exited.
    Closed,
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closing => write!(f, "closing"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Statistics about pool utilization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Worker threads that have not exited yet.
    pub worker_count: usize,

    /// Admission queue capacity.
    pub capacity: usize,

    /// Identifiers waiting in the queue.
    pub queued_tasks: usize,

    /// Tasks currently in simulated work.
    pub active_tasks: u64,

    /// Identifiers accepted into the queue.
    pub submitted_tasks: u64,

    /// Submissions rejected as full or closed.
    pub rejected_tasks: u64,

    /// Tasks moved to `Done`.
    pub completed_tasks: u64,

    /// Dequeued identifiers skipped (missing or already failed).
    pub skipped_tasks: u64,

    /// Status updates that failed inside a worker.
    pub failed_updates: u64,
}

/// Internal counters for pool statistics (thread-safe).
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    pub active_tasks: AtomicU64,
    pub submitted_tasks: AtomicU64,
    pub rejected_tasks: AtomicU64,
    pub completed_tasks: AtomicU64,
    pub skipped_tasks: AtomicU64,
    pub failed_updates: AtomicU64,
}

impl PoolCounters {
    /// Get a snapshot of current statistics.
    pub fn snapshot(&self, worker_count: usize, capacity: usize, queued_tasks: usize) -> PoolStats {
        PoolStats {
            worker_count,
            capacity,
            queued_tasks,
            active_tasks: self.active_tasks.load(Ordering::Relaxed),
            submitted_tasks: self.submitted_tasks.load(Ordering::Relaxed),
            rejected_tasks: self.rejected_tasks.load(Ordering::Relaxed),
            completed_tasks: self.completed_tasks.load(Ordering::Relaxed),
            skipped_tasks: self.skipped_tasks.load(Ordering::Relaxed),
            failed_updates: self.failed_updates.load(Ordering::Relaxed),
        }
    }
}
