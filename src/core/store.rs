//! Store capabilities consumed by the worker pool and the task service.
//!
//! The pool and the service each depend only on the operations they use.
//! A concrete store (see [`crate::infra::store`]) implements both.

use super::error::StoreError;
use super::task::{Task, TaskId, TaskStatus};

/// Store operations a worker needs to drive a task through its lifecycle.
pub trait WorkerStore: Send + Sync + 'static {
    /// Look up a task. Read-only.
    fn get(&self, id: TaskId) -> Option<Task>;

    /// Overwrite a task's status without transition checks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record exists for `id`.
    fn update_status(&self, id: TaskId, status: TaskStatus) -> Result<Task, StoreError>;

    /// Mark a task failed and record the reason.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record exists for `id`.
    fn fail(&self, id: TaskId, reason: &str) -> Result<Task, StoreError>;
}

/// Store operations the task service needs.
pub trait TaskStore: Send + Sync + 'static {
    /// Assign the next identity, set status to `Pending`, and store the record.
    ///
    /// # Errors
    ///
    /// Implementations backed by fallible storage may return a [`StoreError`].
    fn create(&self, task: Task) -> Result<Task, StoreError>;

    /// Look up a task. Read-only.
    fn get(&self, id: TaskId) -> Option<Task>;

    /// All stored records, in no particular order.
    ///
    /// # Errors
    ///
    /// Implementations backed by fallible storage may return a [`StoreError`].
    fn list(&self) -> Result<Vec<Task>, StoreError>;

    /// Mark a task failed and record the reason.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record exists for `id`.
    fn fail(&self, id: TaskId, reason: &str) -> Result<Task, StoreError>;
}
