//! Task service: validates input, records tasks, and submits them to the pool.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, warn};

use crate::builders::TaskServiceBuilder;
use crate::core::{ServiceError, Task, TaskId, TaskStore, TaskSubmitter};
use crate::util::now_ms;

/// Entry point used by the transport layer.
///
/// Owns its random source so simulated work durations are reproducible when
/// the service is built with a seeded [`StdRng`].
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    pool: Arc<dyn TaskSubmitter>,
    rng: Mutex<StdRng>,
    work_min_ms: u64,
    work_max_ms: u64,
}

impl TaskService {
    /// Start building a service. See [`TaskServiceBuilder`].
    #[must_use]
    pub fn builder() -> TaskServiceBuilder {
        TaskServiceBuilder::new()
    }

    pub(crate) fn from_parts(
        store: Arc<dyn TaskStore>,
        pool: Arc<dyn TaskSubmitter>,
        rng: StdRng,
        work_min: Duration,
        work_max: Duration,
    ) -> Self {
        let min = u64::try_from(work_min.as_millis()).unwrap_or(u64::MAX);
        let max = u64::try_from(work_max.as_millis()).unwrap_or(u64::MAX);
        Self {
            store,
            pool,
            rng: Mutex::new(rng),
            work_min_ms: min.min(max),
            work_max_ms: min.max(max),
        }
    }

    /// Create a task and submit it for background execution.
    ///
    /// Both inputs are trimmed; the description may be empty.
    ///
    /// # Errors
    ///
    /// - `ServiceError::InvalidInput` if the title is empty after trimming
    /// - `ServiceError::Rejected` if the pool refused the task; the task has
    ///   been marked failed and the failed record is carried in the error
    /// - `ServiceError::Store` if the store could not create or fail the task
    pub fn create_task(&self, title: &str, description: &str) -> Result<Task, ServiceError> {
        let title = title.trim();
        let description = description.trim();
        if title.is_empty() {
            return Err(ServiceError::InvalidInput);
        }

        let task = Task::new(title, description, now_ms(), self.next_work_duration());
        let created = self.store.create(task)?;

        match self.pool.enqueue(created.id) {
            Ok(()) => {
                debug!(task_id = created.id, "Task created and submitted");
                Ok(created)
            }
            Err(reason) => {
                let failed = self.store.fail(created.id, &reason.to_string())?;
                warn!(
                    task_id = created.id,
                    reason = %reason,
                    "Task rejected by worker pool, marked failed"
                );
                Err(ServiceError::Rejected {
                    task: Box::new(failed),
                    reason,
                })
            }
        }
    }

    /// Fetch a task by id.
    ///
    /// # Errors
    ///
    /// - `ServiceError::InvalidId` if `id <= 0`
    /// - `ServiceError::NotFound` if no task has this id
    pub fn get_task(&self, id: TaskId) -> Result<Task, ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidId);
        }
        self.store.get(id).ok_or(ServiceError::NotFound(id))
    }

    /// All tasks, unfiltered and unsorted.
    ///
    /// # Errors
    ///
    /// Passes through store failures.
    pub fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.store.list()?)
    }

    fn next_work_duration(&self) -> Duration {
        let ms = self
            .rng
            .lock()
            .random_range(self.work_min_ms..=self.work_max_ms);
        Duration::from_millis(ms)
    }
}
