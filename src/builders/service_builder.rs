//! Builder for [`TaskService`] with construction-time precondition checks.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::{ServiceError, TaskService, TaskStore, TaskSubmitter};

/// Default shortest simulated work.
pub const DEFAULT_WORK_MIN: Duration = Duration::from_secs(1);
/// Default longest simulated work.
pub const DEFAULT_WORK_MAX: Duration = Duration::from_secs(5);

/// Collects the collaborators of a [`TaskService`].
///
/// Store and pool are required; `build` refuses to produce a service
/// without them. The random source defaults to an OS-seeded [`StdRng`];
/// pass a seeded one for reproducible work durations.
pub struct TaskServiceBuilder {
    store: Option<Arc<dyn TaskStore>>,
    pool: Option<Arc<dyn TaskSubmitter>>,
    rng: Option<StdRng>,
    work_min: Duration,
    work_max: Duration,
}

impl Default for TaskServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskServiceBuilder {
    /// Empty builder with the default 1-5 second work range.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            store: None,
            pool: None,
            rng: None,
            work_min: DEFAULT_WORK_MIN,
            work_max: DEFAULT_WORK_MAX,
        }
    }

    /// Store that owns task records.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Pool that accepts submitted task ids.
    #[must_use]
    pub fn pool(mut self, pool: Arc<dyn TaskSubmitter>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Random source for work durations.
    #[must_use]
    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Inclusive range of simulated work. Bounds given in reverse are swapped.
    #[must_use]
    pub fn work_duration(mut self, min: Duration, max: Duration) -> Self {
        self.work_min = min;
        self.work_max = max;
        self
    }

    /// Build the service.
    ///
    /// # Errors
    ///
    /// - `ServiceError::StoreNil` if no store was supplied
    /// - `ServiceError::PoolNil` if no pool was supplied
    pub fn build(self) -> Result<TaskService, ServiceError> {
        let store = self.store.ok_or(ServiceError::StoreNil)?;
        let pool = self.pool.ok_or(ServiceError::PoolNil)?;
        let rng = self.rng.unwrap_or_else(StdRng::from_os_rng);

        Ok(TaskService::from_parts(
            store,
            pool,
            rng,
            self.work_min,
            self.work_max,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WorkerPool;
    use crate::infra::InMemoryTaskStore;

    #[test]
    fn test_missing_store() {
        let store = Arc::new(InMemoryTaskStore::new());
        let pool = Arc::new(WorkerPool::new(1, store));
        let result = TaskServiceBuilder::new().pool(pool).build();
        assert!(matches!(result, Err(ServiceError::StoreNil)));
    }

    #[test]
    fn test_missing_pool() {
        let result = TaskServiceBuilder::new()
            .store(Arc::new(InMemoryTaskStore::new()))
            .build();
        assert!(matches!(result, Err(ServiceError::PoolNil)));
    }

    #[test]
    fn test_missing_both_reports_store_first() {
        let result = TaskServiceBuilder::new().build();
        assert!(matches!(result, Err(ServiceError::StoreNil)));
    }

    #[test]
    fn test_reversed_range_is_swapped() {
        let store = Arc::new(InMemoryTaskStore::new());
        let pool = Arc::new(WorkerPool::new(4, store.clone()));
        let svc = TaskServiceBuilder::new()
            .store(store)
            .pool(pool)
            .rng(StdRng::seed_from_u64(1))
            .work_duration(Duration::from_millis(30), Duration::from_millis(10))
            .build()
            .unwrap();

        let task = svc.create_task("t", "").unwrap();
        assert!(task.work_duration >= Duration::from_millis(10));
        assert!(task.work_duration <= Duration::from_millis(30));
    }
}
