//! Wire store, pool, and service together from configuration.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::core::{AppResult, TaskService, WorkerPool};
use crate::infra::InMemoryTaskStore;

/// The assembled components of a running application.
#[derive(Clone)]
pub struct TaskApp {
    /// Canonical task records.
    pub store: Arc<InMemoryTaskStore>,
    /// Background workers and admission queue.
    pub pool: Arc<WorkerPool>,
    /// Transport-facing service.
    pub service: Arc<TaskService>,
}

/// Validate `cfg`, build every component, and start the workers.
///
/// # Errors
///
/// Fails if the configuration is invalid or a worker thread cannot be spawned.
pub fn build_app(cfg: &AppConfig) -> AppResult<TaskApp> {
    cfg.validate()
        .map_err(|e| anyhow::anyhow!("config invalid: {e}"))?;

    let store = Arc::new(InMemoryTaskStore::new());
    let pool = Arc::new(WorkerPool::new(cfg.pool.queue_capacity, store.clone()));

    let service = TaskService::builder()
        .store(store.clone())
        .pool(pool.clone())
        .work_duration(cfg.work_min(), cfg.work_max())
        .build()
        .context("failed to build task service")?;

    pool.start(cfg.pool.workers)
        .context("failed to start worker pool")?;

    info!(
        workers = cfg.pool.workers,
        queue_capacity = cfg.pool.queue_capacity,
        "Task application assembled"
    );

    Ok(TaskApp {
        store,
        pool,
        service: Arc::new(service),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PoolState;
    use std::time::Duration;

    #[test]
    fn test_build_app_starts_workers() {
        let mut cfg = AppConfig::default();
        cfg.pool.workers = 2;
        let app = build_app(&cfg).unwrap();

        assert_eq!(app.pool.stats().worker_count, 2);
        assert_eq!(app.pool.capacity(), 10);
        assert_eq!(app.pool.state(), PoolState::Open);

        app.pool.shutdown(Duration::from_secs(1)).unwrap();
        assert_eq!(app.pool.state(), PoolState::Closed);
    }

    #[test]
    fn test_build_app_rejects_invalid_config() {
        let mut cfg = AppConfig::default();
        cfg.pool.queue_capacity = 0;
        let err = build_app(&cfg).err().unwrap();
        assert!(err.to_string().contains("queue_capacity"));
    }
}
