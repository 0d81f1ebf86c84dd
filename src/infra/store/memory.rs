//! In-memory task store guarded by a reader/writer lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::RwLock;

use crate::core::{StoreError, Task, TaskId, TaskStatus, TaskStore, WorkerStore};

/// In-memory store holding the canonical copy of every task.
///
/// Identity assignment is a lock-free atomic counter, so ids are unique and
/// strictly increasing across concurrent creators. The record map uses
/// `RwLock`: lookups run concurrently, mutations are exclusive.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    next_id: AtomicI64,
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl InMemoryTaskStore {
    /// Create an empty store. The first created task gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next id, force `Pending` status, and store the record.
    pub fn create(&self, mut task: Task) -> Task {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        task.id = id;
        // status is never caller-defined
        task.status = TaskStatus::Pending;
        task.error = None;

        self.tasks.write().insert(id, task.clone());
        task
    }

    /// Copy of the record for `id`, if present.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.tasks.read().get(&id).cloned()
    }

    /// Copies of all records, in map order.
    #[must_use]
    pub fn list(&self) -> Vec<Task> {
        self.tasks.read().values().cloned().collect()
    }

    /// Set status to `Failed` and record `reason`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `id` is unknown.
    pub fn fail(&self, id: TaskId, reason: &str) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write();
        let task = tasks.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        task.status = TaskStatus::Failed;
        task.error = Some(reason.to_owned());
        Ok(task.clone())
    }

    /// Overwrite the status of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `id` is unknown.
    pub fn update_status(&self, id: TaskId, status: TaskStatus) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write();
        let task = tasks.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        task.status = status;
        Ok(task.clone())
    }
}

impl TaskStore for InMemoryTaskStore {
    fn create(&self, task: Task) -> Result<Task, StoreError> {
        Ok(Self::create(self, task))
    }

    fn get(&self, id: TaskId) -> Option<Task> {
        Self::get(self, id)
    }

    fn list(&self) -> Result<Vec<Task>, StoreError> {
        Ok(Self::list(self))
    }

    fn fail(&self, id: TaskId, reason: &str) -> Result<Task, StoreError> {
        Self::fail(self, id, reason)
    }
}

impl WorkerStore for InMemoryTaskStore {
    fn get(&self, id: TaskId) -> Option<Task> {
        Self::get(self, id)
    }

    fn update_status(&self, id: TaskId, status: TaskStatus) -> Result<Task, StoreError> {
        Self::update_status(self, id, status)
    }

    fn fail(&self, id: TaskId, reason: &str) -> Result<Task, StoreError> {
        Self::fail(self, id, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn make_task(title: &str) -> Task {
        Task::new(title, "", 0, Duration::from_millis(10))
    }

    #[test]
    fn test_create_assigns_ids_from_one() {
        let store = InMemoryTaskStore::new();
        let a = store.create(make_task("a"));
        let b = store.create(make_task("b"));
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.status, TaskStatus::Pending);
    }

    #[test]
    fn test_create_ignores_caller_status_and_id() {
        let store = InMemoryTaskStore::new();
        let mut task = make_task("a");
        task.id = 99;
        task.status = TaskStatus::Done;
        task.error = Some("stale".into());

        let created = store.create(task);
        assert_eq!(created.id, 1);
        assert_eq!(created.status, TaskStatus::Pending);
        assert!(created.error.is_none());
    }

    #[test]
    fn test_get_missing() {
        let store = InMemoryTaskStore::new();
        assert!(store.get(1).is_none());
    }

    #[test]
    fn test_returned_copy_is_detached() {
        let store = InMemoryTaskStore::new();
        let mut created = store.create(make_task("a"));
        created.title = "changed".into();
        assert_eq!(store.get(created.id).unwrap().title, "a");
    }

    #[test]
    fn test_fail_sets_reason() {
        let store = InMemoryTaskStore::new();
        let created = store.create(make_task("a"));

        let failed = store.fail(created.id, "task pool is full").unwrap();
        assert_eq!(failed.status, TaskStatus::Failed);
        assert_eq!(failed.error.as_deref(), Some("task pool is full"));
        assert_eq!(store.get(created.id).unwrap(), failed);
    }

    #[test]
    fn test_fail_unknown_id() {
        let store = InMemoryTaskStore::new();
        assert_eq!(store.fail(5, "x"), Err(StoreError::NotFound(5)));
    }

    #[test]
    fn test_update_status() {
        let store = InMemoryTaskStore::new();
        let created = store.create(make_task("a"));

        let running = store.update_status(created.id, TaskStatus::Running).unwrap();
        assert_eq!(running.status, TaskStatus::Running);
        assert_eq!(
            store.update_status(42, TaskStatus::Done),
            Err(StoreError::NotFound(42))
        );
    }

    #[test]
    fn test_concurrent_create_unique_ids() {
        let store = Arc::new(InMemoryTaskStore::new());
        let mut handles = Vec::new();

        for t in 0..8 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                (0..50)
                    .map(|i| store.create(make_task(&format!("{t}-{i}"))).id)
                    .collect::<Vec<_>>()
            }));
        }

        let ids: Vec<TaskId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let unique: HashSet<_> = ids.iter().copied().collect();

        assert_eq!(ids.len(), 400);
        assert_eq!(unique.len(), 400);
        assert_eq!(store.list().len(), 400);
        assert_eq!(unique.iter().copied().max(), Some(400));
        assert!(unique.iter().all(|id| *id > 0));
    }
}
