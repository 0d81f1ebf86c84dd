//! Native implementation of `WorkerPool` using OS threads.
//!
//! # Design Principles
//!
//! - **No polling**: workers block on channel recv; shutdown waits on a Condvar
//! - **One critical section for admission**: the sender lives behind an
//!   `RwLock`. `enqueue` holds the read side across the closed check and the
//!   `try_send`; closing takes the write side and drops the sender, so no
//!   identifier is ever sent into a queue that is being closed
//! - **Drain on close**: dropping the sender disconnects the channel only after
//!   queued identifiers have been received, so workers finish the backlog and
//!   then exit

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::{Condvar, Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::core::{PoolError, TaskId, TaskStatus, WorkerStore};

use super::{PoolCounters, PoolState, PoolStats, TaskSubmitter};

/// Tracks worker threads that have not exited yet.
#[derive(Default)]
struct WorkerTracker {
    live: Mutex<usize>,
    exited: Condvar,
}

impl WorkerTracker {
    fn register(&self) {
        *self.live.lock() += 1;
    }

    fn deregister(&self) {
        let mut live = self.live.lock();
        *live = live.saturating_sub(1);
        if *live == 0 {
            self.exited.notify_all();
        }
    }

    fn live(&self) -> usize {
        *self.live.lock()
    }

    /// Block until every worker exited or `deadline` passes; `None` waits
    /// without a deadline. Returns whether all workers exited.
    fn wait_until(&self, deadline: Option<Instant>) -> bool {
        let mut live = self.live.lock();
        while *live > 0 {
            match deadline {
                Some(deadline) => {
                    if self.exited.wait_until(&mut live, deadline).timed_out() {
                        return *live == 0;
                    }
                }
                None => self.exited.wait(&mut live),
            }
        }
        true
    }
}

/// Deregisters a worker when its thread ends, including by panic.
struct ExitGuard(Arc<WorkerTracker>);

impl Drop for ExitGuard {
    fn drop(&mut self) {
        self.0.deregister();
    }
}

/// Worker pool with dedicated OS threads and a bounded admission queue.
///
/// # Design
///
/// - **Bounded, non-blocking admission**: `enqueue` accepts or rejects at once
/// - **Clean shutdown**: dropping the sender naturally unblocks all workers
/// - **Lock-free counters**: statistics are plain atomics
pub struct WorkerPool {
    /// Admission queue capacity.
    capacity: usize,

    /// Store the workers read and update tasks through.
    store: Arc<dyn WorkerStore>,

    /// Task sender (to workers). `None` once shutdown has begun.
    task_tx: RwLock<Option<Sender<TaskId>>>,

    /// Receiver template cloned into each worker.
    task_rx: Receiver<TaskId>,

    /// Set once admission is closed.
    closed: AtomicBool,

    /// Live worker bookkeeping for shutdown.
    tracker: Arc<WorkerTracker>,

    /// Worker thread handles, joined after a completed drain.
    workers: Mutex<Vec<JoinHandle<()>>>,

    /// Next worker number, for thread names and logs.
    next_worker_id: AtomicUsize,

    /// Pool statistics counters (lock-free atomics).
    counters: Arc<PoolCounters>,
}

impl WorkerPool {
    /// Create a pool whose admission queue holds at most `capacity` identifiers.
    ///
    /// No workers run until [`WorkerPool::start`] is called. A capacity of zero
    /// only admits an identifier when a worker is already waiting for one.
    #[must_use]
    pub fn new(capacity: usize, store: Arc<dyn WorkerStore>) -> Self {
        let (task_tx, task_rx) = bounded::<TaskId>(capacity);

        Self {
            capacity,
            store,
            task_tx: RwLock::new(Some(task_tx)),
            task_rx,
            closed: AtomicBool::new(false),
            tracker: Arc::new(WorkerTracker::default()),
            workers: Mutex::new(Vec::new()),
            next_worker_id: AtomicUsize::new(1),
            counters: Arc::new(PoolCounters::default()),
        }
    }

    /// Launch `worker_count` worker threads.
    ///
    /// # Errors
    ///
    /// - `PoolError::Closed` if shutdown has been initiated
    /// - `PoolError::Spawn` if the OS refuses a thread; workers spawned before
    ///   the failure keep running
    pub fn start(&self, worker_count: usize) -> Result<(), PoolError> {
        // held so shutdown cannot close the queue halfway through
        let task_tx = self.task_tx.read();
        if task_tx.is_none() {
            return Err(PoolError::Closed);
        }

        let mut workers = self.workers.lock();
        for _ in 0..worker_count {
            let worker_id = self.next_worker_id.fetch_add(1, Ordering::Relaxed);
            self.tracker.register();

            let spawned = spawn_worker(
                worker_id,
                self.task_rx.clone(),
                Arc::clone(&self.store),
                Arc::clone(&self.counters),
                Arc::clone(&self.tracker),
            );
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    self.tracker.deregister();
                    error!(worker_id = worker_id, error = %e, "Failed to spawn worker thread");
                    return Err(PoolError::Spawn(e));
                }
            }
        }

        info!(
            worker_count = worker_count,
            capacity = self.capacity,
            "Worker pool started"
        );
        Ok(())
    }

    /// Try to admit a task identifier without blocking.
    ///
    /// # Errors
    ///
    /// - `PoolError::Closed` if shutdown has been initiated
    /// - `PoolError::Full` if the queue is at capacity
    pub fn enqueue(&self, id: TaskId) -> Result<(), PoolError> {
        let task_tx = self.task_tx.read();
        let Some(tx) = task_tx.as_ref() else {
            self.counters.rejected_tasks.fetch_add(1, Ordering::Relaxed);
            warn!(task_id = id, "Worker pool is closed, rejecting task");
            return Err(PoolError::Closed);
        };

        match tx.try_send(id) {
            Ok(()) => {
                self.counters.submitted_tasks.fetch_add(1, Ordering::Relaxed);
                debug!(task_id = id, "Task admitted to worker pool");
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                self.counters.rejected_tasks.fetch_add(1, Ordering::Relaxed);
                warn!(task_id = id, capacity = self.capacity, "Worker pool queue is full");
                Err(PoolError::Full)
            }
            Err(TrySendError::Disconnected(_)) => {
                self.counters.rejected_tasks.fetch_add(1, Ordering::Relaxed);
                Err(PoolError::Closed)
            }
        }
    }

    /// Close admission, let workers drain the queue, and wait for them to exit.
    ///
    /// The close step runs once no matter how often this is called; every
    /// call then waits on the same drain. Work in flight is never cancelled:
    /// on timeout, workers keep draining in the background.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::DeadlineExceeded` if workers are still running
    /// when `timeout` elapses.
    pub fn shutdown(&self, timeout: Duration) -> Result<(), PoolError> {
        // a timeout too large to represent as an instant never expires
        let deadline = Instant::now().checked_add(timeout);
        self.close();

        if !self.tracker.wait_until(deadline) {
            warn!(
                live_workers = self.tracker.live(),
                queued = self.task_rx.len(),
                "Worker pool shutdown deadline exceeded, workers keep draining"
            );
            return Err(PoolError::DeadlineExceeded);
        }

        let handles: Vec<_> = self.workers.lock().drain(..).collect();
        let joined = handles.len();
        for handle in handles {
            if handle.join().is_err() {
                warn!("Worker panicked");
            }
        }

        if joined > 0 {
            info!(worker_count = joined, "Worker pool shut down complete");
        }
        Ok(())
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PoolState {
        if !self.closed.load(Ordering::Acquire) {
            PoolState::Open
        } else if self.tracker.live() > 0 {
            PoolState::Closing
        } else {
            PoolState::Closed
        }
    }

    /// Admission queue capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get current pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.counters
            .snapshot(self.tracker.live(), self.capacity, self.task_rx.len())
    }

    /// Mark the pool closed and drop the sender, exactly once.
    fn close(&self) {
        let mut task_tx = self.task_tx.write();
        if task_tx.take().is_some() {
            self.closed.store(true, Ordering::Release);
            info!(
                queued = self.task_rx.len(),
                live_workers = self.tracker.live(),
                "Shutting down worker pool"
            );
        }
    }
}

impl TaskSubmitter for WorkerPool {
    fn enqueue(&self, id: TaskId) -> Result<(), PoolError> {
        Self::enqueue(self, id)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Close admission but DON'T join workers in Drop; they drain and exit
        // on their own. Explicit shutdown() is required to wait for them.
        if !self.closed.load(Ordering::Acquire) {
            self.close();
            debug!("WorkerPool dropped without explicit shutdown - workers will be detached");
        }
    }
}

/// Spawn a worker thread.
fn spawn_worker(
    worker_id: usize,
    task_rx: Receiver<TaskId>,
    store: Arc<dyn WorkerStore>,
    counters: Arc<PoolCounters>,
    tracker: Arc<WorkerTracker>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("task-worker-{worker_id}"))
        .spawn(move || {
            let _exit = ExitGuard(tracker);
            debug!(worker_id = worker_id, "Worker thread started");

            // recv blocks while the queue is empty and open; it fails once the
            // sender is dropped and the backlog is drained
            while let Ok(id) = task_rx.recv() {
                process_task(worker_id, id, store.as_ref(), &counters);
            }

            debug!(worker_id = worker_id, "Worker channel closed, exiting");
        })
}

/// Drive one dequeued task: `Pending -> Running`, simulated work, `-> Done`.
fn process_task(worker_id: usize, id: TaskId, store: &dyn WorkerStore, counters: &PoolCounters) {
    let Some(task) = store.get(id) else {
        counters.skipped_tasks.fetch_add(1, Ordering::Relaxed);
        warn!(worker_id = worker_id, task_id = id, "Task not found, skipping");
        return;
    };

    if task.status.is_terminal() {
        counters.skipped_tasks.fetch_add(1, Ordering::Relaxed);
        warn!(
            worker_id = worker_id,
            task_id = id,
            status = %task.status,
            "Skipping task already in a terminal state"
        );
        return;
    }

    if let Err(e) = store.update_status(id, TaskStatus::Running) {
        counters.failed_updates.fetch_add(1, Ordering::Relaxed);
        error!(
            worker_id = worker_id,
            task_id = id,
            status = %TaskStatus::Running,
            error = %e,
            "Updating task status failed"
        );
        return;
    }

    // measured from the moment the task is Running
    let start = Instant::now();
    let planned_ms = u64::try_from(task.work_duration.as_millis()).unwrap_or(u64::MAX);
    debug!(worker_id = worker_id, task_id = id, planned_ms = planned_ms, "Worker executing task");

    counters.active_tasks.fetch_add(1, Ordering::Relaxed);
    thread::sleep(task.work_duration);
    counters.active_tasks.fetch_sub(1, Ordering::Relaxed);

    if let Err(e) = store.update_status(id, TaskStatus::Done) {
        counters.failed_updates.fetch_add(1, Ordering::Relaxed);
        error!(
            worker_id = worker_id,
            task_id = id,
            status = %TaskStatus::Done,
            error = %e,
            "Updating task status failed"
        );
        return;
    }

    counters.completed_tasks.fetch_add(1, Ordering::Relaxed);
    let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    info!(
        worker_id = worker_id,
        task_id = id,
        elapsed_ms = elapsed_ms,
        planned_ms = planned_ms,
        "Worker completed task"
    );
}
