//! Fixed-size worker pool.
//!
//! Workers are plain OS threads created by [`WorkerPool::start`] and joined by
//! [`WorkerPool::stop`]. Each one loops on the shared [`TaskQueue`], parking on
//! its condition variable while there is nothing to do.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::error::PoolError;
use super::queue::{QueuedTask, TaskQueue};
use super::task::Task;
use super::token::JoinToken;
use crate::telemetry::{PoolMetrics, PoolSnapshot};

/// Prefix for worker thread names.
const WORKER_NAME_PREFIX: &str = "blockpool-worker";

/// Fork-join worker pool.
///
/// The pool is meant to be created once by the application's composition
/// root, started once, and stopped once at exit. All methods take `&self`, so
/// the pool can be shared by reference (or `Arc`) between submitters.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use blockpool::pool::{JoinToken, Task, WorkerPool};
///
/// let pool = WorkerPool::new();
/// pool.start(4).unwrap();
///
/// let sum = Arc::new(AtomicUsize::new(0));
/// let token = JoinToken::new();
/// let tasks = (1..=10).map(|i| {
///     let sum = Arc::clone(&sum);
///     Task::new(i, move |index| {
///         sum.fetch_add(index, Ordering::Relaxed);
///     })
/// });
/// pool.submit_batch(tasks, Some(&token));
/// token.wait();
/// token.destroy();
///
/// assert_eq!(sum.load(Ordering::Relaxed), 55);
/// pool.stop();
/// ```
pub struct WorkerPool {
    queue: Arc<TaskQueue>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    /// Number of live workers, readable without taking the `workers` lock.
    worker_count: AtomicUsize,
    metrics: Arc<PoolMetrics>,
}

impl WorkerPool {
    /// Creates a stopped pool with no workers.
    pub fn new() -> Self {
        Self {
            queue: Arc::new(TaskQueue::new()),
            workers: Mutex::new(Vec::new()),
            worker_count: AtomicUsize::new(0),
            metrics: Arc::new(PoolMetrics::new()),
        }
    }

    /// Spawns `thread_count` worker threads.
    ///
    /// Calling `start` on a running pool is a no-op, whatever the requested
    /// thread count.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::NoWorkers`] if `thread_count` is zero and
    /// [`PoolError::Spawn`] if a thread cannot be created. On spawn failure
    /// the workers created so far are stopped again.
    pub fn start(&self, thread_count: usize) -> Result<(), PoolError> {
        let mut workers = self.workers.lock();
        if !workers.is_empty() {
            debug!(
                threads = workers.len(),
                "Worker pool already running, ignoring start"
            );
            return Ok(());
        }
        if thread_count == 0 {
            return Err(PoolError::NoWorkers);
        }

        self.queue.reset();

        for index in 0..thread_count {
            let queue = Arc::clone(&self.queue);
            let metrics = Arc::clone(&self.metrics);
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", WORKER_NAME_PREFIX, index))
                .spawn(move || run_worker(index, queue, metrics));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(source) => {
                    error!(worker = index, error = %source, "Failed to spawn worker thread");
                    Self::shutdown_workers(&self.queue, &mut workers);
                    return Err(PoolError::Spawn { index, source });
                }
            }
        }

        self.worker_count.store(workers.len(), Ordering::Release);
        info!(threads = thread_count, "Worker pool started");
        Ok(())
    }

    /// Stops every worker and waits for it to exit.
    ///
    /// All submitted work must have been joined beforehand; the pool does not
    /// drain on behalf of callers. Stopping a pool that is not running is a
    /// no-op. A stopped pool may be started again.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if tasks are still queued.
    pub fn stop(&self) {
        let mut workers = self.workers.lock();
        if workers.is_empty() {
            return;
        }

        let queued = self.queue.len();
        debug_assert!(
            queued == 0,
            "worker pool stopped with {} queued task(s)",
            queued
        );

        let threads = workers.len();
        self.worker_count.store(0, Ordering::Release);
        Self::shutdown_workers(&self.queue, &mut workers);
        info!(threads, "Worker pool stopped");
    }

    fn shutdown_workers(queue: &TaskQueue, workers: &mut Vec<JoinHandle<()>>) {
        queue.request_stop();
        for handle in workers.drain(..) {
            if handle.join().is_err() {
                warn!("Worker thread exited with a panic");
            }
        }
        queue.reset();
    }

    /// Returns true if the pool has live workers.
    pub fn is_running(&self) -> bool {
        self.thread_count() > 0
    }

    /// Returns the number of live workers.
    pub fn thread_count(&self) -> usize {
        self.worker_count.load(Ordering::Acquire)
    }

    /// Returns the number of tasks waiting for a worker.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Returns a snapshot of the pool's metrics.
    pub fn metrics(&self) -> PoolSnapshot {
        self.metrics.snapshot()
    }

    /// Returns the live metrics collector.
    pub(crate) fn metrics_handle(&self) -> &PoolMetrics {
        &self.metrics
    }

    /// Enqueues one task.
    ///
    /// If a token is given it is incremented before the task becomes visible
    /// to any worker, so a concurrent `wait` can never observe a false zero.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the pool has not been started.
    pub fn submit(&self, task: Task, token: Option<&JoinToken>) {
        debug_assert!(
            self.is_running(),
            "task submitted to a worker pool that was never started"
        );

        if let Some(token) = token {
            token.add(1);
        }
        self.metrics.tasks_submitted(1);
        self.queue.push(QueuedTask::new(task, token.cloned()));
    }

    /// Enqueues a batch of tasks under a single lock acquisition.
    ///
    /// The token is incremented once by the batch size, then every worker is
    /// woken. This is the cheap path for fork-join fan-out.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the pool has not been started.
    pub fn submit_batch<I>(&self, tasks: I, token: Option<&JoinToken>)
    where
        I: IntoIterator<Item = Task>,
    {
        debug_assert!(
            self.is_running(),
            "task batch submitted to a worker pool that was never started"
        );

        let batch: Vec<QueuedTask> = tasks
            .into_iter()
            .map(|task| QueuedTask::new(task, token.cloned()))
            .collect();
        if batch.is_empty() {
            return;
        }

        if let Some(token) = token {
            token.add(batch.len());
        }
        self.metrics.tasks_submitted(batch.len());
        self.metrics.batch_submitted();
        self.queue.push_batch(batch);
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.thread_count())
            .field("queue", &self.queue)
            .finish()
    }
}

/// Worker thread body: pop, run, report, repeat until stopped.
fn run_worker(index: usize, queue: Arc<TaskQueue>, metrics: Arc<PoolMetrics>) {
    debug!(worker = index, "Worker started");

    while let Some(queued) = queue.pop_blocking() {
        metrics.task_started(queued.wait_time());

        let QueuedTask { task, token, .. } = queued;
        let task_index = task.index();

        if panic::catch_unwind(AssertUnwindSafe(move || task.run())).is_err() {
            error!(worker = index, task = task_index, "Task panicked");
            metrics.task_panicked();
            if let Some(token) = &token {
                token.mark_panicked();
            }
        }

        metrics.task_finished();
        if let Some(token) = token {
            token.complete();
        }
    }

    debug!(worker = index, "Worker exiting");
}
