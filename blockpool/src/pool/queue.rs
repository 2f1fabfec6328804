//! FIFO task queue shared by the worker threads.
//!
//! The queue is a `VecDeque` behind a single `parking_lot::Mutex`, paired with
//! a `Condvar` that idle workers park on. It is the only structure in the pool
//! that needs mutual exclusion.
//!
//! # Example
//!
//! ```ignore
//! use blockpool::pool::queue::{QueuedTask, TaskQueue};
//!
//! let queue = TaskQueue::new();
//! queue.push(QueuedTask::new(task, None));
//!
//! // On a worker thread: blocks until a task arrives or stop is requested
//! while let Some(queued) = queue.pop_blocking() {
//!     queued.task.run();
//! }
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use super::task::Task;
use super::token::JoinToken;

// =============================================================================
// Queued Task
// =============================================================================

/// A task waiting to be executed.
///
/// Holds the task along with the join token it reports to and the time it
/// was enqueued (for wait time telemetry).
pub(crate) struct QueuedTask {
    /// The task to execute.
    pub task: Task,

    /// Token decremented once the task has run.
    pub token: Option<JoinToken>,

    /// When the task was enqueued.
    pub enqueued_at: Instant,
}

impl QueuedTask {
    /// Creates a new queued task.
    pub fn new(task: Task, token: Option<JoinToken>) -> Self {
        Self {
            task,
            token,
            enqueued_at: Instant::now(),
        }
    }

    /// Returns how long this task has been waiting in the queue.
    pub fn wait_time(&self) -> Duration {
        self.enqueued_at.elapsed()
    }
}

impl std::fmt::Debug for QueuedTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedTask")
            .field("index", &self.task.index())
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

// =============================================================================
// Task Queue
// =============================================================================

#[derive(Default)]
struct QueueState {
    tasks: VecDeque<QueuedTask>,
    stopping: bool,
}

/// Thread-safe FIFO of pending tasks.
pub(crate) struct TaskQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl TaskQueue {
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            available: Condvar::new(),
        }
    }

    /// Appends a task to the tail and wakes one waiting worker.
    pub fn push(&self, task: QueuedTask) {
        self.state.lock().tasks.push_back(task);
        self.available.notify_one();
    }

    /// Appends all tasks under a single lock acquisition and wakes every
    /// waiting worker.
    pub fn push_batch(&self, tasks: Vec<QueuedTask>) {
        if tasks.is_empty() {
            return;
        }
        self.state.lock().tasks.extend(tasks);
        self.available.notify_all();
    }

    /// Removes and returns the head task, parking while the queue is empty.
    ///
    /// Returns `None` once stop has been requested and no task is left.
    pub fn pop_blocking(&self) -> Option<QueuedTask> {
        let mut state = self.state.lock();
        loop {
            if let Some(task) = state.tasks.pop_front() {
                return Some(task);
            }
            if state.stopping {
                return None;
            }
            self.available.wait(&mut state);
        }
    }

    /// Asks every worker to exit once the queue is drained.
    pub fn request_stop(&self) {
        self.state.lock().stopping = true;
        self.available.notify_all();
    }

    /// Clears the stop flag so the queue can serve a restarted pool.
    pub fn reset(&self) {
        self.state.lock().stopping = false;
    }

    /// Returns the number of queued tasks.
    pub fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }

    /// Returns true if no task is queued.
    pub fn is_empty(&self) -> bool {
        self.state.lock().tasks.is_empty()
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TaskQueue")
            .field("len", &state.tasks.len())
            .field("stopping", &state.stopping)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
