//! Task type executed by the worker pool.
//!
//! A task is a boxed closure plus the user index it is invoked with. Any data
//! the task needs is captured by the closure, so the pool never has to know
//! what it is working on.
//!
//! # Example
//!
//! ```
//! use blockpool::pool::Task;
//!
//! let task = Task::new(7, |index| {
//!     assert_eq!(index, 7);
//! });
//! assert_eq!(task.index(), 7);
//! ```

use std::fmt;

/// Type-erased entry point of a task.
pub(crate) type TaskEntry = Box<dyn FnOnce(usize) + Send + 'static>;

/// A single unit of work for the [`WorkerPool`](super::WorkerPool).
///
/// The entry point is `FnOnce`, so a task runs exactly once; the pool drops
/// it (and everything it captured) right after it returns.
pub struct Task {
    index: usize,
    entry: TaskEntry,
}

impl Task {
    /// Creates a task that calls `entry(index)` when a worker picks it up.
    pub fn new<F>(index: usize, entry: F) -> Self
    where
        F: FnOnce(usize) + Send + 'static,
    {
        Self {
            index,
            entry: Box::new(entry),
        }
    }

    /// Creates a task from an already boxed entry point.
    pub(crate) fn from_boxed(index: usize, entry: TaskEntry) -> Self {
        Self { index, entry }
    }

    /// Returns the user index passed to the entry point.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Runs the entry point, consuming the task.
    pub(crate) fn run(self) {
        (self.entry)(self.index)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").field("index", &self.index).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_run_passes_index() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        let task = Task::new(42, move |index| {
            seen_clone.store(index, Ordering::SeqCst);
        });

        task.run();
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn test_run_drops_captured_data() {
        let data = Arc::new(vec![1u8, 2, 3]);
        let captured = Arc::clone(&data);
        let task = Task::new(0, move |_| {
            assert_eq!(captured.len(), 3);
        });

        assert_eq!(Arc::strong_count(&data), 2);
        task.run();
        assert_eq!(Arc::strong_count(&data), 1);
    }

    #[test]
    fn test_debug_shows_index() {
        let task = Task::new(3, |_| {});
        assert_eq!(format!("{:?}", task), "Task { index: 3 }");
    }
}
