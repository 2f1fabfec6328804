//! Counting join token.
//!
//! A [`JoinToken`] tracks how many tasks of a cohort are still outstanding.
//! The submitter increments it before a task becomes visible to workers, and
//! the worker decrements it right after the task returns, so a count of zero
//! means every task submitted so far has finished.
//!
//! ```text
//! submit ──► +1 ──► queue ──► worker runs task ──► -1
//!                                                   │
//! wait() spins (yielding) until the count is 0 ◄────┘
//! ```
//!
//! [`JoinToken::wait`] is a busy-wait that yields the processor between
//! polls. Join windows here are short (one face worth of row tasks), so the
//! caller never parks.

use std::fmt;
use std::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Default)]
struct TokenState {
    /// Tasks submitted but not yet finished.
    pending: AtomicIsize,
    /// Tasks that unwound instead of returning.
    panicked: AtomicUsize,
}

/// Handle used to join on a cohort of submitted tasks.
///
/// Clones share the same counter. A token may be reused for successive
/// submission waves as long as each wave is waited out; call
/// [`destroy`](Self::destroy) once the last wave has been joined.
///
/// # Example
///
/// ```
/// use blockpool::pool::{JoinToken, Task, WorkerPool};
///
/// let pool = WorkerPool::new();
/// pool.start(2).unwrap();
///
/// let token = JoinToken::new();
/// pool.submit(Task::new(0, |_| {}), Some(&token));
/// token.wait();
/// token.destroy();
///
/// pool.stop();
/// ```
#[derive(Clone, Default)]
pub struct JoinToken {
    state: Arc<TokenState>,
}

impl JoinToken {
    /// Creates a token with a count of zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of outstanding tasks.
    pub fn pending(&self) -> isize {
        self.state.pending.load(Ordering::Acquire)
    }

    /// Returns true if no task is outstanding.
    pub fn is_complete(&self) -> bool {
        self.pending() == 0
    }

    /// Returns how many tasks under this token panicked.
    pub fn panicked(&self) -> usize {
        self.state.panicked.load(Ordering::Acquire)
    }

    /// Registers `count` tasks that are about to be enqueued.
    pub(crate) fn add(&self, count: usize) {
        self.state
            .pending
            .fetch_add(count as isize, Ordering::AcqRel);
    }

    /// Marks one task as finished.
    pub(crate) fn complete(&self) {
        let previous = self.state.pending.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(
            previous > 0,
            "join token decremented below zero (was {})",
            previous
        );
    }

    /// Records that a task under this token unwound.
    pub(crate) fn mark_panicked(&self) {
        self.state.panicked.fetch_add(1, Ordering::AcqRel);
    }

    /// Blocks the calling thread until the count reaches zero.
    ///
    /// The thread polls the counter and yields between polls; it never
    /// runs queued work itself, so it must not be called from a worker
    /// while that worker's own tasks are still queued behind it.
    pub fn wait(&self) {
        while self.pending() != 0 {
            thread::yield_now();
        }
    }

    /// Releases the token.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if tasks are still outstanding: a join was
    /// skipped or paired with the wrong token.
    pub fn destroy(self) {
        let pending = self.pending();
        debug_assert_eq!(
            pending, 0,
            "join token destroyed with {} outstanding task(s)",
            pending
        );
    }
}

impl fmt::Debug for JoinToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinToken")
            .field("pending", &self.pending())
            .field("panicked", &self.panicked())
            .finish()
    }
}
