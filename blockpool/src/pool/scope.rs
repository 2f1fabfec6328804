//! Join scopes for borrowed work.
//!
//! [`WorkerPool::submit`] only accepts `'static` tasks because a queued task
//! may outlive the caller. A scope lifts that restriction: every task submitted
//! through it reports to the scope's own [`JoinToken`], and
//! [`WorkerPool::scope`] waits on that token before it returns. Tasks may
//! therefore borrow anything that outlives the `scope` call, including
//! disjoint `&mut` slices of one output buffer.
//!
//! ```text
//! pool.scope(|s| {            ── JoinToken::new()
//!     s.submit_batch(rows);   ── token += rows
//! });                         ── token.wait(); token.destroy()
//! ```

use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};

use super::task::{Task, TaskEntry};
use super::token::JoinToken;
use super::worker::WorkerPool;

/// Submission handle passed to the closure given to [`WorkerPool::scope`].
///
/// `'env` is the lifetime of the data the scoped tasks may borrow.
pub struct Scope<'pool, 'env> {
    pool: &'pool WorkerPool,
    token: JoinToken,
    /// Invariant in `'env`, like `std::thread::Scope`.
    _env: PhantomData<&'env mut &'env ()>,
}

impl<'pool, 'env> Scope<'pool, 'env> {
    /// Submits one task that may borrow data living for `'env`.
    pub fn submit<F>(&self, index: usize, entry: F)
    where
        F: FnOnce(usize) + Send + 'env,
    {
        let task = Task::from_boxed(index, erase_lifetime(Box::new(entry)));
        self.pool.submit(task, Some(&self.token));
    }

    /// Submits a batch of `(index, entry)` pairs under one lock acquisition.
    pub fn submit_batch<I, F>(&self, entries: I)
    where
        I: IntoIterator<Item = (usize, F)>,
        F: FnOnce(usize) + Send + 'env,
    {
        let tasks = entries
            .into_iter()
            .map(|(index, entry)| Task::from_boxed(index, erase_lifetime(Box::new(entry))));
        self.pool.submit_batch(tasks, Some(&self.token));
    }

    /// Returns the number of scoped tasks that have not finished yet.
    pub fn pending(&self) -> isize {
        self.token.pending()
    }
}

/// Widens a borrowed task entry to `'static` so it can sit in the queue.
fn erase_lifetime<'env>(entry: Box<dyn FnOnce(usize) + Send + 'env>) -> TaskEntry {
    // SAFETY: only `Scope` calls this, and `WorkerPool::scope` does not return
    // (or unwind) before the scope's token reaches zero. A worker decrements
    // the token only after the entry has been called and its captures
    // dropped, so nothing borrowed for `'env` is touched after `'env` ends.
    // Workers also drain the queue before exiting, so a queued entry is never
    // leaked into a stopped pool. The two box types differ only in the
    // lifetime bound and share a layout.
    unsafe {
        std::mem::transmute::<Box<dyn FnOnce(usize) + Send + 'env>, TaskEntry>(entry)
    }
}

impl WorkerPool {
    /// Runs `f` with a [`Scope`] and joins every task it submitted.
    ///
    /// A fresh join token is created for the scope, waited on once `f`
    /// returns (or unwinds), and destroyed. Panics raised by `f` are resumed
    /// after the join; if any scoped task panicked, this call panics too.
    ///
    /// The calling thread spins while it waits, so calling `scope` from inside
    /// a task on a single-threaded pool deadlocks.
    ///
    /// # Example
    ///
    /// ```
    /// use blockpool::pool::WorkerPool;
    ///
    /// let pool = WorkerPool::new();
    /// pool.start(4).unwrap();
    ///
    /// let input = vec![1u32, 2, 3, 4, 5, 6, 7, 8];
    /// let mut output = vec![0u32; 8];
    ///
    /// pool.scope(|scope| {
    ///     let jobs = output
    ///         .chunks_mut(2)
    ///         .zip(input.chunks(2))
    ///         .enumerate()
    ///         .map(|(i, (dst, src))| {
    ///             (i, move |_: usize| {
    ///                 for (d, s) in dst.iter_mut().zip(src) {
    ///                     *d = s * 10;
    ///                 }
    ///             })
    ///         });
    ///     scope.submit_batch(jobs);
    /// });
    ///
    /// assert_eq!(output, vec![10, 20, 30, 40, 50, 60, 70, 80]);
    /// pool.stop();
    /// ```
    pub fn scope<'env, F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Scope<'_, 'env>) -> R,
    {
        let scope = Scope {
            pool: self,
            token: JoinToken::new(),
            _env: PhantomData,
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| f(&scope)));
        scope.token.wait();

        let Scope { token, .. } = scope;
        let panicked = token.panicked();
        token.destroy();

        match result {
            Err(payload) => panic::resume_unwind(payload),
            Ok(_) if panicked > 0 => panic!("{} scoped task(s) panicked", panicked),
            Ok(value) => value,
        }
    }
}
