//! Fork-join worker pool.
//!
//! This module provides a small, fixed-size thread pool for CPU-bound work
//! together with the counting [`JoinToken`] used to wait for a cohort of
//! tasks.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐   submit / submit_batch    ┌─────────────────────┐
//! │   Submitter   │ ─────── token += n ──────► │      TaskQueue      │
//! │               │                            │ Mutex<VecDeque> +   │
//! │  token.wait() │                            │ Condvar             │
//! └───────▲───────┘                            └──────────┬──────────┘
//!         │                                               │ pop (FIFO)
//!         │                                    ┌──────────▼──────────┐
//!         └────────────── token -= 1 ───────── │ worker 0 .. worker N│
//!                                              └─────────────────────┘
//! ```
//!
//! - [`WorkerPool`] - owns the worker threads; `start`/`stop` lifecycle
//! - [`Task`] - boxed closure plus the user index it is called with
//! - [`JoinToken`] - atomic counter; `wait` spins until it reaches zero
//! - [`Scope`] - submission handle for tasks that borrow caller data
//!
//! # Contracts
//!
//! Misuse is a programming error, checked by debug assertions only:
//! submitting to a pool that was never started, stopping a pool with work
//! still queued, destroying a token with outstanding tasks.
//!
//! Not provided: priorities, cancellation, dynamic resizing.

mod error;
mod queue;
mod scope;
mod task;
mod token;
mod worker;

pub use error::PoolError;
pub use scope::Scope;
pub use task::Task;
pub use token::JoinToken;
pub use worker::WorkerPool;

/// Returns the number of worker threads to use when none is configured.
///
/// Falls back to 4 if the available parallelism cannot be determined.
pub fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4)
}
