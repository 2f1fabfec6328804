//! Error types for worker pool lifecycle operations.

use thiserror::Error;

/// Errors that can occur while starting the worker pool.
///
/// Misuse of a running pool (submitting before `start`, stopping with work
/// still queued, destroying an unjoined token) is a programming error and is
/// caught by debug assertions instead.
#[derive(Debug, Error)]
pub enum PoolError {
    /// A pool needs at least one worker to make progress.
    #[error("Worker pool requires at least one thread")]
    NoWorkers,

    /// The operating system refused to spawn a worker thread.
    #[error("Failed to spawn worker thread {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },
}
