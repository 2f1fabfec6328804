//! Pool telemetry for observability and user feedback.
//!
//! This module provides metrics collection and reporting for the worker pool
//! and the compression dispatcher. It uses lock-free atomic counters so that
//! recording from worker threads adds no contention.
//!
//! # Architecture
//!
//! ```text
//! Workers / Dispatcher ─────► PoolMetrics ─────► PoolSnapshot ─────► Views
//!                          (atomic counters)   (point-in-time copy)   (CLI, logs)
//! ```
//!
//! # Example
//!
//! ```
//! use blockpool::telemetry::PoolMetrics;
//!
//! let metrics = PoolMetrics::new();
//!
//! metrics.tasks_submitted(4);
//! metrics.task_started(std::time::Duration::from_micros(250));
//! metrics.task_finished();
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.tasks_submitted, 4);
//! assert_eq!(snapshot.tasks_completed, 1);
//! println!("{}", snapshot);
//! ```

mod metrics;
mod snapshot;

pub use metrics::PoolMetrics;
pub use snapshot::PoolSnapshot;
