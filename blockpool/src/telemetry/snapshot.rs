//! Point-in-time telemetry snapshot.
//!
//! Provides an immutable view of pool metrics for display and reporting.

use std::fmt;
use std::time::Duration;

/// A point-in-time snapshot of pool metrics.
///
/// Rates are pre-computed from uptime at the time of the snapshot.
#[derive(Clone, Debug)]
pub struct PoolSnapshot {
    /// How long the metrics have been collected
    pub uptime: Duration,

    // === Task metrics ===
    /// Total tasks submitted
    pub tasks_submitted: u64,
    /// Batch submissions
    pub batches_submitted: u64,
    /// Tasks finished (returned or unwound)
    pub tasks_completed: u64,
    /// Tasks that unwound
    pub tasks_panicked: u64,
    /// Tasks currently executing
    pub tasks_active: usize,
    /// Mean time a task spent queued
    pub avg_queue_wait: Duration,

    // === Compression metrics ===
    /// Images compressed
    pub images_compressed: u64,
    /// 4×4 blocks encoded
    pub blocks_encoded: u64,
    /// Compressed bytes written
    pub bytes_encoded: u64,

    // === Computed rates ===
    /// Tasks finished per second of uptime
    pub tasks_per_second: f64,
    /// Blocks encoded per second of uptime
    pub blocks_per_second: f64,
}

impl PoolSnapshot {
    /// Tasks submitted but not yet finished.
    pub fn tasks_outstanding(&self) -> u64 {
        self.tasks_submitted.saturating_sub(self.tasks_completed)
    }
}

impl fmt::Display for PoolSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tasks {}/{} done ({} panicked, {} active), avg queue wait {:.1}ms, \
             {} image(s), {} blocks, {} bytes",
            self.tasks_completed,
            self.tasks_submitted,
            self.tasks_panicked,
            self.tasks_active,
            self.avg_queue_wait.as_secs_f64() * 1000.0,
            self.images_compressed,
            self.blocks_encoded,
            self.bytes_encoded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> PoolSnapshot {
        PoolSnapshot {
            uptime: Duration::from_secs(2),
            tasks_submitted: 10,
            batches_submitted: 1,
            tasks_completed: 7,
            tasks_panicked: 0,
            tasks_active: 3,
            avg_queue_wait: Duration::from_micros(1500),
            images_compressed: 1,
            blocks_encoded: 16,
            bytes_encoded: 256,
            tasks_per_second: 3.5,
            blocks_per_second: 8.0,
        }
    }

    #[test]
    fn test_tasks_outstanding() {
        assert_eq!(snapshot().tasks_outstanding(), 3);
    }

    #[test]
    fn test_display() {
        let text = snapshot().to_string();
        assert!(text.contains("tasks 7/10 done"));
        assert!(text.contains("avg queue wait 1.5ms"));
        assert!(text.contains("16 blocks"));
    }
}
