//! Lock-free atomic metrics collection.
//!
//! Uses `AtomicU64` and `AtomicUsize` for thread-safe metrics collection
//! without locks.

use super::PoolSnapshot;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Lock-free metrics collection for the pool.
///
/// All operations use `Relaxed` ordering. The counters are independent
/// measurements and never used for synchronization; joins go through
/// [`JoinToken`](crate::pool::JoinToken).
pub struct PoolMetrics {
    /// When metrics collection started
    start_time: Instant,

    // === Task metrics ===
    /// Total tasks submitted (single and batched)
    tasks_submitted: AtomicU64,
    /// Batch submissions
    batches_submitted: AtomicU64,
    /// Tasks whose entry point returned or unwound
    tasks_completed: AtomicU64,
    /// Tasks that unwound
    tasks_panicked: AtomicU64,
    /// Tasks currently executing on a worker
    tasks_active: AtomicUsize,
    /// Cumulative time tasks spent queued, in microseconds
    queue_wait_us: AtomicU64,

    // === Compression metrics ===
    /// Images (all faces) compressed by the dispatcher
    images_compressed: AtomicU64,
    /// 4×4 blocks encoded
    blocks_encoded: AtomicU64,
    /// Compressed bytes written
    bytes_encoded: AtomicU64,
}

impl PoolMetrics {
    /// Creates a new metrics collector with all counters at zero.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            tasks_submitted: AtomicU64::new(0),
            batches_submitted: AtomicU64::new(0),
            tasks_completed: AtomicU64::new(0),
            tasks_panicked: AtomicU64::new(0),
            tasks_active: AtomicUsize::new(0),
            queue_wait_us: AtomicU64::new(0),
            images_compressed: AtomicU64::new(0),
            blocks_encoded: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
        }
    }

    // =========================================================================
    // Task events
    // =========================================================================

    /// Records `count` tasks entering the queue.
    pub fn tasks_submitted(&self, count: usize) {
        self.tasks_submitted
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Records a batch submission.
    pub fn batch_submitted(&self) {
        self.batches_submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a worker picking up a task after it waited `queued_for`.
    pub fn task_started(&self, queued_for: Duration) {
        self.tasks_active.fetch_add(1, Ordering::Relaxed);
        self.queue_wait_us
            .fetch_add(queued_for.as_micros() as u64, Ordering::Relaxed);
    }

    /// Records a task started with `task_started` finishing.
    pub fn task_finished(&self) {
        self.tasks_active.fetch_sub(1, Ordering::Relaxed);
        self.tasks_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a task that unwound.
    pub fn task_panicked(&self) {
        self.tasks_panicked.fetch_add(1, Ordering::Relaxed);
    }

    // =========================================================================
    // Compression events
    // =========================================================================

    /// Records a completed image compression.
    pub fn image_compressed(&self, blocks: u64, bytes: u64) {
        self.images_compressed.fetch_add(1, Ordering::Relaxed);
        self.blocks_encoded.fetch_add(blocks, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(bytes, Ordering::Relaxed);
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    /// Takes a point-in-time copy of all counters.
    pub fn snapshot(&self) -> PoolSnapshot {
        let uptime = self.start_time.elapsed();
        let uptime_secs = uptime.as_secs_f64().max(0.001);

        let tasks_completed = self.tasks_completed.load(Ordering::Relaxed);
        let blocks_encoded = self.blocks_encoded.load(Ordering::Relaxed);
        let queue_wait_us = self.queue_wait_us.load(Ordering::Relaxed);

        let avg_queue_wait = if tasks_completed == 0 {
            Duration::ZERO
        } else {
            Duration::from_micros(queue_wait_us / tasks_completed)
        };

        PoolSnapshot {
            uptime,
            tasks_submitted: self.tasks_submitted.load(Ordering::Relaxed),
            batches_submitted: self.batches_submitted.load(Ordering::Relaxed),
            tasks_completed,
            tasks_panicked: self.tasks_panicked.load(Ordering::Relaxed),
            tasks_active: self.tasks_active.load(Ordering::Relaxed),
            avg_queue_wait,
            images_compressed: self.images_compressed.load(Ordering::Relaxed),
            blocks_encoded,
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            tasks_per_second: tasks_completed as f64 / uptime_secs,
            blocks_per_second: blocks_encoded as f64 / uptime_secs,
        }
    }
}

impl Default for PoolMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PoolMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolMetrics")
            .field("tasks_submitted", &self.tasks_submitted)
            .field("tasks_completed", &self.tasks_completed)
            .field("tasks_active", &self.tasks_active)
            .finish()
    }
}
