//! Configuration settings structs.

use crate::pool::default_thread_count;
use crate::texture::{CompressionFormat, DEFAULT_QUALITY};

use super::defaults::{DEFAULT_ALPHA, DEFAULT_FORMAT, DEFAULT_THREADS};

/// Complete configuration file contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub pool: PoolSettings,
    pub compression: CompressionSettings,
}

/// `[pool]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Worker thread count (0 = available parallelism)
    pub threads: usize,
}

impl PoolSettings {
    /// Thread count with `0` resolved to the machine's parallelism.
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            default_thread_count()
        } else {
            self.threads
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
        }
    }
}

/// `[compression]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionSettings {
    pub format: CompressionFormat,
    /// Encoder quality in `[0.0, 1.0]`
    pub quality: f32,
    /// Use the alpha-aware BC7 presets
    pub alpha: bool,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT,
            quality: DEFAULT_QUALITY,
            alpha: DEFAULT_ALPHA,
        }
    }
}
