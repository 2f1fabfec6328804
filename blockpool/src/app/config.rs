//! Application configuration for BlockPoolApp.

use crate::config::ConfigFile;
use crate::pool::default_thread_count;
use crate::texture::{CompressionFormat, DEFAULT_QUALITY};

/// Top-level configuration passed to [`BlockPoolApp::start`](super::BlockPoolApp::start).
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Worker threads to start.
    pub threads: usize,

    /// Default compression format for callers that do not choose one.
    pub format: CompressionFormat,

    /// Quality handed to every dispatcher.
    pub quality: f32,

    /// Use the alpha-aware BC7 presets.
    pub alpha: bool,
}

impl AppConfig {
    /// Builds the application config from a loaded config file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            threads: config.pool.effective_threads(),
            format: config.compression.format,
            quality: config.compression.quality,
            alpha: config.compression.alpha,
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_format(mut self, format: CompressionFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            threads: default_thread_count(),
            format: CompressionFormat::Bc7,
            quality: DEFAULT_QUALITY,
            alpha: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_file_resolves_auto_threads() {
        let mut file = ConfigFile::default();
        file.compression.format = CompressionFormat::Bc5;
        file.compression.quality = 0.1;

        let config = AppConfig::from_config_file(&file);
        assert_eq!(config.threads, default_thread_count());
        assert_eq!(config.format, CompressionFormat::Bc5);
        assert_eq!(config.quality, 0.1);
    }

    #[test]
    fn test_builders() {
        let config = AppConfig::default()
            .with_threads(3)
            .with_format(CompressionFormat::Bc6h)
            .with_quality(1.0);
        assert_eq!(config.threads, 3);
        assert_eq!(config.format, CompressionFormat::Bc6h);
        assert_eq!(config.quality, 1.0);
    }
}
