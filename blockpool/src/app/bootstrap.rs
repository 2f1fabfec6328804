//! Application bootstrap implementation.

use tracing::info;

use crate::pool::WorkerPool;
use crate::telemetry::PoolSnapshot;
use crate::texture::CompressionDispatcher;

use super::config::AppConfig;
use super::error::AppError;

/// Running application: the started worker pool plus its configuration.
///
/// Created once at process start. Dropping it without calling
/// [`shutdown`](Self::shutdown) still stops the pool.
pub struct BlockPoolApp {
    config: AppConfig,
    pool: WorkerPool,
}

impl BlockPoolApp {
    /// Starts the worker pool described by `config`.
    pub fn start(config: AppConfig) -> Result<Self, AppError> {
        info!(
            threads = config.threads,
            format = %config.format,
            quality = config.quality,
            "Starting blockpool"
        );

        let pool = WorkerPool::new();
        pool.start(config.threads)?;

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Dispatcher bound to the application's pool at the configured quality.
    pub fn dispatcher(&self) -> CompressionDispatcher<'_> {
        CompressionDispatcher::new(&self.pool).with_quality(self.config.quality)
    }

    pub fn metrics(&self) -> PoolSnapshot {
        self.pool.metrics()
    }

    /// Stops the worker pool and logs the final pool statistics.
    pub fn shutdown(self) {
        info!("Shutting down blockpool");
        self.pool.stop();
        info!(stats = %self.pool.metrics(), "blockpool shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{BlockCodec, BlockLayout, PixelFormat, SourceImage, BLOCK_BYTES};

    struct Fill;

    impl BlockCodec for Fill {
        type Options = u8;

        fn name(&self) -> &str {
            "fill"
        }

        fn layout(&self) -> BlockLayout {
            BlockLayout::Rgba8
        }

        fn create_options(&self) -> u8 {
            0
        }

        fn set_quality(&self, options: &mut u8, quality: f32) {
            *options = (quality * 10.0) as u8;
        }

        fn encode_block(&self, _src: &[u8], _stride: usize, dst: &mut [u8], options: &u8) {
            dst[..BLOCK_BYTES].fill(*options);
        }
    }

    #[test]
    fn test_start_and_shutdown() {
        let app = BlockPoolApp::start(AppConfig::default().with_threads(2)).unwrap();
        assert!(app.pool().is_running());
        assert_eq!(app.pool().thread_count(), 2);
        app.shutdown();
    }

    #[test]
    fn test_start_with_zero_threads_fails() {
        let result = BlockPoolApp::start(AppConfig::default().with_threads(0));
        assert!(matches!(result, Err(AppError::PoolStart(_))));
    }

    #[test]
    fn test_dispatcher_uses_configured_quality() {
        let app =
            BlockPoolApp::start(AppConfig::default().with_threads(2).with_quality(0.3)).unwrap();
        let pixels = vec![0u8; 8 * 8 * 4];
        let image = SourceImage::new(&pixels, 8, 8, PixelFormat::Rgba8);

        let blocks = app.dispatcher().compress_to_vec(&Fill, &image).unwrap();

        assert!(blocks.iter().all(|&b| b == 3));
        assert_eq!(app.metrics().images_compressed, 1);
        app.shutdown();
    }
}
