//! Application bootstrap and lifecycle management.
//!
//! [`BlockPoolApp`] is the composition root that owns the process-wide
//! [`WorkerPool`](crate::pool::WorkerPool). It starts the workers once,
//! hands out [`CompressionDispatcher`](crate::texture::CompressionDispatcher)s
//! bound to them, and stops them on shutdown.
//!
//! ```text
//! ConfigFile ──► AppConfig ──► BlockPoolApp::start ──► WorkerPool::start(n)
//!                                   │
//!                                   ├── dispatcher() ──► CompressionDispatcher
//!                                   └── shutdown()   ──► WorkerPool::stop
//! ```
//!
//! # Example
//!
//! ```
//! use blockpool::app::{AppConfig, BlockPoolApp};
//!
//! let app = BlockPoolApp::start(AppConfig::default().with_threads(2)).unwrap();
//! assert_eq!(app.pool().thread_count(), 2);
//! app.shutdown();
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::BlockPoolApp;
pub use config::AppConfig;
pub use error::AppError;
