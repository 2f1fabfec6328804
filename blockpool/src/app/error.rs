//! Application error types.

use std::fmt;

use crate::config::ConfigFileError;
use crate::pool::PoolError;

/// Errors that can occur during application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// Failed to start the worker pool.
    PoolStart(PoolError),

    /// Failed to load the configuration file.
    Config(ConfigFileError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::PoolStart(e) => write!(f, "Failed to start worker pool: {}", e),
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::PoolStart(e) => Some(e),
            AppError::Config(e) => Some(e),
        }
    }
}

impl From<PoolError> for AppError {
    fn from(e: PoolError) -> Self {
        AppError::PoolStart(e)
    }
}

impl From<ConfigFileError> for AppError {
    fn from(e: ConfigFileError) -> Self {
        AppError::Config(e)
    }
}
