//! Error types for texture compression operations.

use std::fmt;

/// Errors that can occur while preparing or dispatching a compression.
///
/// All of them are detected before any row task is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// Image dimensions are invalid for block compression.
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: String,
    },
    /// Source pixel format cannot feed the selected codec, or the format
    /// name is unknown.
    UnsupportedFormat(String),
    /// Source pixel buffer is shorter than its geometry requires.
    SourceTooSmall { required: usize, actual: usize },
    /// Destination buffer cannot hold every compressed block.
    DestinationTooSmall { required: usize, actual: usize },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::InvalidDimensions {
                width,
                height,
                reason,
            } => {
                write!(f, "Invalid dimensions {}×{}: {}", width, height, reason)
            }
            TextureError::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
            TextureError::SourceTooSmall { required, actual } => write!(
                f,
                "Source buffer too small: {} bytes (need {})",
                actual, required
            ),
            TextureError::DestinationTooSmall { required, actual } => write!(
                f,
                "Destination buffer too small: {} bytes (need {})",
                actual, required
            ),
        }
    }
}

impl std::error::Error for TextureError {}
