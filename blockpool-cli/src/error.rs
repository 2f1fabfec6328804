//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use blockpool::app::AppError;
use blockpool::config::ConfigFileError;
use blockpool::texture::TextureError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to start the application
    App(AppError),
    /// Failed to read or decode the input image
    ImageRead {
        path: String,
        error: image::ImageError,
    },
    /// Image cannot be compressed as requested
    Texture(TextureError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Texture(TextureError::InvalidDimensions { .. }) = self {
            eprintln!();
            eprintln!("Block compression works on 4×4 texel blocks:");
            eprintln!("  1. Width and height must both be multiples of 4");
            eprintln!("  2. Cubemaps (--faces 6) are six equal faces stacked vertically");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::App(e) => write!(f, "{}", e),
            CliError::ImageRead { path, error } => {
                write!(f, "Failed to read image '{}': {}", path, error)
            }
            CliError::Texture(e) => write!(f, "Cannot compress image: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::App(e) => Some(e),
            CliError::ImageRead { error, .. } => Some(error),
            CliError::Texture(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<TextureError> for CliError {
    fn from(e: TextureError) -> Self {
        CliError::Texture(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_error_display() {
        let err = CliError::from(TextureError::UnsupportedFormat("bc1".to_string()));
        assert_eq!(
            err.to_string(),
            "Cannot compress image: Unsupported format: bc1"
        );
    }

    #[test]
    fn test_file_write_display() {
        let err = CliError::FileWrite {
            path: "out.bc7".to_string(),
            error: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write file 'out.bc7': denied");
    }

    #[test]
    fn test_config_error_conversion() {
        let err = CliError::from(ConfigFileError::WriteError("read-only".to_string()));
        assert!(matches!(err, CliError::Config(ref msg) if msg.contains("read-only")));
    }
}
