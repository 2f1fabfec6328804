//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use blockpool::config::{config_file_path, ConfigFile};
use blockpool::texture::CompressionFormat;
use clap::ValueEnum;

use crate::error::CliError;

/// Block compression format selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// BC5: two channels (red/green), e.g. normal maps
    Bc5,
    /// BC6H: half-float RGB for HDR images
    Bc6h,
    /// BC7: high-quality RGBA
    Bc7,
}

impl From<FormatArg> for CompressionFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Bc5 => CompressionFormat::Bc5,
            FormatArg::Bc6h => CompressionFormat::Bc6h,
            FormatArg::Bc7 => CompressionFormat::Bc7,
        }
    }
}

/// Parses a `--faces` value; only single images and cubemaps are supported.
pub fn parse_faces(s: &str) -> Result<u32, String> {
    match s.trim() {
        "1" => Ok(1),
        "6" => Ok(6),
        other => Err(format!("'{}' is not a face count (expected 1 or 6)", other)),
    }
}

/// Parses a `--quality` value in `[0.0, 1.0]`.
pub fn parse_quality(s: &str) -> Result<f32, String> {
    let quality: f32 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !(0.0..=1.0).contains(&quality) {
        return Err(format!("{} is outside 0.0..=1.0", quality));
    }
    Ok(quality)
}

/// Resolves the config file location: explicit path or `~/.blockpool/config.ini`.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path)
}

/// Loads the config file, falling back to defaults when it does not exist.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile, CliError> {
    Ok(ConfigFile::load_from(&resolve_config_path(explicit))?)
}
