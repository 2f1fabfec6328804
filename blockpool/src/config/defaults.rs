//! Default configuration values.

use crate::texture::CompressionFormat;

/// Worker threads; 0 means one per available core.
pub const DEFAULT_THREADS: usize = 0;

/// Compression format used when none is configured.
pub const DEFAULT_FORMAT: CompressionFormat = CompressionFormat::Bc7;

/// Whether BC7 uses the alpha-aware presets by default.
pub const DEFAULT_ALPHA: bool = false;
