//! Pixel formats, codec input layouts and compression formats.

use std::fmt;
use std::str::FromStr;

use super::error::TextureError;

/// Pixel format of an uncompressed source image.
///
/// 16-bit channels hold IEEE half floats, the representation the HDR codec
/// expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Red and green, 8 bits each
    Rg8,
    /// Red, green and blue, 8 bits each
    Rgb8,
    /// Red, green, blue and alpha, 8 bits each
    Rgba8,
    /// Red, green and blue, 16 bits each
    Rgb16,
    /// Red, green, blue and alpha, 16 bits each
    Rgba16,
}

impl PixelFormat {
    /// Number of interleaved channels per texel.
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Rg8 => 2,
            PixelFormat::Rgb8 | PixelFormat::Rgb16 => 3,
            PixelFormat::Rgba8 | PixelFormat::Rgba16 => 4,
        }
    }

    /// Bytes per channel.
    pub fn bytes_per_channel(&self) -> usize {
        match self {
            PixelFormat::Rg8 | PixelFormat::Rgb8 | PixelFormat::Rgba8 => 1,
            PixelFormat::Rgb16 | PixelFormat::Rgba16 => 2,
        }
    }

    /// Bytes per texel.
    pub fn bytes_per_texel(&self) -> usize {
        self.channels() * self.bytes_per_channel()
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::Rg8 => write!(f, "RG8"),
            PixelFormat::Rgb8 => write!(f, "RGB8"),
            PixelFormat::Rgba8 => write!(f, "RGBA8"),
            PixelFormat::Rgb16 => write!(f, "RGB16"),
            PixelFormat::Rgba16 => write!(f, "RGBA16"),
        }
    }
}

/// Input layout a [`BlockCodec`](super::BlockCodec) expects for one 4×4 block.
///
/// The dispatcher picks the matching row handler once per image, so the
/// per-block loop never branches on the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockLayout {
    /// Four 8-bit channels read in place from the source rows.
    ///
    /// The codec receives a slice starting at the block's top-left texel and
    /// the source row stride.
    Rgba8,
    /// Two planar 8-bit channels.
    ///
    /// The codec receives 32 bytes: sixteen red values followed by sixteen
    /// green values, each plane row-major with a stride of 4.
    PlanarRg8,
    /// Three packed 16-bit channels.
    ///
    /// The codec receives 96 bytes: sixteen texels of three native-endian
    /// 16-bit values, row-major with a stride of 24 bytes.
    Rgb16,
}

impl BlockLayout {
    /// Returns true if sources of `format` can be fed to this layout.
    pub fn accepts(&self, format: PixelFormat) -> bool {
        match self {
            BlockLayout::Rgba8 => format == PixelFormat::Rgba8,
            BlockLayout::PlanarRg8 => {
                format.bytes_per_channel() == 1 && format.channels() >= 2
            }
            BlockLayout::Rgb16 => format.bytes_per_channel() == 2 && format.channels() >= 3,
        }
    }
}

/// Block compression formats with a shipped codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionFormat {
    /// BC5: two-channel (red/green), e.g. normal maps
    Bc5,
    /// BC6H: unsigned half-float RGB
    Bc6h,
    /// BC7: high-quality RGBA
    Bc7,
}

impl CompressionFormat {
    /// All formats, in display order.
    pub const ALL: [CompressionFormat; 3] = [
        CompressionFormat::Bc5,
        CompressionFormat::Bc6h,
        CompressionFormat::Bc7,
    ];

    /// Lowercase identifier used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionFormat::Bc5 => "bc5",
            CompressionFormat::Bc6h => "bc6h",
            CompressionFormat::Bc7 => "bc7",
        }
    }

    /// Codec input layout for this format.
    pub fn layout(&self) -> BlockLayout {
        match self {
            CompressionFormat::Bc5 => BlockLayout::PlanarRg8,
            CompressionFormat::Bc6h => BlockLayout::Rgb16,
            CompressionFormat::Bc7 => BlockLayout::Rgba8,
        }
    }

    /// Source pixel format to convert decoded images to before compressing.
    pub fn source_format(&self) -> PixelFormat {
        match self {
            CompressionFormat::Bc5 => PixelFormat::Rgb8,
            CompressionFormat::Bc6h => PixelFormat::Rgb16,
            CompressionFormat::Bc7 => PixelFormat::Rgba8,
        }
    }
}

impl fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionFormat::Bc5 => write!(f, "BC5"),
            CompressionFormat::Bc6h => write!(f, "BC6H"),
            CompressionFormat::Bc7 => write!(f, "BC7"),
        }
    }
}

impl FromStr for CompressionFormat {
    type Err = TextureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        CompressionFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == lowered)
            .ok_or_else(|| TextureError::UnsupportedFormat(s.to_string()))
    }
}
