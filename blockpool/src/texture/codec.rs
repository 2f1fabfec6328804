//! Block codec abstraction.
//!
//! A [`BlockCodec`] turns one 4×4 texel block into a 16-byte compressed block.
//! The dispatcher owns the parallelism; a codec only ever sees one block at a
//! time and never allocates per block.

use super::format::BlockLayout;

/// Texels per block edge.
pub const BLOCK_DIM: usize = 4;

/// Bytes per compressed block.
pub const BLOCK_BYTES: usize = 16;

/// Quality used when the caller does not pick one (0.0 = fastest, 1.0 = best).
pub const DEFAULT_QUALITY: f32 = 0.5;

/// Encoder for one 4×4 block compression format.
///
/// Options hold the format-specific encoder configuration. They are created
/// once per image with [`create_options`](Self::create_options), tuned with
/// [`set_quality`](Self::set_quality), shared read-only by every row task,
/// and dropped after the last face.
///
/// # Example
///
/// ```
/// use blockpool::texture::{BlockCodec, BlockLayout, BLOCK_BYTES};
///
/// /// Writes the block's first red value into every output byte.
/// struct FirstTexel;
///
/// impl BlockCodec for FirstTexel {
///     type Options = ();
///
///     fn name(&self) -> &str {
///         "first-texel"
///     }
///
///     fn layout(&self) -> BlockLayout {
///         BlockLayout::Rgba8
///     }
///
///     fn create_options(&self) -> Self::Options {}
///
///     fn set_quality(&self, _options: &mut Self::Options, _quality: f32) {}
///
///     fn encode_block(&self, src: &[u8], _stride: usize, dst: &mut [u8], _options: &()) {
///         dst[..BLOCK_BYTES].fill(src[0]);
///     }
/// }
/// ```
pub trait BlockCodec: Send + Sync {
    /// Encoder configuration shared by all tasks of one dispatch.
    type Options: Send + Sync;

    /// Human-readable codec name for logging.
    fn name(&self) -> &str;

    /// Input layout `encode_block` expects.
    fn layout(&self) -> BlockLayout;

    /// Creates encoder options at the codec's default quality.
    fn create_options(&self) -> Self::Options;

    /// Adjusts `options` for a quality in `[0.0, 1.0]`.
    fn set_quality(&self, options: &mut Self::Options, quality: f32);

    /// Encodes one block.
    ///
    /// `src` starts at the block's first texel in the format described by
    /// [`layout`](Self::layout), with rows `src_stride` bytes apart. Exactly
    /// [`BLOCK_BYTES`] bytes are written to the start of `dst`.
    fn encode_block(&self, src: &[u8], src_stride: usize, dst: &mut [u8], options: &Self::Options);
}

/// Maps a quality in `[0.0, 1.0]` onto one of `tiers` preset levels.
///
/// Out-of-range and NaN values are clamped to the nearest end.
pub fn quality_tier(quality: f32, tiers: usize) -> usize {
    debug_assert!(tiers > 0);
    let quality = if quality.is_nan() {
        0.0
    } else {
        quality.clamp(0.0, 1.0)
    };
    ((quality * tiers as f32) as usize).min(tiers - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_tier_bounds() {
        assert_eq!(quality_tier(0.0, 5), 0);
        assert_eq!(quality_tier(1.0, 5), 4);
        assert_eq!(quality_tier(-3.0, 5), 0);
        assert_eq!(quality_tier(7.5, 5), 4);
        assert_eq!(quality_tier(f32::NAN, 5), 0);
    }

    #[test]
    fn test_quality_tier_steps() {
        assert_eq!(quality_tier(0.19, 5), 0);
        assert_eq!(quality_tier(0.2, 5), 1);
        assert_eq!(quality_tier(DEFAULT_QUALITY, 5), 2);
        assert_eq!(quality_tier(0.79, 5), 3);
    }

    #[test]
    fn test_single_tier() {
        assert_eq!(quality_tier(0.9, 1), 0);
    }
}
