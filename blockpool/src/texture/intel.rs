//! Block codecs backed by the ISPC texture compressor (`intel_tex_2`).
//!
//! Each codec wraps a 4×4 block in a tiny surface and hands it to the ISPC
//! kernel. Quality maps onto the encoder's preset tiers.
//!
//! | Codec         | Layout      | Presets (low → high quality)                 |
//! |---------------|-------------|----------------------------------------------|
//! | [`Bc7Codec`]  | `Rgba8`     | ultra fast, very fast, fast, basic, slow     |
//! | [`Bc5Codec`]  | `PlanarRg8` | none                                         |
//! | [`Bc6hCodec`] | `Rgb16`     | very fast, fast, basic, slow, very slow      |

use intel_tex_2::{bc5, bc6h, bc7, RgSurface, RgbaSurface};

use super::codec::{quality_tier, BlockCodec, BLOCK_BYTES, BLOCK_DIM, DEFAULT_QUALITY};
use super::format::{BlockLayout, CompressionFormat};

/// Half-float 1.0, used as alpha when widening RGB16 blocks for BC6H.
const HALF_ONE: u16 = 0x3C00;

/// Number of preset tiers exposed by the BC7 and BC6H encoders.
const PRESET_TIERS: usize = 5;

/// Copies four rows of `row_bytes` bytes, `stride` apart, into `out`.
fn gather_rows(src: &[u8], stride: usize, row_bytes: usize, out: &mut [u8]) {
    for (y, row) in out.chunks_exact_mut(row_bytes).take(BLOCK_DIM).enumerate() {
        let start = y * stride;
        row.copy_from_slice(&src[start..start + row_bytes]);
    }
}

// =============================================================================
// BC7
// =============================================================================

/// BC7 encoder options.
pub struct Bc7Options {
    settings: bc7::EncodeSettings,
}

/// BC7 codec for RGBA8 sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bc7Codec {
    alpha: bool,
}

impl Bc7Codec {
    /// Codec using the opaque presets (alpha is ignored).
    pub fn opaque() -> Self {
        Self { alpha: false }
    }

    /// Codec using the alpha-aware presets.
    pub fn alpha() -> Self {
        Self { alpha: true }
    }

    /// Returns true if the alpha-aware presets are used.
    pub fn has_alpha(&self) -> bool {
        self.alpha
    }

    fn settings_for(&self, quality: f32) -> bc7::EncodeSettings {
        match (self.alpha, quality_tier(quality, PRESET_TIERS)) {
            (false, 0) => bc7::opaque_ultra_fast_settings(),
            (false, 1) => bc7::opaque_very_fast_settings(),
            (false, 2) => bc7::opaque_fast_settings(),
            (false, 3) => bc7::opaque_basic_settings(),
            (false, _) => bc7::opaque_slow_settings(),
            (true, 0) => bc7::alpha_ultra_fast_settings(),
            (true, 1) => bc7::alpha_very_fast_settings(),
            (true, 2) => bc7::alpha_fast_settings(),
            (true, 3) => bc7::alpha_basic_settings(),
            (true, _) => bc7::alpha_slow_settings(),
        }
    }
}

impl BlockCodec for Bc7Codec {
    type Options = Bc7Options;

    fn name(&self) -> &str {
        if self.alpha {
            "BC7 (alpha)"
        } else {
            "BC7"
        }
    }

    fn layout(&self) -> BlockLayout {
        BlockLayout::Rgba8
    }

    fn create_options(&self) -> Bc7Options {
        Bc7Options {
            settings: self.settings_for(DEFAULT_QUALITY),
        }
    }

    fn set_quality(&self, options: &mut Bc7Options, quality: f32) {
        options.settings = self.settings_for(quality);
    }

    fn encode_block(&self, src: &[u8], src_stride: usize, dst: &mut [u8], options: &Bc7Options) {
        const ROW_BYTES: usize = BLOCK_DIM * 4;
        let mut block = [0u8; ROW_BYTES * BLOCK_DIM];
        gather_rows(src, src_stride, ROW_BYTES, &mut block);

        let surface = RgbaSurface {
            data: &block,
            width: BLOCK_DIM as u32,
            height: BLOCK_DIM as u32,
            stride: ROW_BYTES as u32,
        };
        bc7::compress_blocks_into(&options.settings, &surface, &mut dst[..BLOCK_BYTES]);
    }
}

// =============================================================================
// BC5
// =============================================================================

/// BC5 codec for two-channel sources.
///
/// The ISPC BC5 kernel has no quality presets; `set_quality` is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bc5Codec;

impl Bc5Codec {
    pub fn new() -> Self {
        Self
    }
}

impl BlockCodec for Bc5Codec {
    type Options = ();

    fn name(&self) -> &str {
        "BC5"
    }

    fn layout(&self) -> BlockLayout {
        BlockLayout::PlanarRg8
    }

    fn create_options(&self) {}

    fn set_quality(&self, _options: &mut (), _quality: f32) {}

    fn encode_block(&self, src: &[u8], src_stride: usize, dst: &mut [u8], _options: &()) {
        const TEXELS: usize = BLOCK_DIM * BLOCK_DIM;
        let (red, green) = src[..TEXELS * 2].split_at(TEXELS);

        // The kernel wants interleaved RG texels.
        let mut block = [0u8; TEXELS * 2];
        for y in 0..BLOCK_DIM {
            for x in 0..BLOCK_DIM {
                let plane = y * src_stride + x;
                let texel = (y * BLOCK_DIM + x) * 2;
                block[texel] = red[plane];
                block[texel + 1] = green[plane];
            }
        }

        let surface = RgSurface {
            data: &block,
            width: BLOCK_DIM as u32,
            height: BLOCK_DIM as u32,
            stride: (BLOCK_DIM * 2) as u32,
        };
        bc5::compress_blocks_into(&surface, &mut dst[..BLOCK_BYTES]);
    }
}

// =============================================================================
// BC6H
// =============================================================================

/// BC6H encoder options.
pub struct Bc6hOptions {
    settings: bc6h::EncodeSettings,
}

/// BC6H codec for half-float RGB sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bc6hCodec;

impl Bc6hCodec {
    pub fn new() -> Self {
        Self
    }

    fn settings_for(quality: f32) -> bc6h::EncodeSettings {
        match quality_tier(quality, PRESET_TIERS) {
            0 => bc6h::very_fast_settings(),
            1 => bc6h::fast_settings(),
            2 => bc6h::basic_settings(),
            3 => bc6h::slow_settings(),
            _ => bc6h::very_slow_settings(),
        }
    }
}

impl BlockCodec for Bc6hCodec {
    type Options = Bc6hOptions;

    fn name(&self) -> &str {
        "BC6H"
    }

    fn layout(&self) -> BlockLayout {
        BlockLayout::Rgb16
    }

    fn create_options(&self) -> Bc6hOptions {
        Bc6hOptions {
            settings: Self::settings_for(DEFAULT_QUALITY),
        }
    }

    fn set_quality(&self, options: &mut Bc6hOptions, quality: f32) {
        options.settings = Self::settings_for(quality);
    }

    fn encode_block(&self, src: &[u8], src_stride: usize, dst: &mut [u8], options: &Bc6hOptions) {
        const SRC_TEXEL: usize = 6;
        const DST_TEXEL: usize = 8;
        let alpha = HALF_ONE.to_ne_bytes();

        // The kernel reads RGBA half floats; pad each packed RGB texel.
        let mut block = [0u8; BLOCK_DIM * BLOCK_DIM * DST_TEXEL];
        for y in 0..BLOCK_DIM {
            let row = &src[y * src_stride..];
            for x in 0..BLOCK_DIM {
                let texel = &mut block[(y * BLOCK_DIM + x) * DST_TEXEL..][..DST_TEXEL];
                texel[..SRC_TEXEL].copy_from_slice(&row[x * SRC_TEXEL..][..SRC_TEXEL]);
                texel[SRC_TEXEL..].copy_from_slice(&alpha);
            }
        }

        let surface = RgbaSurface {
            data: &block,
            width: BLOCK_DIM as u32,
            height: BLOCK_DIM as u32,
            stride: (BLOCK_DIM * DST_TEXEL) as u32,
        };
        bc6h::compress_blocks_into(&options.settings, &surface, &mut dst[..BLOCK_BYTES]);
    }
}

/// Runs `f` with the shipped codec for `format`.
///
/// Codecs have different option types, so callers that pick the format at
/// runtime go through a [`CodecVisitor`] instead of a trait object.
pub fn with_codec<V: CodecVisitor>(format: CompressionFormat, alpha: bool, visitor: V) -> V::Output {
    match format {
        CompressionFormat::Bc5 => visitor.visit(&Bc5Codec::new()),
        CompressionFormat::Bc6h => visitor.visit(&Bc6hCodec::new()),
        CompressionFormat::Bc7 if alpha => visitor.visit(&Bc7Codec::alpha()),
        CompressionFormat::Bc7 => visitor.visit(&Bc7Codec::opaque()),
    }
}

/// Callback invoked by [`with_codec`] with a concrete codec type.
pub trait CodecVisitor {
    type Output;

    fn visit<C: BlockCodec>(self, codec: &C) -> Self::Output;
}
