//! Row-granularity compression jobs and their per-layout handlers.
//!
//! One job encodes one horizontal strip of 4×4 blocks spanning the full image
//! width. The [`RowEncoder`] variant is chosen once per dispatch from the
//! codec's [`BlockLayout`] and the source [`PixelFormat`], so the per-block
//! loop of each variant is free of format checks.

use super::codec::{BlockCodec, BLOCK_BYTES, BLOCK_DIM};
use super::error::TextureError;
use super::format::{BlockLayout, PixelFormat};

/// Texels in one 4×4 block.
const BLOCK_TEXELS: usize = BLOCK_DIM * BLOCK_DIM;

/// Bytes in one packed RGB16 texel.
const RGB16_TEXEL: usize = 6;

/// Parameters for encoding one block row.
///
/// `src` is the four source texel rows of the strip and `dst` is exactly the
/// strip's `block_count_x * 16` destination bytes. No two jobs of a dispatch
/// share a destination byte.
pub struct RowCompressionJob<'a, O> {
    /// Block row index within the face.
    pub row: usize,
    /// Blocks across the image.
    pub block_count_x: usize,
    /// Image width in texels.
    pub width: usize,
    /// Interleaved channels per source texel.
    pub channels: usize,
    /// Bytes per source texel.
    pub texel_bytes: usize,
    /// Four source rows, `src_stride` bytes apart.
    pub src: &'a [u8],
    /// Bytes per source texel row.
    pub src_stride: usize,
    /// Destination bytes for this row.
    pub dst: &'a mut [u8],
    /// Codec options shared by every job of the dispatch.
    pub options: &'a O,
}

impl<'a, O> RowCompressionJob<'a, O> {
    /// Destination byte range this job writes, relative to the face start.
    pub fn dst_range(&self) -> std::ops::Range<usize> {
        let start = self.row * self.block_count_x * BLOCK_BYTES;
        start..start + self.block_count_x * BLOCK_BYTES
    }
}

/// Per-layout row handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEncoder {
    /// RGBA8 source fed to the codec in place.
    Passthrough,
    /// Red and green deinterleaved into two 16-byte planes per block.
    PlanarRg,
    /// Three 16-bit channels copied into a packed 96-byte block.
    WidenedRgb16,
}

impl RowEncoder {
    /// Picks the handler feeding `layout` from a `format` source.
    pub fn select(layout: BlockLayout, format: PixelFormat) -> Result<Self, TextureError> {
        if !layout.accepts(format) {
            return Err(TextureError::UnsupportedFormat(format!(
                "{} source for {:?} codec input",
                format, layout
            )));
        }
        Ok(match layout {
            BlockLayout::Rgba8 => RowEncoder::Passthrough,
            BlockLayout::PlanarRg8 => RowEncoder::PlanarRg,
            BlockLayout::Rgb16 => RowEncoder::WidenedRgb16,
        })
    }

    /// Encodes every block of `job`'s row, left to right.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `job.width` is not `block_count_x` blocks
    /// wide.
    pub fn encode_row<C: BlockCodec>(self, codec: &C, job: RowCompressionJob<'_, C::Options>) {
        debug_assert_eq!(
            job.width,
            job.block_count_x * BLOCK_DIM,
            "row width does not match its block count"
        );
        match self {
            RowEncoder::Passthrough => passthrough(codec, job),
            RowEncoder::PlanarRg => planar_rg(codec, job),
            RowEncoder::WidenedRgb16 => widened_rgb16(codec, job),
        }
    }
}

fn passthrough<C: BlockCodec>(codec: &C, job: RowCompressionJob<'_, C::Options>) {
    let block_span = BLOCK_DIM * job.texel_bytes;
    for (bx, dst) in job
        .dst
        .chunks_exact_mut(BLOCK_BYTES)
        .take(job.block_count_x)
        .enumerate()
    {
        codec.encode_block(&job.src[bx * block_span..], job.src_stride, dst, job.options);
    }
}

fn planar_rg<C: BlockCodec>(codec: &C, job: RowCompressionJob<'_, C::Options>) {
    let mut planes = [0u8; BLOCK_TEXELS * 2];
    for (bx, dst) in job
        .dst
        .chunks_exact_mut(BLOCK_BYTES)
        .take(job.block_count_x)
        .enumerate()
    {
        let x0 = bx * BLOCK_DIM;
        for y in 0..BLOCK_DIM {
            let row = &job.src[y * job.src_stride..];
            for x in 0..BLOCK_DIM {
                let texel = (x0 + x) * job.channels;
                let i = y * BLOCK_DIM + x;
                planes[i] = row[texel];
                planes[BLOCK_TEXELS + i] = row[texel + 1];
            }
        }
        codec.encode_block(&planes, BLOCK_DIM, dst, job.options);
    }
}

fn widened_rgb16<C: BlockCodec>(codec: &C, job: RowCompressionJob<'_, C::Options>) {
    let mut block = [0u8; BLOCK_TEXELS * RGB16_TEXEL];
    for (bx, dst) in job
        .dst
        .chunks_exact_mut(BLOCK_BYTES)
        .take(job.block_count_x)
        .enumerate()
    {
        let x0 = bx * BLOCK_DIM;
        for y in 0..BLOCK_DIM {
            let row = &job.src[y * job.src_stride..];
            for x in 0..BLOCK_DIM {
                let texel = (x0 + x) * job.texel_bytes;
                let out = (y * BLOCK_DIM + x) * RGB16_TEXEL;
                block[out..out + RGB16_TEXEL].copy_from_slice(&row[texel..texel + RGB16_TEXEL]);
            }
        }
        codec.encode_block(&block, BLOCK_DIM * RGB16_TEXEL, dst, job.options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Records every block the handler passes to the codec.
    struct Recorder {
        layout: BlockLayout,
        input_bytes: usize,
        seen: Mutex<Vec<(Vec<u8>, usize)>>,
    }

    impl Recorder {
        fn new(layout: BlockLayout, input_bytes: usize) -> Self {
            Self {
                layout,
                input_bytes,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl BlockCodec for Recorder {
        type Options = u8;

        fn name(&self) -> &str {
            "recorder"
        }

        fn layout(&self) -> BlockLayout {
            self.layout
        }

        fn create_options(&self) -> u8 {
            0
        }

        fn set_quality(&self, _options: &mut u8, _quality: f32) {}

        fn encode_block(&self, src: &[u8], stride: usize, dst: &mut [u8], options: &u8) {
            let take = self.input_bytes.min(src.len());
            self.seen.lock().push((src[..take].to_vec(), stride));
            dst[..BLOCK_BYTES].fill(*options);
        }
    }

    fn job<'a>(
        format: PixelFormat,
        width: usize,
        src: &'a [u8],
        dst: &'a mut [u8],
        options: &'a u8,
    ) -> RowCompressionJob<'a, u8> {
        RowCompressionJob {
            row: 0,
            block_count_x: width / BLOCK_DIM,
            width,
            channels: format.channels(),
            texel_bytes: format.bytes_per_texel(),
            src,
            src_stride: width * format.bytes_per_texel(),
            dst,
            options,
        }
    }

    #[test]
    fn test_select_matches_layout() {
        assert_eq!(
            RowEncoder::select(BlockLayout::Rgba8, PixelFormat::Rgba8),
            Ok(RowEncoder::Passthrough)
        );
        assert_eq!(
            RowEncoder::select(BlockLayout::PlanarRg8, PixelFormat::Rgb8),
            Ok(RowEncoder::PlanarRg)
        );
        assert_eq!(
            RowEncoder::select(BlockLayout::Rgb16, PixelFormat::Rgba16),
            Ok(RowEncoder::WidenedRgb16)
        );
    }

    #[test]
    fn test_select_rejects_mismatched_source() {
        assert!(matches!(
            RowEncoder::select(BlockLayout::Rgba8, PixelFormat::Rgb8),
            Err(TextureError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            RowEncoder::select(BlockLayout::Rgb16, PixelFormat::Rgba8),
            Err(TextureError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_passthrough_points_at_each_block() {
        // 8 texels wide RGBA8: two blocks, texel value = x
        let width = 8;
        let mut src = vec![0u8; width * 4 * 4];
        for y in 0..4 {
            for x in 0..width {
                src[(y * width + x) * 4] = x as u8;
            }
        }
        let mut dst = vec![0u8; 32];
        let codec = Recorder::new(BlockLayout::Rgba8, 1);

        RowEncoder::Passthrough.encode_row(
            &codec,
            job(PixelFormat::Rgba8, width, &src, &mut dst, &7),
        );

        let seen = codec.seen.lock();
        assert_eq!(*seen, vec![(vec![0], 32), (vec![4], 32)]);
        assert!(dst.iter().all(|&b| b == 7));
    }

    #[test]
    fn test_planar_rg_deinterleaves_rgb8() {
        // 4×4 RGB8 block: red = texel index, green = 100 + index, blue = 255
        let mut src = Vec::new();
        for i in 0..16u8 {
            src.extend_from_slice(&[i, 100 + i, 255]);
        }
        let mut dst = vec![0u8; 16];
        let codec = Recorder::new(BlockLayout::PlanarRg8, 32);

        RowEncoder::PlanarRg.encode_row(&codec, job(PixelFormat::Rgb8, 4, &src, &mut dst, &1));

        let seen = codec.seen.lock();
        assert_eq!(seen.len(), 1);
        let (planes, stride) = &seen[0];
        assert_eq!(*stride, 4);
        assert_eq!(&planes[..16], &(0..16).collect::<Vec<u8>>()[..]);
        assert_eq!(&planes[16..], &(100..116).collect::<Vec<u8>>()[..]);
    }

    #[test]
    fn test_widened_rgb16_drops_alpha() {
        // 4×4 RGBA16: each channel = (texel << 4) | channel, alpha must vanish
        let mut src = Vec::new();
        for t in 0..16u16 {
            for c in 0..4u16 {
                src.extend_from_slice(&((t << 4) | c).to_ne_bytes());
            }
        }
        let mut dst = vec![0u8; 16];
        let codec = Recorder::new(BlockLayout::Rgb16, 96);

        RowEncoder::WidenedRgb16.encode_row(
            &codec,
            job(PixelFormat::Rgba16, 4, &src, &mut dst, &1),
        );

        let seen = codec.seen.lock();
        let (block, stride) = &seen[0];
        assert_eq!(*stride, 24);
        for t in 0..16u16 {
            for c in 0..3u16 {
                let at = (t as usize * 3 + c as usize) * 2;
                let value = u16::from_ne_bytes([block[at], block[at + 1]]);
                assert_eq!(value, (t << 4) | c);
            }
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "row width does not match")]
    fn test_width_must_match_block_count() {
        let src = vec![0u8; 8 * 4 * 4];
        let mut dst = vec![0u8; 32];
        let codec = Recorder::new(BlockLayout::Rgba8, 1);
        let mut job = job(PixelFormat::Rgba8, 8, &src, &mut dst, &0);
        job.width = 6;

        RowEncoder::Passthrough.encode_row(&codec, job);
    }

    #[test]
    fn test_dst_range() {
        let src = [0u8; 0];
        let mut dst = [0u8; 0];
        let job = RowCompressionJob {
            row: 3,
            block_count_x: 5,
            width: 20,
            channels: 4,
            texel_bytes: 4,
            src: &src,
            src_stride: 80,
            dst: &mut dst,
            options: &(),
        };
        assert_eq!(job.dst_range(), 240..320);
    }
}
