//! Block-parallel compression of one image on a [`WorkerPool`].
//!
//! Faces are compressed one after another. Within a face every block row is
//! one task, all submitted as a single batch under the face's join scope:
//!
//! ```text
//! face f ──► rows 0..block_count_y ──► submit_batch ──► wait ──► face f+1
//!             src: 4 texel rows each
//!             dst: block_count_x × 16 bytes each (disjoint)
//! ```

use std::time::{Duration, Instant};

use tracing::{debug, debug_span, info};

use crate::pool::WorkerPool;

use super::codec::{BlockCodec, BLOCK_BYTES, BLOCK_DIM, DEFAULT_QUALITY};
use super::error::TextureError;
use super::image::SourceImage;
use super::row::{RowCompressionJob, RowEncoder};

/// Summary of one completed dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    /// Faces compressed
    pub faces: u32,
    /// Row tasks submitted per face
    pub rows_per_face: usize,
    /// Blocks encoded across all faces
    pub blocks: usize,
    /// Compressed bytes written
    pub bytes: usize,
    /// Wall time of the dispatch
    pub elapsed: Duration,
}

/// Drives a [`BlockCodec`] over every block of an image using a shared pool.
///
/// # Example
///
/// ```
/// use blockpool::pool::WorkerPool;
/// use blockpool::texture::{
///     BlockCodec, BlockLayout, CompressionDispatcher, PixelFormat, SourceImage, BLOCK_BYTES,
/// };
///
/// struct Marker;
///
/// impl BlockCodec for Marker {
///     type Options = ();
///     fn name(&self) -> &str { "marker" }
///     fn layout(&self) -> BlockLayout { BlockLayout::Rgba8 }
///     fn create_options(&self) {}
///     fn set_quality(&self, _: &mut (), _: f32) {}
///     fn encode_block(&self, _: &[u8], _: usize, dst: &mut [u8], _: &()) {
///         dst[..BLOCK_BYTES].fill(0xAB);
///     }
/// }
///
/// let pool = WorkerPool::new();
/// pool.start(2).unwrap();
///
/// let pixels = vec![0u8; 8 * 8 * 4];
/// let image = SourceImage::new(&pixels, 8, 8, PixelFormat::Rgba8);
///
/// let dispatcher = CompressionDispatcher::new(&pool);
/// let blocks = dispatcher.compress_to_vec(&Marker, &image).unwrap();
/// assert_eq!(blocks, vec![0xAB; 64]);
/// pool.stop();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CompressionDispatcher<'pool> {
    pool: &'pool WorkerPool,
    quality: f32,
}

impl<'pool> CompressionDispatcher<'pool> {
    /// Dispatcher at [`DEFAULT_QUALITY`].
    pub fn new(pool: &'pool WorkerPool) -> Self {
        Self {
            pool,
            quality: DEFAULT_QUALITY,
        }
    }

    /// Overrides the quality passed to [`BlockCodec::set_quality`].
    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Compressed size of `image` in bytes (all faces, one level).
    pub fn output_size(image: &SourceImage<'_>) -> usize {
        let blocks_x = image.width() as usize / BLOCK_DIM;
        let blocks_y = image.height() as usize / BLOCK_DIM;
        blocks_x * blocks_y * BLOCK_BYTES * image.faces() as usize
    }

    /// Compresses every face of `image` into `dst`.
    ///
    /// Face `f` is written at `f * output_size / faces`. Returns once every
    /// row task of the last face has finished.
    ///
    /// Width and height must be multiples of 4, the face count 1 or 6 and
    /// the level count 1; these are checked by debug assertions only. Images
    /// smaller than one block, sources the codec cannot read, and undersized
    /// buffers are reported as errors before any task is submitted.
    ///
    /// # Panics
    ///
    /// Panics if the codec panics while encoding a row.
    pub fn compress<C: BlockCodec>(
        &self,
        codec: &C,
        image: &SourceImage<'_>,
        dst: &mut [u8],
    ) -> Result<CompressionStats, TextureError> {
        let (width, height) = (image.width(), image.height());
        if (width as usize) < BLOCK_DIM || (height as usize) < BLOCK_DIM {
            return Err(TextureError::InvalidDimensions {
                width,
                height,
                reason: "image is smaller than one block".to_string(),
            });
        }
        debug_assert!(
            width as usize % BLOCK_DIM == 0 && height as usize % BLOCK_DIM == 0,
            "image dimensions {}×{} are not multiples of {}",
            width,
            height,
            BLOCK_DIM
        );
        debug_assert!(
            image.faces() == 1 || image.faces() == 6,
            "unsupported face count {}",
            image.faces()
        );
        debug_assert_eq!(image.levels(), 1, "only single-level images are supported");

        let encoder = RowEncoder::select(codec.layout(), image.format())?;

        let required = image.required_bytes();
        if image.data().len() < required {
            return Err(TextureError::SourceTooSmall {
                required,
                actual: image.data().len(),
            });
        }
        let output = Self::output_size(image);
        if dst.len() < output {
            return Err(TextureError::DestinationTooSmall {
                required: output,
                actual: dst.len(),
            });
        }

        let block_count_x = width as usize / BLOCK_DIM;
        let block_count_y = height as usize / BLOCK_DIM;
        let src_stride = image.row_stride();
        let band = src_stride * BLOCK_DIM;
        let row_bytes = block_count_x * BLOCK_BYTES;
        let face_out = row_bytes * block_count_y;

        let span = debug_span!(
            "compress",
            codec = codec.name(),
            width,
            height,
            faces = image.faces()
        );
        let _enter = span.enter();
        let started = Instant::now();

        let mut options = codec.create_options();
        codec.set_quality(&mut options, self.quality);
        let options = &options;
        let channels = image.channels();
        let texel_bytes = image.format().bytes_per_texel();

        let faces = image.data()[..required]
            .chunks_exact(image.face_bytes())
            .zip(dst[..output].chunks_exact_mut(face_out));

        for (face, (src_face, dst_face)) in faces.enumerate() {
            self.pool.scope(|scope| {
                let rows = src_face
                    .chunks_exact(band)
                    .zip(dst_face.chunks_exact_mut(row_bytes))
                    .take(block_count_y)
                    .enumerate()
                    .map(move |(row, (src, dst))| {
                        let job = RowCompressionJob {
                            row,
                            block_count_x,
                            width: width as usize,
                            channels,
                            texel_bytes,
                            src,
                            src_stride,
                            dst,
                            options,
                        };
                        (row, move |_: usize| encoder.encode_row(codec, job))
                    });
                scope.submit_batch(rows);
            });
            debug!(face, rows = block_count_y, "Face compressed");
        }

        let blocks = block_count_x * block_count_y * image.faces() as usize;
        let elapsed = started.elapsed();
        self.pool
            .metrics_handle()
            .image_compressed(blocks as u64, output as u64);

        info!(
            codec = codec.name(),
            width,
            height,
            faces = image.faces(),
            blocks,
            elapsed_ms = elapsed.as_millis() as u64,
            "Image compressed"
        );

        Ok(CompressionStats {
            faces: image.faces(),
            rows_per_face: block_count_y,
            blocks,
            bytes: output,
            elapsed,
        })
    }

    /// Compresses `image` into a freshly allocated buffer of
    /// [`output_size`](Self::output_size) bytes.
    pub fn compress_to_vec<C: BlockCodec>(
        &self,
        codec: &C,
        image: &SourceImage<'_>,
    ) -> Result<Vec<u8>, TextureError> {
        let mut dst = vec![0u8; Self::output_size(image)];
        self.compress(codec, image, &mut dst)?;
        Ok(dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{BlockLayout, PixelFormat};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Writes a fixed byte into every block.
    struct Marker(u8);

    impl BlockCodec for Marker {
        type Options = ();

        fn name(&self) -> &str {
            "marker"
        }

        fn layout(&self) -> BlockLayout {
            BlockLayout::Rgba8
        }

        fn create_options(&self) {}

        fn set_quality(&self, _options: &mut (), _quality: f32) {}

        fn encode_block(&self, _src: &[u8], _stride: usize, dst: &mut [u8], _options: &()) {
            dst[..BLOCK_BYTES].fill(self.0);
        }
    }

    /// Adds one to every destination byte, so a byte written twice reads 2.
    struct Increment {
        calls: AtomicUsize,
    }

    impl BlockCodec for Increment {
        type Options = ();

        fn name(&self) -> &str {
            "increment"
        }

        fn layout(&self) -> BlockLayout {
            BlockLayout::Rgba8
        }

        fn create_options(&self) {}

        fn set_quality(&self, _options: &mut (), _quality: f32) {}

        fn encode_block(&self, _src: &[u8], _stride: usize, dst: &mut [u8], _options: &()) {
            self.calls.fetch_add(1, Ordering::Relaxed);
            for byte in &mut dst[..BLOCK_BYTES] {
                *byte += 1;
            }
        }
    }

    /// Copies the block's first source byte into the output.
    struct FirstByte {
        layout: BlockLayout,
    }

    impl BlockCodec for FirstByte {
        type Options = f32;

        fn name(&self) -> &str {
            "first-byte"
        }

        fn layout(&self) -> BlockLayout {
            self.layout
        }

        fn create_options(&self) -> f32 {
            0.0
        }

        fn set_quality(&self, options: &mut f32, quality: f32) {
            *options = quality;
        }

        fn encode_block(&self, src: &[u8], _stride: usize, dst: &mut [u8], quality: &f32) {
            dst[0] = src[0];
            dst[1] = (*quality * 100.0) as u8;
        }
    }

    fn started_pool(threads: usize) -> WorkerPool {
        let pool = WorkerPool::new();
        pool.start(threads).unwrap();
        pool
    }

    #[test]
    fn test_output_size_single_face() {
        let pixels = vec![0u8; 8 * 8 * 4];
        let image = SourceImage::new(&pixels, 8, 8, PixelFormat::Rgba8);
        assert_eq!(CompressionDispatcher::output_size(&image), 64);
    }

    #[test]
    fn test_output_size_cubemap() {
        let pixels = vec![0u8; 8 * 8 * 4 * 6];
        let image = SourceImage::cubemap(&pixels, 8, 8, PixelFormat::Rgba8);
        assert_eq!(CompressionDispatcher::output_size(&image), 384);
    }

    #[test]
    fn test_marker_fills_every_block() {
        let pool = started_pool(4);
        let pixels = vec![0u8; 16 * 16 * 4];
        let image = SourceImage::new(&pixels, 16, 16, PixelFormat::Rgba8);

        let blocks = CompressionDispatcher::new(&pool)
            .compress_to_vec(&Marker(0x5A), &image)
            .unwrap();

        assert_eq!(blocks.len(), 256);
        assert!(blocks.iter().all(|&b| b == 0x5A));
        pool.stop();
    }

    #[test]
    fn test_each_destination_byte_written_once() {
        let pool = started_pool(4);
        let pixels = vec![0u8; 32 * 24 * 4 * 6];
        let image = SourceImage::cubemap(&pixels, 32, 24, PixelFormat::Rgba8);
        let codec = Increment {
            calls: AtomicUsize::new(0),
        };

        // Extra tail bytes must stay untouched
        let output = CompressionDispatcher::output_size(&image);
        let mut dst = vec![0u8; output + 16];
        let stats = CompressionDispatcher::new(&pool)
            .compress(&codec, &image, &mut dst)
            .unwrap();

        assert!(dst[..output].iter().all(|&b| b == 1));
        assert!(dst[output..].iter().all(|&b| b == 0));
        assert_eq!(codec.calls.load(Ordering::Relaxed), 8 * 6 * 6);
        assert_eq!(stats.blocks, 8 * 6 * 6);
        assert_eq!(stats.rows_per_face, 6);
        assert_eq!(stats.faces, 6);
        assert_eq!(stats.bytes, output);
        pool.stop();
    }

    #[test]
    fn test_blocks_land_at_their_row_offsets() {
        let pool = started_pool(3);
        // RGBA8, 12×8: red channel = block index
        let (width, height) = (12usize, 8usize);
        let mut pixels = vec![0u8; width * height * 4];
        for y in 0..height {
            for x in 0..width {
                pixels[(y * width + x) * 4] = ((y / 4) * 3 + x / 4) as u8;
            }
        }
        let image = SourceImage::new(&pixels, width as u32, height as u32, PixelFormat::Rgba8);
        let codec = FirstByte {
            layout: BlockLayout::Rgba8,
        };

        let blocks = CompressionDispatcher::new(&pool)
            .with_quality(0.25)
            .compress_to_vec(&codec, &image)
            .unwrap();

        for (i, block) in blocks.chunks_exact(BLOCK_BYTES).enumerate() {
            assert_eq!(block[0] as usize, i);
            assert_eq!(block[1], 25);
        }
        pool.stop();
    }

    #[test]
    fn test_planar_handler_reads_red_plane() {
        let pool = started_pool(2);
        // RGB8, 8×4: red = 10 in the left block, 20 in the right one
        let mut pixels = Vec::new();
        for _y in 0..4 {
            for x in 0..8 {
                pixels.extend_from_slice(&[if x < 4 { 10 } else { 20 }, 0, 0]);
            }
        }
        let image = SourceImage::new(&pixels, 8, 4, PixelFormat::Rgb8);
        let codec = FirstByte {
            layout: BlockLayout::PlanarRg8,
        };

        let blocks = CompressionDispatcher::new(&pool)
            .compress_to_vec(&codec, &image)
            .unwrap();

        assert_eq!(blocks[0], 10);
        assert_eq!(blocks[16], 20);
        pool.stop();
    }

    #[test]
    fn test_faces_are_compressed_in_order() {
        let pool = started_pool(2);
        let face_bytes = 4 * 4 * 4;
        let mut pixels = vec![0u8; face_bytes * 6];
        for (face, chunk) in pixels.chunks_exact_mut(face_bytes).enumerate() {
            chunk.fill(face as u8 + 1);
        }
        let image = SourceImage::cubemap(&pixels, 4, 4, PixelFormat::Rgba8);
        let codec = FirstByte {
            layout: BlockLayout::Rgba8,
        };

        let blocks = CompressionDispatcher::new(&pool)
            .compress_to_vec(&codec, &image)
            .unwrap();

        let firsts: Vec<u8> = blocks.chunks_exact(BLOCK_BYTES).map(|b| b[0]).collect();
        assert_eq!(firsts, vec![1, 2, 3, 4, 5, 6]);
        pool.stop();
    }

    #[test]
    fn test_rejects_empty_image() {
        let pool = started_pool(1);
        let image = SourceImage::new(&[], 0, 4, PixelFormat::Rgba8);
        let result = CompressionDispatcher::new(&pool).compress_to_vec(&Marker(1), &image);
        assert!(matches!(
            result,
            Err(TextureError::InvalidDimensions { width: 0, .. })
        ));
        pool.stop();
    }

    #[test]
    fn test_rejects_unsupported_source_format() {
        let pool = started_pool(1);
        let pixels = vec![0u8; 4 * 4 * 3];
        let image = SourceImage::new(&pixels, 4, 4, PixelFormat::Rgb8);
        let result = CompressionDispatcher::new(&pool).compress_to_vec(&Marker(1), &image);
        assert!(matches!(result, Err(TextureError::UnsupportedFormat(_))));
        pool.stop();
    }

    #[test]
    fn test_rejects_short_buffers() {
        let pool = started_pool(1);
        let dispatcher = CompressionDispatcher::new(&pool);

        let short = vec![0u8; 10];
        let image = SourceImage::new(&short, 4, 4, PixelFormat::Rgba8);
        assert_eq!(
            dispatcher.compress_to_vec(&Marker(1), &image),
            Err(TextureError::SourceTooSmall {
                required: 64,
                actual: 10
            })
        );

        let pixels = vec![0u8; 64];
        let image = SourceImage::new(&pixels, 4, 4, PixelFormat::Rgba8);
        let mut dst = vec![0u8; 8];
        assert_eq!(
            dispatcher.compress(&Marker(1), &image, &mut dst),
            Err(TextureError::DestinationTooSmall {
                required: 16,
                actual: 8
            })
        );
        pool.stop();
    }

    #[test]
    fn test_records_pool_metrics() {
        let pool = started_pool(2);
        let pixels = vec![0u8; 8 * 8 * 4];
        let image = SourceImage::new(&pixels, 8, 8, PixelFormat::Rgba8);

        CompressionDispatcher::new(&pool)
            .compress_to_vec(&Marker(1), &image)
            .unwrap();

        let snapshot = pool.metrics();
        assert_eq!(snapshot.images_compressed, 1);
        assert_eq!(snapshot.blocks_encoded, 4);
        assert_eq!(snapshot.bytes_encoded, 64);
        assert_eq!(snapshot.tasks_submitted, 2);
        pool.stop();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "not multiples of 4")]
    fn test_unaligned_dimensions_panic_in_debug() {
        let pool = started_pool(1);
        let pixels = vec![0u8; 6 * 4 * 4];
        let image = SourceImage::new(&pixels, 6, 4, PixelFormat::Rgba8);
        let _ = CompressionDispatcher::new(&pool).compress_to_vec(&Marker(1), &image);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unsupported face count")]
    fn test_face_count_panics_in_debug() {
        let pool = started_pool(1);
        let pixels = vec![0u8; 4 * 4 * 4 * 2];
        let image = SourceImage::new(&pixels, 4, 4, PixelFormat::Rgba8).with_faces(2);
        let _ = CompressionDispatcher::new(&pool).compress_to_vec(&Marker(1), &image);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "single-level")]
    fn test_level_count_panics_in_debug() {
        let pool = started_pool(1);
        let pixels = vec![0u8; 4 * 4 * 4];
        let image = SourceImage::new(&pixels, 4, 4, PixelFormat::Rgba8).with_levels(2);
        let _ = CompressionDispatcher::new(&pool).compress_to_vec(&Marker(1), &image);
    }
}
