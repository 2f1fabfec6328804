//! `blockpool compress` - compress one image or cubemap strip.
//!
//! Flow: load config → decode image → convert to the codec's source format →
//! start the pool → dispatch → write the raw block stream.

use std::path::{Path, PathBuf};

use blockpool::app::{AppConfig, BlockPoolApp};
use blockpool::texture::{
    with_codec, BlockCodec, CodecVisitor, CompressionDispatcher, CompressionFormat,
    CompressionStats, OwnedImage, SourceImage, TextureError, BLOCK_DIM,
};
use clap::Args;
use tracing::info;

use super::common::{load_config, parse_faces, parse_quality, FormatArg};
use crate::error::CliError;

/// Arguments for `blockpool compress`.
#[derive(Debug, Args)]
pub struct CompressArgs {
    /// Input image (any format the `image` crate decodes)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file for the raw compressed block stream
    #[arg(short, long)]
    pub output: PathBuf,

    /// Compression format (default from config, else bc7)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Encoder quality from 0.0 (fastest) to 1.0 (best)
    #[arg(short, long, value_parser = parse_quality)]
    pub quality: Option<f32>,

    /// Worker threads (default from config, else one per core)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// 1 for a single image, 6 for a cubemap stacked vertically
    #[arg(long, default_value = "1", value_parser = parse_faces)]
    pub faces: u32,

    /// Use the alpha-aware BC7 presets
    #[arg(long)]
    pub alpha: bool,
}

/// Settings for one compression after merging CLI arguments over config.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressPlan {
    pub app: AppConfig,
    pub format: CompressionFormat,
    pub alpha: bool,
    pub faces: u32,
}

impl CompressArgs {
    /// Merges the arguments over the config file; the CLI takes precedence.
    pub fn plan(&self, config_path: Option<&Path>) -> Result<CompressPlan, CliError> {
        let config = load_config(config_path)?;
        let mut app = AppConfig::from_config_file(&config);

        if let Some(threads) = self.threads {
            if threads == 0 {
                return Err(CliError::Config("--threads must be at least 1".to_string()));
            }
            app = app.with_threads(threads);
        }
        if let Some(quality) = self.quality {
            app = app.with_quality(quality);
        }
        let format = self.format.map(CompressionFormat::from).unwrap_or(app.format);

        Ok(CompressPlan {
            format,
            alpha: self.alpha || app.alpha,
            faces: self.faces,
            app: app.with_format(format),
        })
    }
}

/// Run `blockpool compress`.
pub fn run(args: CompressArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    let plan = args.plan(config_path)?;

    let decoded = image::open(&args.input).map_err(|error| CliError::ImageRead {
        path: args.input.display().to_string(),
        error,
    })?;
    let owned = OwnedImage::from_dynamic(&decoded, plan.format.source_format(), plan.faces)?;
    check_block_aligned(&owned)?;

    info!(
        input = %args.input.display(),
        width = owned.width(),
        height = owned.height(),
        faces = owned.faces(),
        format = %plan.format,
        "Image loaded"
    );

    let app = BlockPoolApp::start(plan.app.clone())?;
    let result = with_codec(
        plan.format,
        plan.alpha,
        Dispatch {
            dispatcher: app.dispatcher(),
            image: owned.as_source(),
        },
    );
    let metrics = app.metrics();
    app.shutdown();
    let (blocks, stats) = result?;

    std::fs::write(&args.output, &blocks).map_err(|error| CliError::FileWrite {
        path: args.output.display().to_string(),
        error,
    })?;

    println!(
        "Compressed {} ({}×{}, {} face(s)) to {} as {}",
        args.input.display(),
        owned.width(),
        owned.height(),
        stats.faces,
        args.output.display(),
        plan.format
    );
    println!(
        "  {} blocks, {} bytes in {:.1} ms on {} thread(s)",
        stats.blocks,
        stats.bytes,
        stats.elapsed.as_secs_f64() * 1000.0,
        plan.app.threads
    );
    println!("  {}", metrics);

    Ok(())
}

/// Rejects images the dispatcher cannot split into whole 4×4 blocks.
fn check_block_aligned(image: &OwnedImage) -> Result<(), TextureError> {
    let (width, height) = (image.width(), image.height());
    let aligned = width as usize % BLOCK_DIM == 0 && height as usize % BLOCK_DIM == 0;
    if !aligned || width == 0 || height == 0 {
        return Err(TextureError::InvalidDimensions {
            width,
            height,
            reason: format!("face size must be a non-zero multiple of {}", BLOCK_DIM),
        });
    }
    Ok(())
}

/// Compresses the image with the codec chosen at runtime.
struct Dispatch<'a, 'p> {
    dispatcher: CompressionDispatcher<'p>,
    image: SourceImage<'a>,
}

impl CodecVisitor for Dispatch<'_, '_> {
    type Output = Result<(Vec<u8>, CompressionStats), TextureError>;

    fn visit<C: BlockCodec>(self, codec: &C) -> Self::Output {
        info!(codec = codec.name(), "Compressing");
        let mut blocks = vec![0u8; CompressionDispatcher::output_size(&self.image)];
        let stats = self.dispatcher.compress(codec, &self.image, &mut blocks)?;
        Ok((blocks, stats))
    }
}
