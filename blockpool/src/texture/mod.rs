//! Block-parallel texture compression.
//!
//! This module splits an image into rows of 4×4 blocks and encodes them on a
//! [`WorkerPool`](crate::pool::WorkerPool) through a pluggable [`BlockCodec`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐     one task per block row     ┌────────────┐
//! │ CompressionDispatcher│ ─────────────────────────────► │ WorkerPool │
//! │  (per face: scope)   │                                └─────┬──────┘
//! └──────────┬───────────┘                                      │
//!            │ RowEncoder::select (once per image)              ▼
//!            │                                   ┌──────────────────────────┐
//!            └─────────────────────────────────► │ RowEncoder::encode_row   │
//!                                                │ passthrough / planar RG /│
//!                                                │ widened RGB16            │
//!                                                └────────────┬─────────────┘
//!                                                             ▼
//!                                                 BlockCodec::encode_block
//! ```
//!
//! # Codecs
//!
//! - [`Bc7Codec`] - RGBA8 sources, opaque or alpha presets
//! - [`Bc5Codec`] - red/green from any 8-bit source with 2+ channels
//! - [`Bc6hCodec`] - half-float RGB from 16-bit sources with 3+ channels
//!
//! Mip chains are not generated; every image has exactly one level.

mod codec;
mod dispatcher;
mod error;
mod format;
mod image;
mod intel;
mod row;

pub use codec::{quality_tier, BlockCodec, BLOCK_BYTES, BLOCK_DIM, DEFAULT_QUALITY};
pub use dispatcher::{CompressionDispatcher, CompressionStats};
pub use error::TextureError;
pub use format::{BlockLayout, CompressionFormat, PixelFormat};
pub use self::image::{OwnedImage, SourceImage};
pub use intel::{with_codec, Bc5Codec, Bc6hCodec, Bc6hOptions, Bc7Codec, Bc7Options, CodecVisitor};
pub use row::{RowCompressionJob, RowEncoder};
