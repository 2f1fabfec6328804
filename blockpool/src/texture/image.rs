//! Source image descriptions.
//!
//! The dispatcher only reads pixels through a borrowed [`SourceImage`]. Face
//! data is stored back to back: face `f` starts at `f * face_bytes()`.
//! [`OwnedImage`] converts a decoded [`image::DynamicImage`] into the pixel
//! format a codec family expects.

use half::f16;
use image::DynamicImage;

use super::error::TextureError;
use super::format::PixelFormat;

/// Borrowed view of an uncompressed image.
#[derive(Debug, Clone, Copy)]
pub struct SourceImage<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    faces: u32,
    levels: u32,
    format: PixelFormat,
}

impl<'a> SourceImage<'a> {
    /// Single-face, single-level image.
    pub fn new(data: &'a [u8], width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            data,
            width,
            height,
            faces: 1,
            levels: 1,
            format,
        }
    }

    /// Six-face cubemap; `width`/`height` are per face.
    pub fn cubemap(data: &'a [u8], width: u32, height: u32, format: PixelFormat) -> Self {
        Self::new(data, width, height, format).with_faces(6)
    }

    pub fn with_faces(mut self, faces: u32) -> Self {
        self.faces = faces;
        self
    }

    pub fn with_levels(mut self, levels: u32) -> Self {
        self.levels = levels;
        self
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn faces(&self) -> u32 {
        self.faces
    }

    pub fn levels(&self) -> u32 {
        self.levels
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Interleaved channels per texel.
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Bytes per texel row.
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_texel()
    }

    /// Bytes per face.
    pub fn face_bytes(&self) -> usize {
        self.row_stride() * self.height as usize
    }

    /// Bytes the pixel buffer must hold for every face.
    pub fn required_bytes(&self) -> usize {
        self.face_bytes() * self.faces as usize
    }
}

/// Owned pixel buffer with its geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
    faces: u32,
    format: PixelFormat,
}

impl OwnedImage {
    /// Converts a decoded image to `format`.
    ///
    /// With `faces > 1` the image is read as a vertical strip of equally
    /// tall faces (a cubemap is six square faces stacked top to bottom).
    /// 16-bit formats are stored as native-endian half floats.
    pub fn from_dynamic(
        image: &DynamicImage,
        format: PixelFormat,
        faces: u32,
    ) -> Result<Self, TextureError> {
        let (width, total_height) = (image.width(), image.height());
        if faces == 0 || total_height % faces != 0 {
            return Err(TextureError::InvalidDimensions {
                width,
                height: total_height,
                reason: format!("height is not divisible into {} face(s)", faces),
            });
        }

        let data = match format {
            PixelFormat::Rgba8 => image.to_rgba8().into_raw(),
            PixelFormat::Rgb8 => image.to_rgb8().into_raw(),
            PixelFormat::Rg8 => image
                .to_rgba8()
                .into_raw()
                .chunks_exact(4)
                .flat_map(|texel| [texel[0], texel[1]])
                .collect(),
            PixelFormat::Rgb16 => halves(image.to_rgb32f().into_raw()),
            PixelFormat::Rgba16 => halves(image.to_rgba32f().into_raw()),
        };

        Ok(Self {
            data,
            width,
            height: total_height / faces,
            faces,
            format,
        })
    }

    /// Wraps an existing buffer.
    pub fn from_raw(
        data: Vec<u8>,
        width: u32,
        height: u32,
        faces: u32,
        format: PixelFormat,
    ) -> Self {
        Self {
            data,
            width,
            height,
            faces,
            format,
        }
    }

    /// Borrows the image for compression.
    pub fn as_source(&self) -> SourceImage<'_> {
        SourceImage::new(&self.data, self.width, self.height, self.format).with_faces(self.faces)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of one face.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn faces(&self) -> u32 {
        self.faces
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

fn halves(values: Vec<f32>) -> Vec<u8> {
    values
        .into_iter()
        .flat_map(|v| f16::from_f32(v).to_bits().to_ne_bytes())
        .collect()
}
