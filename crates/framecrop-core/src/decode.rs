//! Source image decoding.
//!
//! The cropper draws from an RGBA8 [`SourceImage`]. Hosts either hand over
//! already-decoded pixels or the raw file bytes, in which case the image is
//! decoded with the `image` crate and rotated upright according to its EXIF
//! orientation (phone cameras store most photos sideways).

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{imageops, ImageReader, RgbaImage};
use log::debug;

use crate::error::CropError;
use crate::surface::CanvasSurface;

/// How the stored pixels relate to the upright picture, from the EXIF
/// orientation tag (1-8, see https://exiftool.org/TagNames/EXIF.html).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,
    Mirrored,
    UpsideDown,
    MirroredUpsideDown,
    /// Upright after a clockwise quarter turn and a mirror.
    MirroredQuarterLeft,
    QuarterRight,
    /// Upright after a counter-clockwise quarter turn and a mirror.
    MirroredQuarterRight,
    QuarterLeft,
}

impl Orientation {
    /// Map the raw tag value; unknown values are treated as upright.
    pub fn from_exif(tag: u32) -> Self {
        match tag {
            2 => Orientation::Mirrored,
            3 => Orientation::UpsideDown,
            4 => Orientation::MirroredUpsideDown,
            5 => Orientation::MirroredQuarterLeft,
            6 => Orientation::QuarterRight,
            7 => Orientation::MirroredQuarterRight,
            8 => Orientation::QuarterLeft,
            _ => Orientation::Normal,
        }
    }

    /// Rotate and mirror an RGBA buffer into upright display orientation.
    fn upright(self, img: RgbaImage) -> RgbaImage {
        match self {
            Orientation::Normal => img,
            Orientation::Mirrored => imageops::flip_horizontal(&img),
            Orientation::UpsideDown => imageops::rotate180(&img),
            Orientation::MirroredUpsideDown => imageops::flip_vertical(&img),
            Orientation::MirroredQuarterLeft => {
                imageops::flip_horizontal(&imageops::rotate90(&img))
            }
            Orientation::QuarterRight => imageops::rotate90(&img),
            Orientation::MirroredQuarterRight => {
                imageops::flip_horizontal(&imageops::rotate270(&img))
            }
            Orientation::QuarterLeft => imageops::rotate270(&img),
        }
    }
}

/// A decoded image with RGBA8 pixel data, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl SourceImage {
    /// Wrap RGBA pixels, checking the buffer length.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CropError> {
        let expected = CanvasSurface::buffer_len(width, height)
            .ok_or(CropError::InvalidDimensions { width, height })?;
        if pixels.len() != expected {
            return Err(CropError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_rgba_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// RGBA value at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

/// Decode image file bytes (JPEG or PNG) into an upright [`SourceImage`].
///
/// # Errors
///
/// Returns [`CropError::Decode`] when the format is unknown or the data is
/// corrupt.
pub fn decode_source(bytes: &[u8]) -> Result<SourceImage, CropError> {
    let orientation = read_orientation(bytes);

    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CropError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| CropError::Decode(e.to_string()))?;

    let upright = orientation.upright(img.into_rgba8());
    debug!(
        "decoded source {}x{} ({:?})",
        upright.width(),
        upright.height(),
        orientation
    );
    Ok(SourceImage::from_rgba_image(upright))
}

/// EXIF orientation of the given file bytes, `Normal` when absent.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from_exif)
        .unwrap_or_default()
}
