//! Export helpers for the finished surface.
//!
//! The cropper itself only hands back pixels; these helpers exist for hosts
//! that want file bytes to upload or download.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::CropError;
use crate::surface::CanvasSurface;

/// Encode a surface as JPEG. Alpha is dropped.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for further editing
/// * 80-90: Good quality, recommended for most uses
/// * Below 60: Low quality, visible artifacts
pub fn encode_jpeg(surface: &CanvasSurface, quality: u8) -> Result<Vec<u8>, CropError> {
    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());

    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(
            &surface.to_rgb(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| CropError::Encode(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode a surface as PNG, keeping alpha.
pub fn encode_png(surface: &CanvasSurface) -> Result<Vec<u8>, CropError> {
    let mut buffer = Cursor::new(Vec::new());

    PngEncoder::new(&mut buffer)
        .write_image(
            surface.pixels(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| CropError::Encode(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_source;

    fn gray_surface() -> CanvasSurface {
        let mut surface = CanvasSurface::new(32, 18).unwrap();
        surface.fill([128, 128, 128, 255]);
        surface
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let jpeg = encode_jpeg(&gray_surface(), 90).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_clamped() {
        assert!(encode_jpeg(&gray_surface(), 0).is_ok());
    }

    #[test]
    fn test_encode_png_decodes_back_to_same_size() {
        let png = encode_png(&gray_surface()).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = decode_source(&png).unwrap();
        assert_eq!((decoded.width, decoded.height), (32, 18));
        assert_eq!(decoded.pixel(0, 0), [128, 128, 128, 255]);
    }
}
