//! The canvas drawing surface.

use crate::config::Rgba;
use crate::error::CropError;

/// RGBA8 pixel buffer the cropper renders into and hands back on export.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl CanvasSurface {
    /// Allocate a transparent surface.
    ///
    /// Fails for a zero side or a buffer too large to address.
    pub fn new(width: u32, height: u32) -> Result<Self, CropError> {
        let len = Self::buffer_len(width, height)
            .ok_or(CropError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
        })
    }

    /// RGBA8 byte length for `width x height`, or `None` when a side is
    /// zero or the length does not fit an allocation.
    pub fn buffer_len(width: u32, height: u32) -> Option<usize> {
        if width == 0 || height == 0 {
            return None;
        }
        let len = usize::try_from(width)
            .ok()?
            .checked_mul(usize::try_from(height).ok()?)?
            .checked_mul(4)?;
        (len <= isize::MAX as usize).then_some(len)
    }

    /// Buffer size for a frame of `aspect_ratio`, `max_width` pixels wide.
    ///
    /// Returns `None` for a non-positive or non-finite ratio.
    pub fn dimensions_for(max_width: u32, aspect_ratio: f64) -> Option<(u32, u32)> {
        if max_width == 0 || !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return None;
        }
        let height = (max_width as f64 / aspect_ratio).round().max(1.0);
        Some((max_width, height as u32))
    }

    /// Allocate a surface sized by [`dimensions_for`](Self::dimensions_for).
    pub fn for_aspect_ratio(max_width: u32, aspect_ratio: f64) -> Result<Self, CropError> {
        let (width, height) = Self::dimensions_for(max_width, aspect_ratio).ok_or(
            CropError::InvalidDimensions {
                width: max_width,
                height: 0,
            },
        )?;
        Self::new(width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Fill every pixel with `color`.
    pub fn fill(&mut self, color: Rgba) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let idx = self.index(x, y);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Composite `color` over the pixel at `(x, y)` (source-over).
    #[inline]
    pub fn blend(&mut self, x: u32, y: u32, color: Rgba) {
        let idx = self.index(x, y);
        let dst = &mut self.pixels[idx..idx + 4];

        match color[3] {
            0 => {}
            255 => dst.copy_from_slice(&color),
            a => {
                let src_a = a as f32 / 255.0;
                let dst_a = dst[3] as f32 / 255.0;
                let out_a = src_a + dst_a * (1.0 - src_a);
                for i in 0..3 {
                    let c = (color[i] as f32 * src_a + dst[i] as f32 * dst_a * (1.0 - src_a))
                        / out_a;
                    dst[i] = c.clamp(0.0, 255.0).round() as u8;
                }
                dst[3] = (out_a * 255.0).round() as u8;
            }
        }
    }

    /// Drop alpha, for encoders that only take RGB.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}
