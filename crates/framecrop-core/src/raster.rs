//! Drawing the transformed image and the origin marker onto a surface.
//!
//! # Algorithm
//!
//! Image drawing uses inverse mapping: for each canvas pixel inside the
//! transformed image's bounding box we compute which source position lands
//! there and bilinearly sample it.
//!
//! The forward placement (translate to the image center, rotate, then
//! offset by half the image size) inverts to:
//! ```text
//! dx = cx - tx,  dy = cy - ty
//! src_x = ( dx * cos(θ) + dy * sin(θ)) / s + w / 2
//! src_y = (-dx * sin(θ) + dy * cos(θ)) / s + h / 2
//! ```
//! where `s` is the transform scale when scaling is applied and 1 otherwise.

use crate::config::{CropperConfig, Rgba};
use crate::decode::SourceImage;
use crate::geometry::{Canvas, Point2D};
use crate::gesture::ImageTransform;
use crate::surface::CanvasSurface;

/// Colors and toggles for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub background: Rgba,
    pub marker_color: Rgba,
    pub marker_size: u32,
    pub apply_scale: bool,
}

impl From<&CropperConfig> for RenderStyle {
    fn from(config: &CropperConfig) -> Self {
        Self {
            background: config.background_color,
            marker_color: config.marker_color,
            marker_size: config.marker_size,
            apply_scale: config.apply_scale,
        }
    }
}

/// Draw `image` onto `surface` under `transform`.
pub fn draw_image(
    surface: &mut CanvasSurface,
    image: &SourceImage,
    transform: &ImageTransform,
    apply_scale: bool,
) {
    if image.width == 0 || image.height == 0 {
        return;
    }

    let scale = if apply_scale { transform.scale } else { 1.0 };
    let (sin, cos) = transform.rotation.sin_cos();
    let (tx, ty) = (transform.translate_x, transform.translate_y);
    let half_w = image.width as f64 / 2.0;
    let half_h = image.height as f64 / 2.0;

    let Some((x0, y0, x1, y1)) = placed_bounds(surface, transform, scale, half_w, half_h) else {
        return;
    };

    for y in y0..y1 {
        let dy = y as f64 + 0.5 - ty;
        for x in x0..x1 {
            let dx = x as f64 + 0.5 - tx;

            let src_x = (dx * cos + dy * sin) / scale + half_w;
            let src_y = (-dx * sin + dy * cos) / scale + half_h;

            if src_x < 0.0
                || src_y < 0.0
                || src_x >= image.width as f64
                || src_y >= image.height as f64
            {
                continue;
            }

            // Pixel centers sit at half-integers.
            let color = sample_bilinear(image, src_x - 0.5, src_y - 0.5);
            surface.blend(x, y, color);
        }
    }
}

/// Canvas-pixel bounding box `[x0, x1) x [y0, y1)` of the placed image,
/// clipped to the surface. `None` when nothing is visible.
fn placed_bounds(
    surface: &CanvasSurface,
    transform: &ImageTransform,
    scale: f64,
    half_w: f64,
    half_h: f64,
) -> Option<(u32, u32, u32, u32)> {
    let (sin, cos) = transform.rotation.sin_cos();
    let corners = [
        (-half_w, -half_h),
        (half_w, -half_h),
        (half_w, half_h),
        (-half_w, half_h),
    ];

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for (u, v) in corners {
        let x = transform.translate_x + (u * cos - v * sin) * scale;
        let y = transform.translate_y + (u * sin + v * cos) * scale;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
        return None;
    }

    let x0 = min_x.floor().max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let x1 = (max_x.ceil().max(0.0) as u32).min(surface.width());
    let y1 = (max_y.ceil().max(0.0) as u32).min(surface.height());

    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

/// Sample a pixel using bilinear interpolation, clamping at the edges.
fn sample_bilinear(image: &SourceImage, x: f64, y: f64) -> Rgba {
    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(image.width - 1);
    let y1 = (y0 + 1).min(image.height - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = image.pixel(x0, y0);
    let p10 = image.pixel(x1, y0);
    let p01 = image.pixel(x0, y1);
    let p11 = image.pixel(x1, y1);

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] as f64 * (1.0 - fx) * (1.0 - fy)
            + p10[i] as f64 * fx * (1.0 - fy)
            + p01[i] as f64 * (1.0 - fx) * fy
            + p11[i] as f64 * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    result
}

/// Fill a `size`-pixel square centered on `center`, in untransformed
/// canvas space.
pub fn draw_marker(surface: &mut CanvasSurface, center: Point2D<Canvas>, size: u32, color: Rgba) {
    if size == 0 || !(center.x.is_finite() && center.y.is_finite()) {
        return;
    }

    let half = size as f64 / 2.0;
    let left = (center.x - half).round();
    let top = (center.y - half).round();

    let x0 = left.max(0.0) as u32;
    let y0 = top.max(0.0) as u32;
    let x1 = ((left + size as f64).max(0.0) as u32).min(surface.width());
    let y1 = ((top + size as f64).max(0.0) as u32).min(surface.height());

    for y in y0..y1 {
        for x in x0..x1 {
            surface.blend(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    /// 4x2 image with a distinct red value per pixel.
    fn test_image() -> SourceImage {
        let mut pixels = Vec::new();
        for y in 0..2u8 {
            for x in 0..4u8 {
                pixels.extend_from_slice(&[y * 4 + x + 1, 0, 0, 255]);
            }
        }
        SourceImage::new(4, 2, pixels).unwrap()
    }

    fn blank(width: u32, height: u32) -> CanvasSurface {
        let mut s = CanvasSurface::new(width, height).unwrap();
        s.fill([0, 0, 0, 255]);
        s
    }

    #[test]
    fn test_identity_placement_copies_pixels() {
        let image = test_image();
        let mut surface = blank(6, 4);
        let t = ImageTransform::centered_at(Point2D::new(2.0, 1.0));
        draw_image(&mut surface, &image, &t, false);

        for y in 0..2 {
            for x in 0..4 {
                assert_eq!(surface.pixel(x, y), image.pixel(x, y), "at ({x}, {y})");
            }
        }
        // Outside the image the background is untouched.
        assert_eq!(surface.pixel(5, 3), [0, 0, 0, 255]);
        assert_eq!(surface.pixel(4, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_translation_offsets_image() {
        let image = test_image();
        let mut surface = blank(8, 4);
        let t = ImageTransform::centered_at(Point2D::new(5.0, 2.0));
        draw_image(&mut surface, &image, &t, false);

        assert_eq!(surface.pixel(3, 1), image.pixel(0, 0));
        assert_eq!(surface.pixel(6, 2), image.pixel(3, 1));
        assert_eq!(surface.pixel(2, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn test_half_turn_flips_image() {
        let image = test_image();
        let mut surface = blank(4, 2);
        let mut t = ImageTransform::centered_at(Point2D::new(2.0, 1.0));
        t.rotation = PI;
        draw_image(&mut surface, &image, &t, false);

        assert_eq!(surface.pixel(0, 0), image.pixel(3, 1));
        assert_eq!(surface.pixel(3, 1), image.pixel(0, 0));
    }

    #[test]
    fn test_quarter_turn_swaps_extent() {
        let image = test_image();
        let mut surface = blank(6, 6);
        let mut t = ImageTransform::centered_at(Point2D::new(3.0, 3.0));
        t.rotation = FRAC_PI_2;
        draw_image(&mut surface, &image, &t, false);

        // Rotated 4x2 image covers x in [2, 4), y in [1, 5).
        assert_ne!(surface.pixel(2, 1), [0, 0, 0, 255]);
        assert_ne!(surface.pixel(3, 4), [0, 0, 0, 255]);
        assert_eq!(surface.pixel(1, 3), [0, 0, 0, 255]);
        assert_eq!(surface.pixel(4, 3), [0, 0, 0, 255]);
    }

    #[test]
    fn test_scale_ignored_unless_applied() {
        let image = test_image();
        let mut t = ImageTransform::centered_at(Point2D::new(4.0, 4.0));
        t.scale = 2.0;

        let mut natural = blank(8, 8);
        draw_image(&mut natural, &image, &t, false);
        assert_eq!(natural.pixel(1, 3), [0, 0, 0, 255]);

        let mut scaled = blank(8, 8);
        draw_image(&mut scaled, &image, &t, true);
        assert_ne!(scaled.pixel(1, 3), [0, 0, 0, 255]);
        assert_eq!(scaled.pixel(0, 2), image.pixel(0, 0));
    }

    #[test]
    fn test_offscreen_image_draws_nothing() {
        let image = test_image();
        let mut surface = blank(4, 4);
        let before = surface.clone();
        let t = ImageTransform::centered_at(Point2D::new(-100.0, -100.0));
        draw_image(&mut surface, &image, &t, false);
        assert_eq!(surface, before);
    }

    #[test]
    fn test_marker_is_centered_square() {
        let mut surface = blank(20, 20);
        draw_marker(&mut surface, Point2D::new(10.0, 10.0), 4, [255, 0, 0, 255]);

        assert_eq!(surface.pixel(8, 8), [255, 0, 0, 255]);
        assert_eq!(surface.pixel(11, 11), [255, 0, 0, 255]);
        assert_eq!(surface.pixel(7, 8), [0, 0, 0, 255]);
        assert_eq!(surface.pixel(12, 12), [0, 0, 0, 255]);
    }

    #[test]
    fn test_marker_clipped_at_edges() {
        let mut surface = blank(4, 4);
        draw_marker(&mut surface, Point2D::new(0.0, 0.0), 4, [255, 0, 0, 255]);
        assert_eq!(surface.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(surface.pixel(2, 2), [0, 0, 0, 255]);

        draw_marker(&mut surface, Point2D::new(100.0, 100.0), 4, [0, 255, 0, 255]);
        draw_marker(&mut surface, Point2D::new(2.0, 2.0), 0, [0, 255, 0, 255]);
        assert_eq!(surface.pixel(3, 3), [0, 0, 0, 255]);
    }
}
