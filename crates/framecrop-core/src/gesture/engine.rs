//! Transform engine: touch input in, image transform and pixels out.

use log::debug;

use super::{GestureMode, GestureSession, ImageTransform};
use crate::decode::SourceImage;
use crate::geometry::{Canvas, Display, Point2D};
use crate::raster::{self, RenderStyle};
use crate::surface::CanvasSurface;

/// How the canvas is laid out on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasMetrics {
    /// Backing buffer width in canvas pixels.
    pub pixel_width: u32,
    /// Rendered width in display pixels.
    pub display_width: f64,
    /// Top-left corner of the rendered canvas in display pixels.
    pub display_origin: Point2D<Display>,
}

impl CanvasMetrics {
    /// Canvas pixels per display pixel, if both widths are known.
    pub fn scale_factor(&self) -> Option<f64> {
        if self.pixel_width == 0
            || !(self.display_width.is_finite() && self.display_width > 0.0)
        {
            return None;
        }
        Some(self.pixel_width as f64 / self.display_width)
    }

    /// Convert a display-space touch position to canvas pixels.
    pub fn to_canvas(&self, point: Point2D<Display>) -> Option<Point2D<Canvas>> {
        let factor = self.scale_factor()?;
        let origin = self.display_origin;
        Some(point.map_to(|x, y| ((x - origin.x) * factor, (y - origin.y) * factor)))
    }
}

/// Owns the image transform, the active gesture session and the drawing
/// of the image onto a canvas surface.
#[derive(Debug, Clone)]
pub struct TransformEngine {
    transform: ImageTransform,
    session: Option<GestureSession>,
    marker: Option<Point2D<Canvas>>,
    scale_sensitivity: f64,
    image_loaded: bool,
    canvas: Option<CanvasMetrics>,
}

impl TransformEngine {
    pub fn new(scale_sensitivity: f64) -> Self {
        Self {
            transform: ImageTransform::default(),
            session: None,
            marker: None,
            scale_sensitivity,
            image_loaded: false,
            canvas: None,
        }
    }

    pub fn transform(&self) -> ImageTransform {
        self.transform
    }

    /// Return to the identity transform at `center` and forget the marker.
    pub fn reset_transform(&mut self, center: Point2D<Canvas>) {
        self.transform = ImageTransform::centered_at(center);
        self.marker = None;
    }

    /// Last gesture pivot, drawn as the origin marker.
    pub fn marker(&self) -> Option<Point2D<Canvas>> {
        self.marker
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub fn canvas(&self) -> Option<CanvasMetrics> {
        self.canvas
    }

    /// Canvas-to-display scale factor, once the canvas is mounted and laid out.
    pub fn display_scale(&self) -> Option<f64> {
        self.canvas.and_then(|c| c.scale_factor())
    }

    pub fn set_image_loaded(&mut self, loaded: bool) {
        self.image_loaded = loaded;
        if !loaded {
            self.session = None;
        }
    }

    /// Record the canvas buffer width and its on-screen placement.
    pub fn mount_canvas(&mut self, metrics: CanvasMetrics) {
        if self.canvas != Some(metrics) {
            debug!(
                "canvas {}px shown at {:.1}px (factor {:?})",
                metrics.pixel_width,
                metrics.display_width,
                metrics.scale_factor()
            );
        }
        self.canvas = Some(metrics);
    }

    pub fn unmount_canvas(&mut self) {
        self.canvas = None;
        self.session = None;
    }

    /// True when gestures can be applied: image loaded and canvas laid out.
    pub fn is_ready(&self) -> bool {
        self.image_loaded && self.display_scale().is_some()
    }

    fn to_canvas_points(&self, touches: &[Point2D<Display>]) -> Option<Vec<Point2D<Canvas>>> {
        let canvas = self.canvas?;
        touches.iter().map(|&t| canvas.to_canvas(t)).collect()
    }

    /// Start a new gesture session from the contacts present now.
    pub fn touch_start(&mut self, touches: &[Point2D<Display>]) -> bool {
        if touches.is_empty() {
            self.touch_end();
            return false;
        }
        if !self.is_ready() {
            return false;
        }
        let Some(points) = self.to_canvas_points(touches) else {
            return false;
        };

        let session = GestureSession::begin(&points);
        debug!(
            "gesture session start: {} contacts ({:?})",
            points.len(),
            session.start_mode()
        );
        let moved_marker = session.origin().is_some() && session.origin() != self.marker;
        if let Some(origin) = session.origin() {
            self.marker = Some(origin);
        }
        self.session = Some(session);
        moved_marker
    }

    /// Apply one move sample. Returns true if the transform changed.
    ///
    /// A sample with no contacts ends the session.
    pub fn touch_move(&mut self, touches: &[Point2D<Display>]) -> bool {
        if touches.is_empty() {
            self.touch_end();
            return false;
        }
        if !self.is_ready() {
            return false;
        }
        let Some(points) = self.to_canvas_points(touches) else {
            return false;
        };

        // A move without a live session (fingers kept down across a
        // touchend) starts one without producing a delta.
        let Some(session) = self.session.as_mut() else {
            self.session = Some(GestureSession::begin(&points));
            return false;
        };

        let delta = session.advance(&points, self.scale_sensitivity);
        let origin = session.origin();
        let marker_moved = origin.is_some() && origin != self.marker;
        if origin.is_some() {
            self.marker = origin;
        }

        match delta {
            Some(delta) if !delta.is_zero() => {
                self.transform.apply(&delta);
                true
            }
            _ => marker_moved,
        }
    }

    /// End the session. The accumulated transform is kept.
    pub fn touch_end(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                debug!(
                    "gesture session end ({:?}), transform {:?}",
                    session.start_mode(),
                    self.transform
                );
                true
            }
            None => false,
        }
    }

    pub fn touch_cancel(&mut self) -> bool {
        self.touch_end()
    }

    /// Whether the active session is a two-finger pinch right now.
    pub fn is_pinching(&self) -> bool {
        self.session
            .as_ref()
            .and_then(|s| s.active_mode())
            .is_some_and(|m| m == GestureMode::Pinch)
    }

    /// Redraw `surface`: background, then the image under the current
    /// transform, then the origin marker in untransformed canvas space.
    pub fn render(
        &self,
        surface: &mut CanvasSurface,
        source: Option<&SourceImage>,
        style: &RenderStyle,
    ) {
        surface.fill(style.background);

        if let Some(image) = source {
            raster::draw_image(surface, image, &self.transform, style.apply_scale);
        }

        if let Some(marker) = self.marker {
            raster::draw_marker(surface, marker, style.marker_size, style.marker_color);
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
