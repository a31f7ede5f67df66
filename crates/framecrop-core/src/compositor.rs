//! Compositor: hosts the canvas surface and wires both engines to it.
//!
//! The surface is sized from the resize engine's aspect ratio and redrawn
//! by the transform engine whenever the frame, the transform or the source
//! image changes. Rendering is lazy: state changes only mark the surface
//! dirty, and [`Compositor::render`] redraws at most once per change.

use log::debug;

use crate::aspect::{AspectRatioPreset, PresetSelection};
use crate::config::CropperConfig;
use crate::decode::{decode_source, SourceImage};
use crate::error::CropError;
use crate::geometry::{Canvas, Display, Point2D};
use crate::gesture::{CanvasMetrics, ImageTransform, TransformEngine};
use crate::raster::RenderStyle;
use crate::resize::{FrameBox, ResizeEngine};
use crate::surface::CanvasSurface;

/// Callback receiving the finished crop.
pub type CropCallback = Box<dyn FnMut(&CanvasSurface)>;

/// One mounted cropper: frame, image transform, source and surface.
pub struct Compositor {
    config: CropperConfig,
    style: RenderStyle,
    resize: ResizeEngine,
    transform: TransformEngine,
    surface: CanvasSurface,
    source: Option<SourceImage>,
    display_origin: Point2D<Display>,
    dirty: bool,
    on_crop_complete: Option<CropCallback>,
}

impl Compositor {
    /// Validate `config` and mount a cropper at its first preset.
    pub fn new(config: CropperConfig) -> Result<Self, CropError> {
        config.validate()?;

        let resize = ResizeEngine::new(&config)?;
        let surface =
            CanvasSurface::for_aspect_ratio(config.max_output_width, resize.aspect_ratio())?;
        let transform = TransformEngine::new(config.scale_sensitivity);

        Ok(Self {
            style: RenderStyle::from(&config),
            config,
            resize,
            transform,
            surface,
            source: None,
            display_origin: Point2D::origin(),
            dirty: true,
            on_crop_complete: None,
        })
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn frame(&self) -> Option<FrameBox> {
        self.resize.frame()
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.resize.aspect_ratio()
    }

    pub fn selection(&self) -> PresetSelection {
        self.resize.selection()
    }

    pub fn presets(&self) -> &[AspectRatioPreset] {
        self.resize.presets()
    }

    pub fn transform(&self) -> ImageTransform {
        self.transform.transform()
    }

    pub fn resize_engine(&self) -> &ResizeEngine {
        &self.resize
    }

    pub fn transform_engine(&self) -> &TransformEngine {
        &self.transform
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// The surface as last rendered; call [`render`](Self::render) first
    /// for up-to-date pixels.
    pub fn surface(&self) -> &CanvasSurface {
        &self.surface
    }

    pub fn needs_render(&self) -> bool {
        self.dirty
    }

    // ------------------------------------------------------------------
    // Source image
    // ------------------------------------------------------------------

    /// Install a decoded source and center it on the canvas.
    pub fn load_source(&mut self, source: SourceImage) {
        debug!("source loaded: {}x{}", source.width, source.height);
        self.source = Some(source);
        self.transform.set_image_loaded(true);
        self.transform.reset_transform(self.surface_center());
        self.dirty = true;
    }

    /// Decode file bytes and install them as the source.
    pub fn load_source_bytes(&mut self, bytes: &[u8]) -> Result<(), CropError> {
        let source = decode_source(bytes)?;
        self.load_source(source);
        Ok(())
    }

    pub fn clear_source(&mut self) {
        if self.source.take().is_some() {
            self.transform.set_image_loaded(false);
            self.dirty = true;
        }
    }

    fn surface_center(&self) -> Point2D<Canvas> {
        Point2D::new(
            self.surface.width() as f64 / 2.0,
            self.surface.height() as f64 / 2.0,
        )
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Container position and width changed (mount, window resize).
    pub fn measure_container(&mut self, top: f64, width: f64) -> bool {
        let changed = self.resize.measure_container(top, width);
        self.sync_layout();
        changed
    }

    /// Where the canvas sits on screen, for touch coordinate conversion.
    pub fn set_canvas_origin(&mut self, left: f64, top: f64) {
        if !(left.is_finite() && top.is_finite()) {
            return;
        }
        self.display_origin = Point2D::new(left, top);
        self.sync_layout();
    }

    /// Re-derive the surface size and the canvas metrics from the frame.
    fn sync_layout(&mut self) {
        if let Some((width, height)) =
            CanvasSurface::dimensions_for(self.config.max_output_width, self.resize.aspect_ratio())
        {
            if self.surface.dimensions() != (width, height) {
                match CanvasSurface::new(width, height) {
                    Ok(surface) => {
                        debug!("surface reallocated to {}x{}", width, height);
                        self.surface = surface;
                        self.dirty = true;
                    }
                    Err(e) => debug!("surface not reallocated: {}", e),
                }
            }
        }

        match self.resize.frame() {
            Some(frame) => self.transform.mount_canvas(CanvasMetrics {
                pixel_width: self.surface.width(),
                display_width: frame.width,
                display_origin: self.display_origin,
            }),
            None => self.transform.unmount_canvas(),
        }
    }

    // ------------------------------------------------------------------
    // Frame resizing
    // ------------------------------------------------------------------

    pub fn drag_start(&mut self, pointer_y: f64) -> bool {
        self.resize.on_drag_start(pointer_y)
    }

    pub fn drag_move(&mut self, pointer_y: f64) -> bool {
        let changed = self.resize.on_drag_move(pointer_y);
        if changed {
            self.sync_layout();
        }
        changed
    }

    pub fn drag_end(&mut self) -> bool {
        self.resize.on_drag_end()
    }

    pub fn select_preset(&mut self, index: usize) -> Result<bool, CropError> {
        let changed = self.resize.select_preset(index)?;
        if changed {
            self.sync_layout();
        }
        Ok(changed)
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    pub fn touch_start(&mut self, touches: &[Point2D<Display>]) -> bool {
        self.mark(|t| t.touch_start(touches))
    }

    pub fn touch_move(&mut self, touches: &[Point2D<Display>]) -> bool {
        self.mark(|t| t.touch_move(touches))
    }

    pub fn touch_end(&mut self) -> bool {
        self.transform.touch_end()
    }

    pub fn touch_cancel(&mut self) -> bool {
        self.transform.touch_cancel()
    }

    /// Put the image back at the canvas center with no rotation or scale.
    pub fn reset_transform(&mut self) {
        let center = self.surface_center();
        self.transform.reset_transform(center);
        self.dirty = true;
    }

    fn mark(&mut self, f: impl FnOnce(&mut TransformEngine) -> bool) -> bool {
        let changed = f(&mut self.transform);
        self.dirty |= changed;
        changed
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Redraw the surface if anything changed. Returns whether it redrew.
    pub fn render(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.transform
            .render(&mut self.surface, self.source.as_ref(), &self.style);
        self.dirty = false;
        true
    }

    /// Render if needed and return a copy of the finished surface.
    pub fn extract(&mut self) -> CanvasSurface {
        self.render();
        self.surface.clone()
    }

    pub fn set_on_crop_complete(&mut self, callback: impl FnMut(&CanvasSurface) + 'static) {
        self.on_crop_complete = Some(Box::new(callback));
    }

    /// Extract the crop and hand it to the completion callback, if any.
    pub fn request_crop(&mut self) -> CanvasSurface {
        let surface = self.extract();
        if let Some(callback) = self.on_crop_complete.as_mut() {
            callback(&surface);
        }
        surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn presets() -> Vec<AspectRatioPreset> {
        vec![
            AspectRatioPreset::new(1, 1).unwrap(),
            AspectRatioPreset::new(16, 9).unwrap(),
        ]
    }

    fn config() -> CropperConfig {
        let mut config = CropperConfig::new().with_presets(presets());
        config.max_output_width = 64;
        config.marker_size = 0;
        config
    }

    /// 8x8 image: left half red, right half blue.
    fn split_image() -> SourceImage {
        let mut pixels = Vec::new();
        for _y in 0..8 {
            for x in 0..8 {
                if x < 4 {
                    pixels.extend_from_slice(&[255, 0, 0, 255]);
                } else {
                    pixels.extend_from_slice(&[0, 0, 255, 255]);
                }
            }
        }
        SourceImage::new(8, 8, pixels).unwrap()
    }

    fn mounted() -> Compositor {
        let mut c = Compositor::new(config()).unwrap();
        c.measure_container(0.0, 320.0);
        c.load_source(split_image());
        c
    }

    fn touch(x: f64, y: f64) -> Point2D<Display> {
        Point2D::new(x, y)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let bad = CropperConfig::new().with_presets(vec![]);
        assert!(matches!(Compositor::new(bad), Err(CropError::NoPresets)));
    }

    #[test]
    fn test_new_rejects_unaddressable_surface() {
        let mut huge = config();
        huge.max_output_width = u32::MAX;
        assert!(matches!(
            Compositor::new(huge),
            Err(CropError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_surface_follows_first_preset() {
        let c = Compositor::new(config()).unwrap();
        assert_eq!(c.surface().dimensions(), (64, 64));
    }

    #[test]
    fn test_image_centered_on_load() {
        let mut c = mounted();
        c.render();
        let t = c.transform();
        assert_eq!((t.translate_x, t.translate_y), (32.0, 32.0));
        // Left of center is red, right of center is blue.
        assert_eq!(c.surface().pixel(30, 32), [255, 0, 0, 255]);
        assert_eq!(c.surface().pixel(33, 32), [0, 0, 255, 255]);
        // Outside the image shows the background.
        assert_eq!(c.surface().pixel(0, 0), config().background_color);
    }

    #[test]
    fn test_render_is_lazy_and_idempotent() {
        let mut c = mounted();
        assert!(c.render());
        let first = c.surface().clone();
        assert!(!c.render());
        c.reset_transform();
        assert!(c.render());
        assert_eq!(c.surface(), &first);
    }

    #[test]
    fn test_gestures_ignored_until_loaded() {
        let mut c = Compositor::new(config()).unwrap();
        c.measure_container(0.0, 320.0);
        assert!(!c.touch_start(&[touch(0.0, 0.0), touch(10.0, 0.0)]));
        assert!(!c.touch_move(&[touch(5.0, 0.0), touch(15.0, 0.0)]));
        assert_eq!(c.transform(), ImageTransform::default());
    }

    #[test]
    fn test_gestures_ignored_until_measured() {
        let mut c = Compositor::new(config()).unwrap();
        c.load_source(split_image());
        c.touch_start(&[touch(0.0, 0.0), touch(10.0, 0.0)]);
        assert!(!c.touch_move(&[touch(5.0, 0.0), touch(15.0, 0.0)]));
    }

    #[test]
    fn test_touch_uses_display_scale() {
        // Surface 64px wide shown 320px wide: factor 0.2.
        let mut c = mounted();
        c.render();
        assert_eq!(c.transform_engine().display_scale(), Some(0.2));

        c.touch_start(&[touch(100.0, 100.0), touch(200.0, 100.0)]);
        assert!(c.touch_move(&[touch(150.0, 100.0), touch(250.0, 100.0)]));
        assert!(c.needs_render());
        assert!((c.transform().translate_x - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_canvas_origin_offsets_touches() {
        let mut c = mounted();
        c.set_canvas_origin(1000.0, 500.0);
        c.touch_start(&[touch(1000.0, 500.0), touch(1100.0, 500.0)]);
        c.touch_end();
        assert_eq!(
            c.transform_engine().marker(),
            Some(Point2D::new(10.0, 0.0))
        );
    }

    #[test]
    fn test_preset_change_reallocates_surface() {
        let mut c = mounted();
        assert!(c.select_preset(1).unwrap());
        assert_eq!(c.surface().dimensions(), (64, 36));
        assert!(c.needs_render());

        let out = c.extract();
        assert_eq!(out.dimensions(), (64, 36));
        assert_eq!(out.pixels().len(), 64 * 36 * 4);
    }

    #[test]
    fn test_container_resize_keeps_surface_for_fixed_preset() {
        let mut c = mounted();
        c.select_preset(1).unwrap();
        c.render();
        assert!(c.measure_container(0.0, 640.0));
        assert_eq!(c.surface().dimensions(), (64, 36));
        assert_eq!(c.transform_engine().display_scale(), Some(0.1));
        assert!((c.aspect_ratio() - 16.0 / 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_resizes_surface_and_keeps_transform() {
        let mut c = mounted();
        c.touch_start(&[touch(0.0, 0.0), touch(100.0, 0.0)]);
        c.touch_move(&[touch(50.0, 50.0), touch(150.0, 50.0)]);
        c.touch_end();
        let before = c.transform();

        assert!(c.drag_start(320.0));
        assert!(c.drag_move(160.0));
        assert!(c.drag_end());

        assert_eq!(c.selection(), PresetSelection::Custom);
        assert_eq!(c.surface().dimensions(), (64, 32));
        assert_eq!(c.transform(), before);
        assert_eq!(c.extract().dimensions(), (64, 32));
    }

    #[test]
    fn test_extract_matches_surface_after_many_changes() {
        let mut c = mounted();
        c.drag_start(320.0);
        for y in [300.0, 250.0, 400.0, 500.0, 380.0] {
            c.drag_move(y);
        }
        c.drag_end();
        c.touch_start(&[touch(0.0, 0.0), touch(150.0, 0.0)]);
        c.touch_move(&[touch(0.0, 0.0), touch(300.0, 10.0)]);
        c.touch_end();
        c.measure_container(0.0, 500.0);

        let expected = CanvasSurface::dimensions_for(64, c.aspect_ratio()).unwrap();
        assert_eq!(c.extract().dimensions(), expected);
    }

    #[test]
    fn test_request_crop_invokes_callback() {
        let mut c = mounted();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        c.set_on_crop_complete(move |surface| {
            *sink.borrow_mut() = Some(surface.dimensions());
        });

        let out = c.request_crop();
        assert_eq!(*seen.borrow(), Some(out.dimensions()));
        assert!(!c.needs_render());
    }

    #[test]
    fn test_clear_source_draws_background_only() {
        let mut c = mounted();
        c.clear_source();
        let out = c.extract();
        assert!(out
            .pixels()
            .chunks_exact(4)
            .all(|p| p == config().background_color));
    }

    #[test]
    fn test_load_source_bytes_rejects_garbage() {
        let mut c = mounted();
        assert!(matches!(
            c.load_source_bytes(b"not an image"),
            Err(CropError::Decode(_))
        ));
        // The previous source stays in place.
        assert!(c.source().is_some());
    }
}
