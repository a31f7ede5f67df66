//! Cropper WASM bindings.
//!
//! One `JsCropper` backs one mounted cropper component. The presentation
//! shell forwards its pointer, touch and layout events here and reads the
//! frame box back for styling.
//!
//! # Example
//!
//! ```typescript
//! import { JsCropper } from '@framecrop/wasm';
//!
//! // Presets as flat numerator/denominator pairs: 1:1, 16:9, 4:5
//! const cropper = new JsCropper(new Uint32Array([1, 1, 16, 9, 4, 5]), false, 1280);
//! cropper.load_image(new Uint8Array(await file.arrayBuffer()));
//! cropper.measure_container(rect.top, rect.width);
//!
//! el.addEventListener('touchmove', (e) => {
//!   const flat = [...e.touches].flatMap((t) => [t.clientX, t.clientY]);
//!   if (cropper.touch_move(new Float64Array(flat))) requestAnimationFrame(draw);
//! });
//!
//! cropper.set_on_crop_complete((surface) => upload(surface.to_jpeg(90)));
//! cropper.request_crop();
//! ```

use framecrop_core::{
    AspectRatioPreset, CanvasSurface, Compositor, CropError, CropperConfig, Display, Point2D,
    PresetSelection, SourceImage,
};
use wasm_bindgen::prelude::*;

use crate::types::JsSurface;

fn to_js(e: CropError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Parse presets passed as flat `[num, den, num, den, ...]` pairs.
///
/// An empty list selects the default square preset.
pub(crate) fn parse_presets(flat: &[u32]) -> Result<Vec<AspectRatioPreset>, CropError> {
    if flat.is_empty() {
        return Ok(CropperConfig::default().aspect_ratio_presets);
    }
    if flat.len() % 2 != 0 {
        return Err(CropError::InvalidConfig(format!(
            "presets must be numerator/denominator pairs (got {} values)",
            flat.len()
        )));
    }
    flat.chunks_exact(2)
        .map(|pair| AspectRatioPreset::new(pair[0], pair[1]))
        .collect()
}

/// Parse touches passed as flat `[x, y, x, y, ...]` client coordinates.
/// A trailing unpaired value is ignored.
pub(crate) fn parse_touches(flat: &[f64]) -> Vec<Point2D<Display>> {
    flat.chunks_exact(2)
        .map(|pair| Point2D::new(pair[0], pair[1]))
        .collect()
}

/// Interactive cropper for JavaScript.
#[wasm_bindgen]
pub struct JsCropper {
    inner: Compositor,
}

#[wasm_bindgen]
impl JsCropper {
    /// Create a cropper.
    ///
    /// # Arguments
    /// * `presets` - Flat numerator/denominator pairs; index 0 is applied at mount
    /// * `is_fixed_aspect_ratio` - Disable the free-drag handle
    /// * `max_output_width` - Pixel width of the output canvas (0 for the default 1280)
    #[wasm_bindgen(constructor)]
    pub fn new(
        presets: Vec<u32>,
        is_fixed_aspect_ratio: bool,
        max_output_width: u32,
    ) -> Result<JsCropper, JsValue> {
        Self::build(&presets, is_fixed_aspect_ratio, max_output_width).map_err(to_js)
    }

    /// Create a cropper from a full configuration object, e.g.
    /// `{ aspectRatioPresets: [[16, 9]], markerSize: 0 }`.
    pub fn from_config(config: JsValue) -> Result<JsCropper, JsValue> {
        let config: CropperConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid cropper config: {}", e)))?;
        let inner = Compositor::new(config).map_err(to_js)?;
        Ok(Self { inner })
    }

    // ------------------------------------------------------------------
    // Source image
    // ------------------------------------------------------------------

    /// Decode JPEG/PNG file bytes and use them as the source image.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner.load_source_bytes(bytes).map_err(to_js)
    }

    /// Use already-decoded RGBA pixels (e.g. from `ImageData`) as the source.
    pub fn load_pixels(&mut self, width: u32, height: u32, pixels: Vec<u8>) -> Result<(), JsValue> {
        let source = SourceImage::new(width, height, pixels).map_err(to_js)?;
        self.inner.load_source(source);
        Ok(())
    }

    pub fn clear_image(&mut self) {
        self.inner.clear_source();
    }

    /// Whether a source image is loaded
    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.source().is_some()
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Report the container's top edge and width in client pixels.
    pub fn measure_container(&mut self, top: f64, width: f64) -> bool {
        self.inner.measure_container(top, width)
    }

    /// Report where the canvas element sits in client pixels.
    pub fn set_canvas_origin(&mut self, left: f64, top: f64) {
        self.inner.set_canvas_origin(left, top);
    }

    // ------------------------------------------------------------------
    // Frame resizing
    // ------------------------------------------------------------------

    pub fn drag_start(&mut self, pointer_y: f64) -> bool {
        self.inner.drag_start(pointer_y)
    }

    pub fn drag_move(&mut self, pointer_y: f64) -> bool {
        self.inner.drag_move(pointer_y)
    }

    pub fn drag_end(&mut self) -> bool {
        self.inner.drag_end()
    }

    pub fn select_preset(&mut self, index: usize) -> Result<bool, JsValue> {
        self.inner.select_preset(index).map_err(to_js)
    }

    // ------------------------------------------------------------------
    // Touch gestures (flat client x/y pairs)
    // ------------------------------------------------------------------

    pub fn touch_start(&mut self, touches: &[f64]) -> bool {
        self.inner.touch_start(&parse_touches(touches))
    }

    pub fn touch_move(&mut self, touches: &[f64]) -> bool {
        self.inner.touch_move(&parse_touches(touches))
    }

    pub fn touch_end(&mut self) -> bool {
        self.inner.touch_end()
    }

    pub fn touch_cancel(&mut self) -> bool {
        self.inner.touch_cancel()
    }

    pub fn reset_transform(&mut self) {
        self.inner.reset_transform();
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Redraw if anything changed. Returns whether it redrew.
    pub fn render(&mut self) -> bool {
        self.inner.render()
    }

    #[wasm_bindgen(getter)]
    pub fn needs_render(&self) -> bool {
        self.inner.needs_render()
    }

    /// Render if needed and copy the finished surface out.
    pub fn extract(&mut self) -> JsSurface {
        JsSurface::from(self.inner.extract())
    }

    /// Register `callback(surface: JsSurface)`, called by `request_crop`.
    pub fn set_on_crop_complete(&mut self, callback: js_sys::Function) {
        self.inner.set_on_crop_complete(move |surface: &CanvasSurface| {
            let value = JsValue::from(JsSurface::from(surface.clone()));
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                web_sys::console::error_1(&e);
            }
        });
    }

    /// Extract the surface, hand it to the completion callback and return it.
    pub fn request_crop(&mut self) -> JsSurface {
        JsSurface::from(self.inner.request_crop())
    }

    // ------------------------------------------------------------------
    // State for the presentation shell
    // ------------------------------------------------------------------

    /// Frame width in client pixels, undefined before measurement
    #[wasm_bindgen(getter)]
    pub fn frame_width(&self) -> Option<f64> {
        self.inner.frame().map(|f| f.width)
    }

    /// Frame height in client pixels, undefined before measurement
    #[wasm_bindgen(getter)]
    pub fn frame_height(&self) -> Option<f64> {
        self.inner.frame().map(|f| f.height)
    }

    #[wasm_bindgen(getter)]
    pub fn aspect_ratio(&self) -> f64 {
        self.inner.aspect_ratio()
    }

    #[wasm_bindgen(getter)]
    pub fn threshold_crossed(&self) -> bool {
        self.inner.resize_engine().threshold_crossed()
    }

    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.inner.resize_engine().is_dragging()
    }

    #[wasm_bindgen(getter)]
    pub fn is_fixed_aspect_ratio(&self) -> bool {
        self.inner.resize_engine().is_fixed()
    }

    /// Index of the selected preset, undefined when the ratio is custom
    #[wasm_bindgen(getter)]
    pub fn selected_preset(&self) -> Option<u32> {
        match self.inner.selection() {
            PresetSelection::Preset(index) => u32::try_from(index).ok(),
            PresetSelection::Custom => None,
        }
    }

    /// Preset labels such as `"16:9"`, in order
    #[wasm_bindgen(getter)]
    pub fn preset_labels(&self) -> Vec<String> {
        self.inner.presets().iter().map(|p| p.to_string()).collect()
    }

    #[wasm_bindgen(getter)]
    pub fn canvas_width(&self) -> u32 {
        self.inner.surface().width()
    }

    #[wasm_bindgen(getter)]
    pub fn canvas_height(&self) -> u32 {
        self.inner.surface().height()
    }

    /// Full frame box as a plain object, or undefined before measurement.
    pub fn frame(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.frame())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Image transform as `{ translateX, translateY, scale, rotation }`.
    pub fn transform(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.transform())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsCropper {
    fn build(
        presets: &[u32],
        is_fixed_aspect_ratio: bool,
        max_output_width: u32,
    ) -> Result<Self, CropError> {
        let mut config = CropperConfig::new()
            .with_presets(parse_presets(presets)?)
            .with_fixed_aspect_ratio(is_fixed_aspect_ratio);
        if max_output_width > 0 {
            config.max_output_width = max_output_width;
        }
        let inner = Compositor::new(config)?;
        Ok(Self { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cropper() -> JsCropper {
        let mut c = JsCropper::build(&[1, 1, 16, 9], false, 64).unwrap();
        c.measure_container(0.0, 320.0);
        c
    }

    #[test]
    fn test_parse_presets() {
        let presets = parse_presets(&[16, 9, 4, 5]).unwrap();
        assert_eq!(presets.len(), 2);
        assert_eq!(presets[0].to_string(), "16:9");
        assert_eq!(presets[1].to_string(), "4:5");
    }

    #[test]
    fn test_parse_presets_defaults_to_square() {
        assert_eq!(parse_presets(&[]).unwrap(), vec![AspectRatioPreset::SQUARE]);
    }

    #[test]
    fn test_parse_presets_rejects_odd_and_zero() {
        assert!(matches!(
            parse_presets(&[16, 9, 4]),
            Err(CropError::InvalidConfig(_))
        ));
        assert!(matches!(
            parse_presets(&[16, 0]),
            Err(CropError::InvalidPreset { .. })
        ));
    }

    #[test]
    fn test_parse_touches_ignores_trailing_value() {
        let touches = parse_touches(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(touches, vec![Point2D::new(1.0, 2.0), Point2D::new(3.0, 4.0)]);
    }

    #[test]
    fn test_zero_output_width_uses_default() {
        let c = JsCropper::build(&[], false, 0).unwrap();
        assert_eq!((c.canvas_width(), c.canvas_height()), (1280, 1280));
    }

    #[test]
    fn test_frame_unmeasured() {
        let c = JsCropper::build(&[1, 1], false, 64).unwrap();
        assert_eq!(c.frame_width(), None);
        assert_eq!(c.selected_preset(), Some(0));
    }

    #[test]
    fn test_drag_marks_custom() {
        let mut c = cropper();
        assert!(c.drag_start(320.0));
        assert!(c.is_dragging());
        assert!(c.drag_move(160.0));
        assert!(c.drag_end());
        assert_eq!(c.selected_preset(), None);
        assert_eq!(c.frame_height(), Some(160.0));
        assert_eq!((c.canvas_width(), c.canvas_height()), (64, 32));
    }

    #[test]
    fn test_select_preset() {
        let mut c = cropper();
        assert!(c.select_preset(1).unwrap());
        assert_eq!(c.selected_preset(), Some(1));
        assert_eq!(c.frame_width(), Some(320.0));
        assert_eq!(c.preset_labels(), vec!["1:1", "16:9"]);
    }

    #[test]
    fn test_fixed_ratio_disables_drag() {
        let mut c = JsCropper::build(&[1, 1], true, 64).unwrap();
        c.measure_container(0.0, 320.0);
        assert!(c.is_fixed_aspect_ratio());
        assert!(!c.drag_start(320.0));
    }

    #[test]
    fn test_touch_flow_and_extract() {
        let mut c = cropper();
        c.load_pixels(2, 2, vec![255; 16]).unwrap();
        assert!(c.has_image());

        c.touch_start(&[0.0, 0.0, 100.0, 0.0]);
        assert!(c.touch_move(&[50.0, 0.0, 150.0, 0.0]));
        assert!(c.touch_end());
        assert!(c.needs_render());

        let out = c.extract();
        assert_eq!((out.width(), out.height()), (64, 64));
        assert!(!c.needs_render());
    }

    #[test]
    fn test_load_image_bytes() {
        let mut c = cropper();
        let surface = CanvasSurface::new(4, 3).unwrap();
        let png = framecrop_core::encode_png(&surface).unwrap();
        c.load_image(&png).unwrap();
        assert!(c.has_image());
        c.clear_image();
        assert!(!c.has_image());
    }
}

/// WASM-specific tests that require JsValue.
///
/// These tests exercise the `JsValue` conversions and can only run on wasm32
/// targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde::Serialize;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct TestConfig {
        aspect_ratio_presets: Vec<[u32; 2]>,
        max_output_width: u32,
    }

    #[wasm_bindgen_test]
    fn test_from_config() {
        let config = TestConfig {
            aspect_ratio_presets: vec![[16, 9]],
            max_output_width: 160,
        };
        let value = serde_wasm_bindgen::to_value(&config).unwrap();
        let c = JsCropper::from_config(value).unwrap();
        assert_eq!((c.canvas_width(), c.canvas_height()), (160, 90));
    }

    #[wasm_bindgen_test]
    fn test_from_config_rejects_zero_preset() {
        let config = TestConfig {
            aspect_ratio_presets: vec![[16, 0]],
            max_output_width: 160,
        };
        let value = serde_wasm_bindgen::to_value(&config).unwrap();
        assert!(JsCropper::from_config(value).is_err());
    }

    #[wasm_bindgen_test]
    fn test_constructor_error_is_string() {
        let err = JsCropper::new(vec![1], false, 64).err().unwrap();
        assert!(err.as_string().unwrap().contains("pairs"));
    }

    #[wasm_bindgen_test]
    fn test_frame_undefined_before_measure() {
        let c = JsCropper::new(vec![1, 1], false, 64).unwrap();
        assert!(c.frame().unwrap().is_undefined() || c.frame().unwrap().is_null());
    }

    #[wasm_bindgen_test]
    fn test_transform_object() {
        let c = JsCropper::new(vec![1, 1], false, 64).unwrap();
        let value = c.transform().unwrap();
        let scale = js_sys::Reflect::get(&value, &JsValue::from_str("scale")).unwrap();
        assert_eq!(scale.as_f64(), Some(1.0));
    }

    #[wasm_bindgen_test]
    fn test_crop_callback_receives_surface() {
        let mut c = JsCropper::new(vec![1, 1], false, 8).unwrap();
        let callback = js_sys::Function::new_with_args(
            "surface",
            "globalThis.__cropWidth = surface.width;",
        );
        c.set_on_crop_complete(callback);
        c.request_crop();
        let width =
            js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("__cropWidth")).unwrap();
        assert_eq!(width.as_f64(), Some(8.0));
    }
}
