//! WASM-compatible wrapper types for the cropper output.
//!
//! This module provides JavaScript-friendly types that wrap the core surface
//! type, handling the conversion between Rust and JavaScript data representations.

use framecrop_core::{encode_jpeg, encode_png, CanvasSurface};
use wasm_bindgen::prelude::*;

/// A finished crop, as handed to JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`, ready for `new ImageData(...)`.
///
/// The `free()` method can be called to explicitly release WASM memory, but this is
/// optional as wasm-bindgen's finalizer will handle cleanup automatically.
#[wasm_bindgen]
pub struct JsSurface {
    inner: CanvasSurface,
}

#[wasm_bindgen]
impl JsSurface {
    /// Get the surface width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Get the surface height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4 for RGBA)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels().len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels().to_vec()
    }

    /// Encode as JPEG bytes (quality 1-100, recommended: 90).
    pub fn to_jpeg(&self, quality: u8) -> Result<Vec<u8>, JsValue> {
        encode_jpeg(&self.inner, quality).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Encode as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, JsValue> {
        encode_png(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {}
}

impl From<CanvasSurface> for JsSurface {
    fn from(inner: CanvasSurface) -> Self {
        Self { inner }
    }
}
