//! Framecrop WASM - WebAssembly bindings for the framecrop engines
//!
//! This crate exposes the framecrop-core cropper to JavaScript/TypeScript
//! applications. The presentation shell owns layout and event listeners;
//! everything stateful lives behind `JsCropper`.
//!
//! # Module Structure
//!
//! - `cropper` - The `JsCropper` object: frame drag, presets, touch gestures, extraction
//! - `types` - WASM-compatible wrapper for the extracted surface
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropper } from '@framecrop/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const cropper = new JsCropper(new Uint32Array([16, 9]), false, 1280);
//! cropper.measure_container(rect.top, rect.width);
//! const surface = cropper.extract();
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(surface.pixels()), surface.width), 0, 0);
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod types;

pub use cropper::JsCropper;
pub use types::JsSurface;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
