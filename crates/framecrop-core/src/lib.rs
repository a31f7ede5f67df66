//! Framecrop Core - crop frame and image transform engine
//!
//! This crate provides the state machines behind an interactive image
//! cropper: a resizable crop frame with aspect-ratio presets, a multi-touch
//! pan/pinch/rotate transform for the image inside it, and a compositor that
//! rasterizes the result onto a fixed-width output surface.

pub mod aspect;
pub mod compositor;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod raster;
pub mod resize;
pub mod surface;

pub use aspect::{AspectRatioPreset, PresetSelection, RatioLimits};
pub use compositor::{Compositor, CropCallback};
pub use config::{CropperConfig, Rgba};
pub use decode::{decode_source, Orientation, SourceImage};
pub use encode::{encode_jpeg, encode_png};
pub use error::CropError;
pub use geometry::{BoundsLocal, Canvas, Display, Point2D};
pub use gesture::{
    CanvasMetrics, GestureMode, GestureSession, ImageTransform, TransformDelta, TransformEngine,
};
pub use raster::RenderStyle;
pub use resize::{DragAxis, FrameBox, ResizeEngine};
pub use surface::CanvasSurface;
