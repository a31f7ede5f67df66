//! Multi-touch gesture transform engine.
//!
//! Raw touch samples are turned into incremental changes of the image's
//! affine transform:
//!
//! - **Two contacts**: pan by the midpoint delta, scale by the change in
//!   finger distance, rotate by the change in finger angle.
//! - **Four contacts**: pan by the first contact's delta.
//! - **Any other count**: no change.
//!
//! Deltas are always frame-to-frame: after every applied sample the session
//! reference moves to that sample. The accumulated [`ImageTransform`]
//! outlives every session.
//!
//! # Coordinate System
//!
//! Touches arrive in display pixels. They are converted to canvas pixels
//! with the canvas-to-display scale factor before any delta is computed, so
//! the transform is always expressed in canvas pixels.

mod engine;
mod session;
mod transform;

pub use engine::{CanvasMetrics, TransformEngine};
pub use session::{GestureMode, GestureSession};
pub use transform::{ImageTransform, TransformDelta, MIN_SCALE};
