//! Crop-frame resize engine.
//!
//! The frame is resized through a single drag handle below it. Dragging the
//! handle changes the frame height until the height reaches the size
//! ceiling (the container width), at which point the same drag starts
//! narrowing the width instead, so the frame never outgrows its container.
//!
//! # States
//!
//! - [`DragAxis::Height`]: the drag controls height; width is left as is.
//! - [`DragAxis::Width`]: the drag controls width; height stays pinned at the
//!   ceiling.
//!
//! Height switches to width when the offset-corrected pointer passes the
//! ceiling. Width switches back when the pointer returns above the ceiling
//! and the width has grown back to the ceiling. Each switch re-anchors the
//! drag so the handle does not jump.
//!
//! # Coordinate System
//!
//! Pointer positions are client Y coordinates; the engine subtracts the
//! container top it was measured with. All sizes are display pixels.

mod engine;
mod frame;

pub use engine::ResizeEngine;
pub use frame::{DragAxis, FrameBox};
