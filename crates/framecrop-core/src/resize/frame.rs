//! Frame geometry snapshot handed to the renderer.

use serde::Serialize;

/// Which frame dimension an active drag controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DragAxis {
    Height,
    Width,
}

/// Current crop-frame box, in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameBox {
    pub width: f64,
    pub height: f64,
    /// `width / height`, or the selected preset's exact ratio.
    pub aspect_ratio: f64,
    /// True while an active drag controls the width.
    pub threshold_crossed: bool,
    /// Width when the current drag (or its last axis switch) began.
    pub width_on_drag_start: f64,
    /// Distance between the pointer and the frame's bottom edge at drag start.
    pub drag_start_offset: f64,
}

impl FrameBox {
    /// Frame size rounded to whole pixels, for CSS layout.
    pub fn rounded_size(&self) -> (u32, u32) {
        (
            self.width.round().max(0.0) as u32,
            self.height.round().max(0.0) as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_size() {
        let frame = FrameBox {
            width: 399.6,
            height: 224.4,
            aspect_ratio: 16.0 / 9.0,
            threshold_crossed: false,
            width_on_drag_start: 0.0,
            drag_start_offset: 0.0,
        };
        assert_eq!(frame.rounded_size(), (400, 224));
    }
}
