//! Resize engine state and drag/preset transitions.

use log::{debug, trace};

use super::{DragAxis, FrameBox};
use crate::aspect::{AspectRatioPreset, PresetSelection, RatioLimits};
use crate::config::CropperConfig;
use crate::error::CropError;
use crate::geometry::{clamp, fit_ratio, BoundsLocal, Point2D};

/// Owns the crop frame's size and aspect ratio.
///
/// Every mutation goes through one of the transition methods below; each
/// returns `true` when the frame changed so the caller knows to re-render.
#[derive(Debug, Clone)]
pub struct ResizeEngine {
    presets: Vec<AspectRatioPreset>,
    fixed: bool,
    min_side: f64,
    ratio_limits: Option<RatioLimits>,

    container_top: f64,
    /// Container width; the upper bound for both frame sides.
    size_ceiling: f64,

    width: f64,
    height: f64,
    aspect_ratio: f64,
    selection: PresetSelection,

    drag: Option<DragAxis>,
    width_on_drag_start: f64,
    drag_start_offset: f64,
}

impl ResizeEngine {
    /// Create an engine at preset 0. The frame has no size until
    /// [`measure_container`](Self::measure_container) is called.
    pub fn new(config: &CropperConfig) -> Result<Self, CropError> {
        let first = config.default_preset().ok_or(CropError::NoPresets)?;

        Ok(Self {
            presets: config.aspect_ratio_presets.clone(),
            fixed: config.is_fixed_aspect_ratio,
            min_side: config.min_frame_side,
            ratio_limits: config.ratio_limits,
            container_top: 0.0,
            size_ceiling: 0.0,
            width: 0.0,
            height: 0.0,
            aspect_ratio: first.decimal(),
            selection: PresetSelection::Preset(0),
            drag: None,
            width_on_drag_start: 0.0,
            drag_start_offset: 0.0,
        })
    }

    /// Current frame, or `None` before the container has a usable width.
    pub fn frame(&self) -> Option<FrameBox> {
        if !self.is_measured() {
            return None;
        }
        Some(FrameBox {
            width: self.width,
            height: self.height,
            aspect_ratio: self.aspect_ratio,
            threshold_crossed: self.threshold_crossed(),
            width_on_drag_start: self.width_on_drag_start,
            drag_start_offset: self.drag_start_offset,
        })
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn selection(&self) -> PresetSelection {
        self.selection
    }

    pub fn presets(&self) -> &[AspectRatioPreset] {
        &self.presets
    }

    pub fn size_ceiling(&self) -> f64 {
        self.size_ceiling
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn is_measured(&self) -> bool {
        self.size_ceiling > 0.0
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// True while an active drag controls the width.
    pub fn threshold_crossed(&self) -> bool {
        self.drag == Some(DragAxis::Width)
    }

    /// Record the container's position and width, rescaling the frame to
    /// the new width at the current ratio.
    ///
    /// A zero, negative or non-finite width is ignored.
    pub fn measure_container(&mut self, top: f64, width: f64) -> bool {
        if !(width.is_finite() && width > 0.0) || !top.is_finite() {
            return false;
        }

        self.container_top = top;
        if width == self.size_ceiling {
            return false;
        }
        let Ok((fitted_width, fitted_height)) = fit_ratio(self.aspect_ratio, width) else {
            return false;
        };

        debug!(
            "container width {} -> {}, ratio {:.4}",
            self.size_ceiling, width, self.aspect_ratio
        );
        self.size_ceiling = width;
        (self.width, self.height) = (fitted_width, fitted_height);
        true
    }

    /// Apply the preset at `index`, returning the frame to a clean
    /// non-dragging state.
    pub fn select_preset(&mut self, index: usize) -> Result<bool, CropError> {
        let preset = *self
            .presets
            .get(index)
            .ok_or(CropError::PresetIndexOutOfRange {
                index,
                len: self.presets.len(),
            })?;

        let ratio = preset.decimal();
        let (width, height) = if self.is_measured() {
            fit_ratio(ratio, self.size_ceiling)?
        } else {
            (self.width, self.height)
        };

        let changed = self.selection != PresetSelection::Preset(index)
            || self.aspect_ratio != ratio
            || self.width != width
            || self.height != height
            || self.drag.is_some();

        debug!("select preset {} ({})", index, preset);
        self.selection = PresetSelection::Preset(index);
        self.aspect_ratio = ratio;
        self.width = width;
        self.height = height;
        self.drag = None;
        Ok(changed)
    }

    /// Pointer position in drag-bounds space, relative to the container top.
    fn local_pointer(&self, pointer_y: f64) -> Point2D<BoundsLocal> {
        Point2D::new(0.0, pointer_y - self.container_top)
    }

    /// Begin a handle drag at client Y `pointer_y`.
    ///
    /// Ignored when the ratio is fixed or the container is unmeasured.
    pub fn on_drag_start(&mut self, pointer_y: f64) -> bool {
        if self.fixed || !self.is_measured() || !pointer_y.is_finite() {
            return false;
        }

        // A frame already pinned at full height resumes width control.
        let axis = if self.height >= self.size_ceiling && self.width < self.size_ceiling {
            DragAxis::Width
        } else {
            DragAxis::Height
        };

        self.width_on_drag_start = self.width;
        self.drag_start_offset = self.local_pointer(pointer_y).y - self.height;
        self.drag = Some(axis);
        self.selection = PresetSelection::Custom;
        debug!("drag start on {:?} at y={}", axis, pointer_y);
        true
    }

    /// Follow the pointer during a drag.
    pub fn on_drag_move(&mut self, pointer_y: f64) -> bool {
        let Some(axis) = self.drag else {
            return false;
        };
        if !self.is_measured() || !pointer_y.is_finite() {
            return false;
        }

        let ceiling = self.size_ceiling;
        let local_y = self.local_pointer(pointer_y).y;
        let raw_offset = local_y - self.drag_start_offset;
        let (old_width, old_height) = (self.width, self.height);

        match axis {
            DragAxis::Width => {
                let mut width = self.width_on_drag_start - (raw_offset - ceiling);
                if let Some(limits) = &self.ratio_limits {
                    let (lo, hi) = limits.width_range(self.height);
                    width = clamp(width, lo, hi);
                }
                self.width = clamp(width, self.min_side, ceiling);
            }
            DragAxis::Height => {
                let mut height = raw_offset;
                if let Some(limits) = &self.ratio_limits {
                    let (lo, hi) = limits.height_range(self.width);
                    height = clamp(height, lo, hi);
                }
                self.height = clamp(height, self.min_side, ceiling);
            }
        }
        self.aspect_ratio = self.width / self.height;
        trace!(
            "drag {:?} raw={:.1} -> {:.1}x{:.1}",
            axis,
            raw_offset,
            self.width,
            self.height
        );

        match axis {
            // Only a frame pinned at full height hands over to width
            // control; ratio limits may hold it shorter.
            DragAxis::Height if raw_offset > ceiling && self.height >= ceiling => {
                self.width_on_drag_start = self.width;
                self.drag_start_offset = local_y - ceiling;
                self.drag = Some(DragAxis::Width);
                debug!("threshold crossed: drag now controls width");
            }
            DragAxis::Width if raw_offset < ceiling && self.width >= ceiling => {
                self.width_on_drag_start = self.width;
                self.drag_start_offset = local_y - self.height;
                self.drag = Some(DragAxis::Height);
                debug!("threshold released: drag now controls height");
            }
            _ => {}
        }

        old_width != self.width || old_height != self.height
    }

    /// End the drag. The frame keeps whatever size it reached.
    pub fn on_drag_end(&mut self) -> bool {
        if self.drag.take().is_some() {
            debug!("drag end at {:.1}x{:.1}", self.width, self.height);
            true
        } else {
            false
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
