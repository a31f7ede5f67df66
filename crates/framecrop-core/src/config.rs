//! Cropper configuration supplied by the host page.

use serde::{Deserialize, Serialize};

use crate::aspect::{AspectRatioPreset, RatioLimits};
use crate::error::CropError;
use crate::surface::CanvasSurface;

/// Default width basis of the exported canvas, in pixels.
pub const DEFAULT_MAX_OUTPUT_WIDTH: u32 = 1280;

/// Smallest frame side a free drag may produce, in display pixels.
pub const DEFAULT_MIN_FRAME_SIDE: f64 = 100.0;

/// Finger-distance change (canvas pixels) that adds 1.0 to the scale.
pub const DEFAULT_SCALE_SENSITIVITY: f64 = 150.0;

/// Side of the square origin marker, in canvas pixels.
pub const DEFAULT_MARKER_SIZE: u32 = 10;

/// RGBA color.
pub type Rgba = [u8; 4];

/// Everything a host can tune about a cropper instance.
///
/// Field names are camelCase on the wire so JavaScript hosts can pass
/// `{ isFixedAspectRatio: true, aspectRatioPresets: [[16, 9]] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropperConfig {
    /// When set, the free-drag handle is disabled and only presets size the frame.
    pub is_fixed_aspect_ratio: bool,
    /// Ordered presets; index 0 is applied at mount.
    pub aspect_ratio_presets: Vec<AspectRatioPreset>,
    /// Pixel width of the canvas backing buffer.
    pub max_output_width: u32,
    /// Lower clamp for both frame sides during a drag.
    pub min_frame_side: f64,
    /// Pinch sensitivity: distance delta per unit of scale.
    pub scale_sensitivity: f64,
    /// Origin marker side in canvas pixels; zero hides the marker.
    pub marker_size: u32,
    pub background_color: Rgba,
    pub marker_color: Rgba,
    /// Apply the tracked scale when drawing. Off by default: the scale is
    /// tracked from pinch gestures but the image is drawn at natural size.
    pub apply_scale: bool,
    /// Optional bounds on the ratio a free drag may produce.
    pub ratio_limits: Option<RatioLimits>,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            is_fixed_aspect_ratio: false,
            aspect_ratio_presets: vec![AspectRatioPreset::SQUARE],
            max_output_width: DEFAULT_MAX_OUTPUT_WIDTH,
            min_frame_side: DEFAULT_MIN_FRAME_SIDE,
            scale_sensitivity: DEFAULT_SCALE_SENSITIVITY,
            marker_size: DEFAULT_MARKER_SIZE,
            background_color: [240, 248, 255, 255],
            marker_color: [255, 0, 0, 255],
            apply_scale: false,
            ratio_limits: None,
        }
    }
}

impl CropperConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style preset override.
    pub fn with_presets(mut self, presets: Vec<AspectRatioPreset>) -> Self {
        self.aspect_ratio_presets = presets;
        self
    }

    /// Builder-style fixed-ratio toggle.
    pub fn with_fixed_aspect_ratio(mut self, fixed: bool) -> Self {
        self.is_fixed_aspect_ratio = fixed;
        self
    }

    /// Check every field a cropper relies on.
    pub fn validate(&self) -> Result<(), CropError> {
        if self.aspect_ratio_presets.is_empty() {
            return Err(CropError::NoPresets);
        }
        if self.max_output_width == 0 {
            return Err(CropError::InvalidConfig(
                "maxOutputWidth must be non-zero".to_string(),
            ));
        }
        if !(self.min_frame_side.is_finite() && self.min_frame_side > 0.0) {
            return Err(CropError::InvalidConfig(format!(
                "minFrameSide must be positive (got {})",
                self.min_frame_side
            )));
        }
        if !(self.scale_sensitivity.is_finite() && self.scale_sensitivity > 0.0) {
            return Err(CropError::InvalidConfig(format!(
                "scaleSensitivity must be positive (got {})",
                self.scale_sensitivity
            )));
        }
        if let Some(limits) = &self.ratio_limits {
            limits.validate()?;
        }
        for preset in &self.aspect_ratio_presets {
            let (width, height) =
                CanvasSurface::dimensions_for(self.max_output_width, preset.decimal()).ok_or(
                    CropError::InvalidDimensions {
                        width: self.max_output_width,
                        height: 0,
                    },
                )?;
            if CanvasSurface::buffer_len(width, height).is_none() {
                return Err(CropError::InvalidDimensions { width, height });
            }
        }
        Ok(())
    }

    /// The preset applied at mount.
    pub fn default_preset(&self) -> Option<AspectRatioPreset> {
        self.aspect_ratio_presets.first().copied()
    }
}
