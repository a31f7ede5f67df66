//! Aspect ratio presets and the selection marker.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CropError;
use crate::geometry::fraction_to_decimal;

/// A fixed `numerator:denominator` ratio offered to the user, e.g. `16:9`.
///
/// Serialized as a two-element array so hosts can pass `[[16, 9], [1, 1]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u32; 2]", into = "[u32; 2]")]
pub struct AspectRatioPreset {
    numerator: u32,
    denominator: u32,
}

impl AspectRatioPreset {
    /// Square, the default when a host supplies nothing.
    pub const SQUARE: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    /// Create a preset, rejecting zero terms.
    pub fn new(numerator: u32, denominator: u32) -> Result<Self, CropError> {
        if numerator == 0 || denominator == 0 {
            return Err(CropError::InvalidPreset {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// `width / height` as a decimal.
    pub fn decimal(&self) -> f64 {
        fraction_to_decimal(self.numerator, self.denominator)
    }
}

impl TryFrom<[u32; 2]> for AspectRatioPreset {
    type Error = CropError;

    fn try_from([numerator, denominator]: [u32; 2]) -> Result<Self, Self::Error> {
        Self::new(numerator, denominator)
    }
}

impl From<AspectRatioPreset> for [u32; 2] {
    fn from(preset: AspectRatioPreset) -> Self {
        [preset.numerator, preset.denominator]
    }
}

impl fmt::Display for AspectRatioPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.numerator, self.denominator)
    }
}

/// Parses labels such as `"16:9"`, `"16/9"` or `" 4 : 3 "`.
impl FromStr for AspectRatioPreset {
    type Err = CropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || CropError::UnparseablePreset(s.to_string());

        let (num, den) = s.split_once([':', '/']).ok_or_else(unparseable)?;
        let numerator = num.trim().parse().map_err(|_| unparseable())?;
        let denominator = den.trim().parse().map_err(|_| unparseable())?;
        Self::new(numerator, denominator)
    }
}

/// Which ratio the frame currently follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PresetSelection {
    /// A preset from the configured list, by index.
    Preset(usize),
    /// Free-dragged ratio that matches no preset selection.
    #[default]
    Custom,
}

impl PresetSelection {
    pub fn is_custom(&self) -> bool {
        matches!(self, PresetSelection::Custom)
    }
}

/// Bounds on the ratio a free drag may produce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioLimits {
    pub minimum: f64,
    pub maximum: f64,
}

impl RatioLimits {
    /// Check that both limits are positive, finite and ordered.
    pub fn validate(&self) -> Result<(), CropError> {
        let ok = self.minimum.is_finite()
            && self.maximum.is_finite()
            && self.minimum > 0.0
            && self.minimum <= self.maximum;
        if ok {
            Ok(())
        } else {
            Err(CropError::InvalidConfig(format!(
                "ratio limits must satisfy 0 < minimum <= maximum (got {} and {})",
                self.minimum, self.maximum
            )))
        }
    }

    /// Height range that keeps `width / height` inside the limits.
    pub fn height_range(&self, width: f64) -> (f64, f64) {
        (width / self.maximum, width / self.minimum)
    }

    /// Width range that keeps `width / height` inside the limits.
    pub fn width_range(&self, height: f64) -> (f64, f64) {
        (height * self.minimum, height * self.maximum)
    }
}
