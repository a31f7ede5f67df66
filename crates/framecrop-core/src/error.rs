//! Error types shared across the crate.
//!
//! Only caller mistakes and I/O-like failures are errors. Transient
//! conditions (unmeasured container, image still loading, canvas not yet
//! mounted) are handled by early returns in the engines and never surface
//! here.

use thiserror::Error;

/// Errors produced by framecrop operations.
#[derive(Debug, Error, PartialEq)]
pub enum CropError {
    /// A ratio-to-dimension derivation was requested with neither side known.
    #[error("Cannot derive a dimension from a ratio without a width or a height")]
    MissingDimension,

    /// The preset list supplied by the host was empty.
    #[error("At least one aspect ratio preset is required")]
    NoPresets,

    /// A preset had a zero numerator or denominator.
    #[error("Invalid aspect ratio preset {numerator}:{denominator}")]
    InvalidPreset { numerator: u32, denominator: u32 },

    /// A preset label could not be parsed.
    #[error("Cannot parse aspect ratio preset from {0:?}")]
    UnparseablePreset(String),

    /// A preset index outside the configured list was selected.
    #[error("Preset index {index} out of range (have {len} presets)")]
    PresetIndexOutOfRange { index: usize, len: usize },

    /// The configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Width or height is zero where a non-empty image is required.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel buffer length does not match its declared dimensions.
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// The source image could not be decoded.
    #[error("Failed to decode source image: {0}")]
    Decode(String),

    /// The surface could not be encoded for export.
    #[error("Failed to encode surface: {0}")]
    Encode(String),
}
