//! Pure geometry helpers used by both engines.
//!
//! Points are tagged with the coordinate space they were measured in so a
//! display-pixel touch position can never be added to a canvas-pixel
//! translation by accident. Conversion between spaces is always explicit.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Sub};

use crate::error::CropError;

/// Coordinates relative to the top of the drag bounds (the frame container).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsLocal;

/// Coordinates in on-screen (CSS) pixels, as delivered by touch events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Display;

/// Coordinates in the canvas' backing pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas;

/// A 2D point in coordinate space `S`.
pub struct Point2D<S> {
    pub x: f64,
    pub y: f64,
    space: PhantomData<S>,
}

// Manual impls so the marker type does not need to implement these traits.
impl<S> Clone for Point2D<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Point2D<S> {}

impl<S> PartialEq for Point2D<S> {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl<S> fmt::Debug for Point2D<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Point2D")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<S> Point2D<S> {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            space: PhantomData,
        }
    }

    pub const fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Reinterpret this point in another space after an explicit mapping.
    pub fn map_to<T>(self, f: impl FnOnce(f64, f64) -> (f64, f64)) -> Point2D<T> {
        let (x, y) = f(self.x, self.y);
        Point2D::new(x, y)
    }
}

impl<S> Add for Point2D<S> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<S> Sub for Point2D<S> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike `f64::clamp` this never panics: when `min > max` (a container
/// narrower than the minimum frame side) the upper bound wins, so the
/// result still fits the container.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Derive the missing side of a rectangle from an aspect ratio
/// (`ratio = width / height`).
///
/// Given a width, returns the height; given a height, returns the width.
/// When both are supplied the width takes precedence.
///
/// # Errors
///
/// Returns [`CropError::MissingDimension`] when neither side is given.
pub fn dimension_from_ratio(
    ratio: f64,
    width: Option<f64>,
    height: Option<f64>,
) -> Result<f64, CropError> {
    match (width, height) {
        (Some(w), _) => Ok(w / ratio),
        (None, Some(h)) => Ok(h * ratio),
        (None, None) => Err(CropError::MissingDimension),
    }
}

/// Fit a rectangle of the given ratio into a square of side `ceiling`.
///
/// Landscape and square ratios take the full width, portrait ratios take
/// the full height.
pub fn fit_ratio(ratio: f64, ceiling: f64) -> Result<(f64, f64), CropError> {
    if ratio >= 1.0 {
        Ok((ceiling, dimension_from_ratio(ratio, Some(ceiling), None)?))
    } else {
        Ok((dimension_from_ratio(ratio, None, Some(ceiling))?, ceiling))
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance<S>(a: Point2D<S>, b: Point2D<S>) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Midpoint between two points.
#[inline]
pub fn midpoint<S>(a: Point2D<S>, b: Point2D<S>) -> Point2D<S> {
    Point2D::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Angle of the vector from `a` to `b`, in radians.
#[inline]
pub fn angle_between<S>(a: Point2D<S>, b: Point2D<S>) -> f64 {
    (b.y - a.y).atan2(b.x - a.x)
}

/// Wrap an angle difference into `(-PI, PI]`.
pub fn normalize_angle(mut radians: f64) -> f64 {
    use std::f64::consts::{PI, TAU};

    radians %= TAU;
    if radians > PI {
        radians -= TAU;
    } else if radians <= -PI {
        radians += TAU;
    }
    radians
}

/// Convert a fraction to its decimal value.
#[inline]
pub fn fraction_to_decimal(numerator: u32, denominator: u32) -> f64 {
    numerator as f64 / denominator as f64
}
