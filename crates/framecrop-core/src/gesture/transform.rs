//! The persistent image transform and the deltas applied to it.

use serde::{Deserialize, Serialize};

use crate::geometry::{Canvas, Point2D};

/// Smallest scale a pinch can shrink the image to.
pub const MIN_SCALE: f64 = 0.05;

/// Affine placement of the source image on the canvas.
///
/// The image center is placed at `(translate_x, translate_y)` and rotated
/// about it by `rotation` radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    /// Uniform scale, always positive.
    pub scale: f64,
    pub rotation: f64,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl ImageTransform {
    /// Identity transform placing the image center at `center`.
    pub fn centered_at(center: Point2D<Canvas>) -> Self {
        Self {
            translate_x: center.x,
            translate_y: center.y,
            ..Self::default()
        }
    }

    pub fn translation(&self) -> Point2D<Canvas> {
        Point2D::new(self.translate_x, self.translate_y)
    }

    /// Accumulate a gesture delta.
    pub fn apply(&mut self, delta: &TransformDelta) {
        self.translate_x += delta.translate.x;
        self.translate_y += delta.translate.y;
        self.scale = (self.scale + delta.scale).max(MIN_SCALE);
        self.rotation += delta.rotation;
    }
}

/// Change produced by one gesture sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformDelta {
    pub translate: Point2D<Canvas>,
    pub scale: f64,
    pub rotation: f64,
}

impl TransformDelta {
    pub fn pan(translate: Point2D<Canvas>) -> Self {
        Self {
            translate,
            scale: 0.0,
            rotation: 0.0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.translate.x == 0.0
            && self.translate.y == 0.0
            && self.scale == 0.0
            && self.rotation == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let t = ImageTransform::default();
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.rotation, 0.0);
        assert_eq!(t.translation(), Point2D::origin());
    }

    #[test]
    fn test_apply_accumulates() {
        let mut t = ImageTransform::centered_at(Point2D::new(100.0, 50.0));
        t.apply(&TransformDelta {
            translate: Point2D::new(5.0, -5.0),
            scale: 0.5,
            rotation: 0.1,
        });
        t.apply(&TransformDelta::pan(Point2D::new(1.0, 1.0)));

        assert_eq!(t.translate_x, 106.0);
        assert_eq!(t.translate_y, 46.0);
        assert_eq!(t.scale, 1.5);
        assert_eq!(t.rotation, 0.1);
    }

    #[test]
    fn test_scale_stays_positive() {
        let mut t = ImageTransform::default();
        t.apply(&TransformDelta {
            translate: Point2D::origin(),
            scale: -10.0,
            rotation: 0.0,
        });
        assert_eq!(t.scale, MIN_SCALE);
    }

    #[test]
    fn test_zero_delta() {
        assert!(TransformDelta::pan(Point2D::origin()).is_zero());
        assert!(!TransformDelta::pan(Point2D::new(0.0, 1.0)).is_zero());
    }
}
