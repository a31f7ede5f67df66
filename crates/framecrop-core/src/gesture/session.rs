//! Per-contact-streak gesture bookkeeping.

use log::trace;

use super::TransformDelta;
use crate::geometry::{angle_between, distance, midpoint, normalize_angle, Canvas, Point2D};

/// Gesture kind implied by the number of simultaneous contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureMode {
    /// Two contacts: pan about the midpoint, scale and rotate.
    Pinch,
    /// Four contacts: pan only.
    Pan,
}

impl GestureMode {
    pub fn classify(contacts: usize) -> Option<Self> {
        match contacts {
            2 => Some(GestureMode::Pinch),
            4 => Some(GestureMode::Pan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Reference {
    Pinch {
        midpoint: Point2D<Canvas>,
        distance: f64,
        angle: f64,
    },
    Pan {
        anchor: Point2D<Canvas>,
    },
}

impl Reference {
    fn capture(contacts: &[Point2D<Canvas>]) -> Option<Self> {
        match GestureMode::classify(contacts.len())? {
            GestureMode::Pinch => Some(Reference::Pinch {
                midpoint: midpoint(contacts[0], contacts[1]),
                distance: distance(contacts[0], contacts[1]),
                angle: angle_between(contacts[0], contacts[1]),
            }),
            GestureMode::Pan => Some(Reference::Pan {
                anchor: contacts[0],
            }),
        }
    }

    fn mode(&self) -> GestureMode {
        match self {
            Reference::Pinch { .. } => GestureMode::Pinch,
            Reference::Pan { .. } => GestureMode::Pan,
        }
    }
}

/// State for one continuous touch-contact streak.
///
/// Created on touch start, dropped on touch end or cancel. The contact
/// count is re-classified on every sample; when it changes to another
/// gesture kind the reference is re-captured instead of producing a delta,
/// so adding or lifting fingers never makes the image jump.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    start_mode: Option<GestureMode>,
    reference: Option<Reference>,
    origin: Option<Point2D<Canvas>>,
}

impl GestureSession {
    /// Start a session from the contacts present at touch start.
    pub fn begin(contacts: &[Point2D<Canvas>]) -> Self {
        let reference = Reference::capture(contacts);
        Self {
            start_mode: GestureMode::classify(contacts.len()),
            origin: match reference {
                Some(Reference::Pinch { midpoint, .. }) => Some(midpoint),
                _ => None,
            },
            reference,
        }
    }

    /// Gesture kind at session start, if the contact count was recognized.
    pub fn start_mode(&self) -> Option<GestureMode> {
        self.start_mode
    }

    /// Gesture kind the current reference was captured for.
    pub fn active_mode(&self) -> Option<GestureMode> {
        self.reference.map(|r| r.mode())
    }

    /// Latest two-finger midpoint, the pivot shown on screen.
    pub fn origin(&self) -> Option<Point2D<Canvas>> {
        self.origin
    }

    /// Consume one sample, returning the delta since the previous sample.
    pub fn advance(
        &mut self,
        contacts: &[Point2D<Canvas>],
        scale_sensitivity: f64,
    ) -> Option<TransformDelta> {
        let Some(mode) = GestureMode::classify(contacts.len()) else {
            self.reference = None;
            return None;
        };

        let current = Reference::capture(contacts)?;
        let previous = self.reference.replace(current);

        let delta = match (previous, current) {
            (
                Some(Reference::Pinch {
                    midpoint: ref_mid,
                    distance: ref_dist,
                    angle: ref_angle,
                }),
                Reference::Pinch {
                    midpoint: mid,
                    distance: dist,
                    angle,
                },
            ) => {
                self.origin = Some(mid);
                TransformDelta {
                    translate: mid - ref_mid,
                    scale: (dist - ref_dist) / scale_sensitivity,
                    rotation: normalize_angle(angle - ref_angle),
                }
            }
            (Some(Reference::Pan { anchor: previous }), Reference::Pan { anchor }) => {
                TransformDelta::pan(anchor - previous)
            }
            _ => {
                if let Reference::Pinch { midpoint, .. } = current {
                    self.origin = Some(midpoint);
                }
                trace!("gesture reference re-captured for {:?}", mode);
                return None;
            }
        };

        trace!("gesture {:?} delta {:?}", mode, delta);
        Some(delta)
    }
}
