//! Auxiliary curve for cutting the eyelet holes.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use super::point::LaceResult;

/// One open two-point polyline per SIDE point of a lace, running from the
/// point's left handle to its right handle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HoleCurve {
    /// `[handle_left, handle_right]` of each SIDE point.
    pub segments: Vec<[Point3<f64>; 2]>,
}

impl HoleCurve {
    /// Collect the hole segments of `lace` in curve order.
    pub fn from_lace(lace: &LaceResult) -> Self {
        let segments = lace
            .points
            .iter()
            .filter(|p| p.is_side())
            .map(|p| [*p.handle_left(), *p.handle_right()])
            .collect();
        Self { segments }
    }

    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the lace had no SIDE points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
