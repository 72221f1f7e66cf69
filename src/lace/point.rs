//! Bezier control points emitted by the lacing strategies.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Role of a control point along the lace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PointKind {
    /// The lace passes through an eyelet column on the patch boundary.
    Side,
    /// Any point between the eyelet columns, including spliced knot points.
    Middle,
}

/// A single bezier control point with free handles.
///
/// Control points are values: transforms return a new point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    kind: PointKind,
    position: Point3<f64>,
    handle_left: Point3<f64>,
    handle_right: Point3<f64>,
}

impl ControlPoint {
    /// Create a control point.
    pub fn new(
        kind: PointKind,
        position: Point3<f64>,
        handle_left: Point3<f64>,
        handle_right: Point3<f64>,
    ) -> Self {
        Self {
            kind,
            position,
            handle_left,
            handle_right,
        }
    }

    /// The point's role.
    #[inline]
    pub fn kind(&self) -> PointKind {
        self.kind
    }

    /// Position of the point on the curve.
    #[inline]
    pub fn position(&self) -> &Point3<f64> {
        &self.position
    }

    /// Incoming handle.
    #[inline]
    pub fn handle_left(&self) -> &Point3<f64> {
        &self.handle_left
    }

    /// Outgoing handle.
    #[inline]
    pub fn handle_right(&self) -> &Point3<f64> {
        &self.handle_right
    }

    /// Whether this is a SIDE point.
    #[inline]
    pub fn is_side(&self) -> bool {
        self.kind == PointKind::Side
    }

    /// Return the point with its handles exchanged.
    pub fn swapped_handles(&self) -> Self {
        Self {
            handle_left: self.handle_right,
            handle_right: self.handle_left,
            ..*self
        }
    }

}

/// Ordered control points of one lace curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaceResult {
    /// Control points in curve order.
    pub points: Vec<ControlPoint>,

    /// Whether the curve closes on itself. False once a knot is spliced in.
    pub cyclic: bool,
}

impl LaceResult {
    /// Number of SIDE points on the curve.
    pub fn side_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_side()).count()
    }

    /// Number of MIDDLE points on the curve.
    pub fn middle_count(&self) -> usize {
        self.points.len() - self.side_count()
    }
}
