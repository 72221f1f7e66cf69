//! Knot fragments spliced into the top row of a lace.
//!
//! A knot fragment is a small curve asset with at least two bezier splines,
//! authored with the knot's span along +X, its front facing +Z and centred on
//! the origin. Splicing scales it to the lace's bevel depth, turns its X axis
//! onto the top edge and moves it to the top row's centre. One spline is then
//! appended to the left strand and the other prepended to the right strand.

use std::f64::consts::PI;

use log::debug;
use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{LaceError, Result};

use super::point::{ControlPoint, PointKind};
use super::settings::KnotSettings;

/// Quaternion components below this are treated as zero.
const AXIS_EPSILON: f64 = 1e-9;

/// A bezier point of a knot spline, in fragment space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierPoint {
    /// Point on the curve.
    pub position: Point3<f64>,
    /// Incoming handle.
    pub handle_left: Point3<f64>,
    /// Outgoing handle.
    pub handle_right: Point3<f64>,
}

/// One spline of a knot fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnotSpline {
    /// Authoring name, informational only.
    #[serde(default)]
    pub name: String,
    /// Bezier points in spline order.
    pub points: Vec<BezierPoint>,
}

/// A knot curve asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnotFragment {
    /// Bevel depth the fragment was authored with; sets its scale.
    pub bevel_depth: f64,
    /// At least two splines; the knot's two halves.
    pub splines: Vec<KnotSpline>,
}

/// Where the knot goes: the top edge and the point it is centred on.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KnotTarget {
    /// Top-row vertex joined to the left strand.
    pub edge_from: Point3<f64>,
    /// Top-row vertex joined to the right strand.
    pub edge_to: Point3<f64>,
    /// Where the fragment's origin lands.
    pub center: Point3<f64>,
    /// The top row is walked right to left (odd lattice height).
    pub reversed: bool,
}

/// Fit the knot onto the top row.
///
/// Returns the `(left, right)` point runs: `left` continues the left strand,
/// `right` leads into the right strand.
///
/// # Errors
///
/// - [`LaceError::KnotAssetInvalid`] if the fragment has fewer than two
///   splines or a selected spline is missing or empty
/// - [`LaceError::DegenerateGeometry`] if the fragment's bevel depth is not
///   positive or the top edge has zero length
pub(crate) fn splice_knot(
    knot: &KnotSettings,
    bevel_depth: f64,
    target: &KnotTarget,
) -> Result<(Vec<ControlPoint>, Vec<ControlPoint>)> {
    let fragment = &knot.fragment;

    if fragment.splines.len() < 2 {
        return Err(LaceError::KnotAssetInvalid(format!(
            "fragment has {} spline(s), at least 2 required",
            fragment.splines.len()
        )));
    }
    let left_spline = select_spline(fragment, knot.spline_left, "left")?;
    let right_spline = select_spline(fragment, knot.spline_right, "right")?;

    if !(fragment.bevel_depth > 0.0) {
        return Err(LaceError::DegenerateGeometry(format!(
            "knot bevel depth {} is not positive",
            fragment.bevel_depth
        )));
    }

    let mut left = left_spline.points.clone();
    let mut right = right_spline.points.clone();
    if knot.reverse_left {
        left.reverse();
    }
    if knot.reverse_right {
        right.reverse();
    }

    let (mut from, mut to) = (target.edge_from, target.edge_to);
    if target.reversed {
        std::mem::swap(&mut from, &mut to);
    } else {
        right.reverse();
        left.reverse();
        std::mem::swap(&mut left, &mut right);
    }

    let rotation = edge_rotation(&(from - to))?;
    let scale = bevel_depth / fragment.bevel_depth;
    debug!("splicing knot: scale {:.4}, {}+{} points", scale, left.len(), right.len());

    let place = |p: &Point3<f64>| -> Point3<f64> {
        let mut local = *p;
        if knot.invert {
            local.y = -local.y;
        }
        let rotated = rotation * (local.coords * scale);
        target.center + rotated
    };
    let convert = |bp: &BezierPoint| {
        ControlPoint::new(
            PointKind::Middle,
            place(&bp.position),
            place(&bp.handle_left),
            place(&bp.handle_right),
        )
    };

    Ok((
        left.iter().map(convert).collect(),
        right.iter().map(convert).collect(),
    ))
}

fn select_spline<'a>(fragment: &'a KnotFragment, index: usize, side: &str) -> Result<&'a KnotSpline> {
    let spline = fragment.splines.get(index).ok_or_else(|| {
        LaceError::KnotAssetInvalid(format!("{} spline index {} out of range", side, index))
    })?;
    if spline.points.is_empty() {
        return Err(LaceError::KnotAssetInvalid(format!(
            "{} spline {} has no points",
            side, index
        )));
    }
    Ok(spline)
}

/// Rotation taking the fragment's +X axis onto `edge`.
///
/// The edge is first brought onto +X. When that rotation tilts around the Y
/// axis, the opposite edge is used instead together with a half turn about Z
/// so the fragment keeps its roll.
fn edge_rotation(edge: &Vector3<f64>) -> Result<UnitQuaternion<f64>> {
    if edge.norm() <= f64::EPSILON {
        return Err(LaceError::DegenerateGeometry(
            "top edge has zero length".to_string(),
        ));
    }

    let half_turn = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), PI);
    let to_x = |v: &Vector3<f64>| {
        UnitQuaternion::rotation_between(v, &Vector3::x()).unwrap_or(half_turn)
    };

    let mut q = to_x(edge);
    if q.quaternion().j.abs() > AXIS_EPSILON {
        q = half_turn * to_x(&-edge);
    }

    Ok(q.inverse())
}
