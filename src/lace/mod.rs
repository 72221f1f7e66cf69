//! Lace curve generation.
//!
//! A lace patch is a quad-dominant mesh region with four boundary corners, such
//! as the eyelet field of a shoe. [`create_lace`] extracts the patch's vertex
//! lattice, weaves a bezier curve back and forth between its first and last
//! columns, and optionally splices a knot into the top row.
//!
//! # Example
//!
//! ```
//! use lacework::lace::{create_lace, LaceSettings, LacingMethod};
//! use lacework::mesh::build_from_quads;
//! use nalgebra::Point3;
//!
//! // A 3x3 vertex patch.
//! let vertices: Vec<Point3<f64>> = (0..9)
//!     .map(|i| Point3::new((i % 3) as f64, (i / 3) as f64, 0.0))
//!     .collect();
//! let faces = vec![[0, 1, 4, 3], [1, 2, 5, 4], [3, 4, 7, 6], [4, 5, 8, 7]];
//! let mesh = build_from_quads(&vertices, &faces).unwrap();
//!
//! let settings = LaceSettings::default().with_method(LacingMethod::Display);
//! let curves = create_lace(&mesh, &settings).unwrap();
//!
//! assert!(curves.lace.cyclic);
//! assert_eq!(curves.lace.points.len(), 12);
//! ```

mod bow_tie;
mod display;
mod geometry;
mod grid;
mod hole;
mod knot;
mod passes;
mod point;
mod settings;
mod strategy;

pub use bow_tie::BowTieLacing;
pub use display::DisplayLacing;
pub use geometry::{center_by_arc_length, center_handle, cross_center_vertex, side_handles};
pub use grid::{find_corner_vertices, IndexGrid};
pub use hole::HoleCurve;
pub use knot::{BezierPoint, KnotFragment, KnotSpline};
pub use passes::{LaceContext, Strands, TopPoints};
pub use point::{ControlPoint, LaceResult, PointKind};
pub use settings::{KnotSettings, LaceSettings};
pub use strategy::{LacingMethod, LacingStrategy};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mesh::HalfEdgeMesh;

/// Everything generated for one lace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaceCurves {
    /// The lace itself.
    pub lace: LaceResult,

    /// Hole-cutting polylines, when requested.
    pub hole: Option<HoleCurve>,

    /// Bevel depth the lace curve should be rendered with.
    pub bevel_depth: f64,
}

/// Generate a lace over `mesh`.
///
/// The mesh is never modified; diagonals are cut into a private copy.
///
/// # Errors
///
/// - [`LaceError::InvalidParameter`](crate::error::LaceError::InvalidParameter)
///   for bad settings
/// - [`LaceError::InvalidGeometry`](crate::error::LaceError::InvalidGeometry)
///   if the mesh is not a four-cornered patch
/// - any lattice, geometry or knot error raised while weaving
pub fn create_lace(mesh: &HalfEdgeMesh, settings: &LaceSettings) -> Result<LaceCurves> {
    settings.validate()?;

    let corners = find_corner_vertices(mesh)?;

    let mut work = mesh.clone();
    let grid = IndexGrid::build(&work, &corners, settings.offset)?;
    debug!(
        "{} lacing over {}x{} lattice",
        settings.method,
        grid.width(),
        grid.height()
    );

    let lace = {
        let mut ctx = LaceContext::new(&mut work, &grid, settings);
        settings.method.create_curve_points(&mut ctx)?
    };

    let hole = settings.hole_curve.then(|| HoleCurve::from_lace(&lace));

    info!(
        "generated {} lace points ({} side), {} cut vertices",
        lace.points.len(),
        lace.side_count(),
        work.num_vertices() - mesh.num_vertices()
    );

    Ok(LaceCurves {
        lace,
        hole,
        bevel_depth: settings.bevel_depth,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use nalgebra::{Point3, Vector3};

    use crate::mesh::{build_from_polygons, HalfEdgeMesh};

    /// A flat `w x h` vertex grid in the XY plane with +Z normals.
    ///
    /// Vertex `y * w + x` sits at `(x, y, 0)`.
    pub fn grid_mesh(w: usize, h: usize) -> HalfEdgeMesh {
        let mut vertices = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                vertices.push(Point3::new(x as f64, y as f64, 0.0));
            }
        }
        let normals = vec![Vector3::z(); w * h];

        let mut faces = Vec::with_capacity((w - 1) * (h - 1));
        for y in 0..h - 1 {
            for x in 0..w - 1 {
                let v0 = y * w + x;
                faces.push(vec![v0, v0 + 1, v0 + w + 1, v0 + w]);
            }
        }

        build_from_polygons(&vertices, Some(&normals), &faces).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::grid_mesh;
    use super::*;
    use super::knot::{splice_knot, KnotTarget};
    use crate::error::LaceError;
    use crate::mesh::build_from_quads;
    use nalgebra::Point3;

    fn bp(x: f64, y: f64) -> BezierPoint {
        BezierPoint {
            position: Point3::new(x, y, 0.0),
            handle_left: Point3::new(x - 0.1, y, 0.0),
            handle_right: Point3::new(x + 0.1, y, 0.0),
        }
    }

    fn knot_fragment(splines: usize) -> KnotFragment {
        let all = vec![
            KnotSpline {
                name: "a".to_string(),
                points: vec![bp(-1.0, 0.0), bp(-0.5, 1.0)],
            },
            KnotSpline {
                name: "b".to_string(),
                points: vec![bp(0.5, 1.0), bp(1.0, 0.0)],
            },
        ];
        KnotFragment {
            bevel_depth: 0.01,
            splines: all.into_iter().take(splines).collect(),
        }
    }

    #[test]
    fn test_display_without_knot_is_cyclic() {
        let mesh = grid_mesh(3, 3);
        let curves = create_lace(&mesh, &LaceSettings::default()).unwrap();

        assert!(curves.lace.cyclic);
        assert_eq!(curves.lace.points.len(), 12);
        assert!((curves.bevel_depth - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_knot_opens_curve() {
        let mesh = grid_mesh(3, 3);
        let settings = LaceSettings::default().with_knot(KnotSettings::new(knot_fragment(2)));
        let curves = create_lace(&mesh, &settings).unwrap();

        assert!(!curves.lace.cyclic);
        // The top centre point is replaced by the four knot points.
        assert_eq!(curves.lace.points.len(), 15);
        assert_eq!(curves.lace.side_count(), 6);
    }

    #[test]
    fn test_knot_runs_close_both_strands() {
        let knot = KnotSettings::new(knot_fragment(2));

        for method in LacingMethod::ALL {
            for height in [3, 4] {
                let mesh = grid_mesh(3, height);
                let corners = find_corner_vertices(&mesh).unwrap();
                let grid = IndexGrid::build(&mesh, &corners, 0).unwrap();
                let y = height - 1;
                let (left_x, right_x) = if y % 2 == 0 { (0, 2) } else { (2, 0) };
                let left_side = *mesh.position(grid.get(left_x, y));
                let right_side = *mesh.position(grid.get(right_x, y));

                let plain = LaceSettings::default().with_method(method);
                let open = plain.clone().with_knot(knot.clone());

                // Without a knot the curve runs from the right top SIDE point
                // round to the left one, followed by the top centre.
                let closed = create_lace(&mesh, &plain).unwrap().lace;
                let n = closed.points.len();
                assert!(closed.cyclic);
                assert!(closed.points[0].is_side());
                assert_eq!(*closed.points[0].position(), right_side, "{} h={}", method, height);
                assert!(closed.points[n - 2].is_side());
                assert_eq!(*closed.points[n - 2].position(), left_side, "{} h={}", method, height);
                let top_center = closed.points[n - 1];
                assert_eq!(top_center.kind(), PointKind::Middle);

                let target = KnotTarget {
                    edge_from: left_side,
                    edge_to: right_side,
                    center: *top_center.position(),
                    reversed: height % 2 != 0,
                };
                let (knot_left, knot_right) = splice_knot(&knot, plain.bevel_depth, &target).unwrap();

                let lace = create_lace(&mesh, &open).unwrap().lace;
                let n = lace.points.len();
                assert!(!lace.cyclic);
                assert_eq!(n, closed.points.len() - 1 + knot_left.len() + knot_right.len());

                assert_eq!(lace.points[..knot_right.len()], knot_right[..], "{} h={}", method, height);
                assert_eq!(lace.points[n - knot_left.len()..], knot_left[..], "{} h={}", method, height);

                let after_right = lace.points[knot_right.len()];
                assert!(after_right.is_side());
                assert_eq!(*after_right.position(), right_side);
                let before_left = lace.points[n - knot_left.len() - 1];
                assert!(before_left.is_side());
                assert_eq!(*before_left.position(), left_side);
            }
        }
    }

    #[test]
    fn test_single_spline_knot_is_invalid() {
        let mesh = grid_mesh(3, 3);
        let settings = LaceSettings::default().with_knot(KnotSettings::new(knot_fragment(1)));
        let result = create_lace(&mesh, &settings);
        assert!(matches!(result, Err(LaceError::KnotAssetInvalid(_))));
    }

    #[test]
    fn test_three_faced_vertex_is_rejected() {
        let vertices: Vec<Point3<f64>> = (0..8)
            .map(|i| Point3::new((i % 3) as f64, (i / 3) as f64, 0.0))
            .collect();
        let faces = vec![[0, 1, 4, 3], [1, 2, 5, 4], [3, 4, 7, 6]];
        let mesh = build_from_quads(&vertices, &faces).unwrap();

        let result = create_lace(&mesh, &LaceSettings::default());
        assert!(matches!(result, Err(LaceError::InvalidGeometry(_))));
    }

    #[test]
    fn test_invalid_settings_rejected_first() {
        let mesh = grid_mesh(3, 3);
        let settings = LaceSettings::default().with_bevel_depth(f64::NAN);
        let result = create_lace(&mesh, &settings);
        assert!(matches!(result, Err(LaceError::InvalidParameter { .. })));
    }

    #[test]
    fn test_source_mesh_untouched() {
        let mesh = grid_mesh(4, 4);
        let before = (mesh.num_vertices(), mesh.num_faces(), mesh.num_halfedges());

        let settings = LaceSettings::default().with_simple_curve(false);
        create_lace(&mesh, &settings).unwrap();

        assert_eq!(before, (mesh.num_vertices(), mesh.num_faces(), mesh.num_halfedges()));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_hole_curve_follows_side_points() {
        let mesh = grid_mesh(3, 4);
        let settings = LaceSettings::default().with_method(LacingMethod::BowTie);
        let curves = create_lace(&mesh, &settings).unwrap();

        let hole = curves.hole.unwrap();
        assert_eq!(hole.len(), curves.lace.side_count());

        let without = create_lace(&mesh, &settings.clone().with_hole_curve(false)).unwrap();
        assert!(without.hole.is_none());
    }

    #[test]
    fn test_every_offset_produces_a_lace() {
        let mesh = grid_mesh(4, 3);
        for offset in 0..4 {
            let settings = LaceSettings::default().with_offset(offset);
            let curves = create_lace(&mesh, &settings).unwrap();
            assert!(!curves.lace.points.is_empty(), "offset {}", offset);
        }
    }

    #[test]
    fn test_curves_serialize() {
        let mesh = grid_mesh(3, 3);
        let curves = create_lace(&mesh, &LaceSettings::default()).unwrap();

        let json = serde_json::to_string(&curves).unwrap();
        let back: LaceCurves = serde_json::from_str(&json).unwrap();
        assert_eq!(back.lace.points.len(), 12);
        assert!(json.contains("\"SIDE\""));
    }
}
