//! Handle and centre computations shared by the lacing passes.

use nalgebra::{Point3, Vector3};

use crate::error::{LaceError, Result};
use crate::mesh::{HalfEdgeMesh, VertexId};

/// Handle offset for a MIDDLE point lying between `side1` and `side2`.
///
/// The handle points from `side2` towards `side1` and its length is
/// `ratio` times the distance from `center` to `side1`.
///
/// # Errors
///
/// Returns [`LaceError::DegenerateGeometry`] if `side1` and `side2` coincide.
pub fn center_handle(
    center: &Point3<f64>,
    side1: &Point3<f64>,
    side2: &Point3<f64>,
    ratio: f64,
) -> Result<Vector3<f64>> {
    let span = side1 - side2;
    let span_length = span.norm();
    if span_length <= f64::EPSILON {
        return Err(LaceError::DegenerateGeometry(format!(
            "handle neighbours coincide at {:?}",
            side1
        )));
    }

    Ok(span * ((side1 - center).norm() / span_length * ratio))
}

/// Handles for a SIDE point: `length` along the normal on either side of
/// `position`, with the normal direction flipped by `sign`.
///
/// Returns `(handle_left, handle_right)`.
///
/// # Errors
///
/// Returns [`LaceError::DegenerateGeometry`] for a zero normal.
pub fn side_handles(
    position: &Point3<f64>,
    normal: &Vector3<f64>,
    length: f64,
    sign: f64,
) -> Result<(Point3<f64>, Point3<f64>)> {
    let unit = normal.try_normalize(f64::EPSILON).ok_or_else(|| {
        LaceError::DegenerateGeometry(format!("zero normal at {:?}", position))
    })?;
    let offset = unit * (length * sign);
    Ok((position + offset, position - offset))
}

/// Point halfway along a polyline by arc length, with a blended normal.
///
/// `samples` are `(position, normal)` pairs in polyline order. The normal
/// mixes the two endpoints of the straddling segment with the start weighted
/// by `t` and the end by `1 - t`, then is normalized when possible.
///
/// Returns `None` for fewer than two samples or a zero-length polyline.
pub fn center_by_arc_length(
    samples: &[(Point3<f64>, Vector3<f64>)],
) -> Option<(Point3<f64>, Vector3<f64>)> {
    if samples.len() < 2 {
        return None;
    }

    let total: f64 = samples.windows(2).map(|w| (w[1].0 - w[0].0).norm()).sum();
    if total <= f64::EPSILON {
        return None;
    }

    let half = total / 2.0;
    let mut travelled = 0.0;

    for w in samples.windows(2) {
        let (p0, n0) = &w[0];
        let (p1, n1) = &w[1];
        let segment = (p1 - p0).norm();
        if segment <= f64::EPSILON {
            continue;
        }

        if travelled + segment >= half {
            let t = (half - travelled) / segment;
            let position = p0 + (p1 - p0) * t;
            let blended = n0 * t + n1 * (1.0 - t);
            let normal = blended.try_normalize(f64::EPSILON).unwrap_or(blended);
            return Some((position, normal));
        }

        travelled += segment;
    }

    None
}

/// Find the vertex where two cut diagonals cross.
///
/// Scans the interior of `diagonal_b` for the first vertex with exactly two
/// neighbours on `diagonal_a` that either has no neighbour off both diagonals
/// or has six incident edges. The vertex is spliced into `diagonal_a` just
/// before the later of its two neighbours unless it already lies on it.
pub fn cross_center_vertex(
    mesh: &HalfEdgeMesh,
    diagonal_a: &mut Vec<VertexId>,
    diagonal_b: &[VertexId],
) -> Option<VertexId> {
    if diagonal_b.len() < 3 {
        return None;
    }

    for &v in &diagonal_b[1..diagonal_b.len() - 1] {
        let mut on_a = Vec::new();
        let mut elsewhere = 0;

        for n in mesh.vertex_neighbors(v) {
            if let Some(i) = diagonal_a.iter().position(|&a| a == n) {
                on_a.push(i);
            } else if !diagonal_b.contains(&n) {
                elsewhere += 1;
            }
        }

        if on_a.len() == 2 && (elsewhere == 0 || mesh.valence(v) == 6) {
            if !diagonal_a.contains(&v) {
                let later = on_a[0].max(on_a[1]);
                diagonal_a.insert(later, v);
            }
            return Some(v);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lace::test_support::grid_mesh;
    use crate::mesh::connect_vertex_path;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_handle_scales_with_ratio() {
        let c = Point3::new(1.0, 0.0, 0.0);
        let s1 = Point3::new(2.0, 0.0, 0.0);
        let s2 = Point3::new(0.0, 0.0, 0.0);

        let h = center_handle(&c, &s1, &s2, 0.5).unwrap();
        assert_relative_eq!(h, Vector3::new(0.5, 0.0, 0.0));

        let h2 = center_handle(&c, &s1, &s2, 1.0).unwrap();
        assert_relative_eq!(h2, h * 2.0);

        let zero = center_handle(&c, &s1, &s2, 0.0).unwrap();
        assert_relative_eq!(zero, Vector3::zeros());
    }

    #[test]
    fn test_center_handle_degenerate() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let result = center_handle(&Point3::origin(), &p, &p, 0.5);
        assert!(matches!(result, Err(LaceError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_side_handles() {
        let p = Point3::new(0.0, 1.0, 0.0);
        let n = Vector3::new(0.0, 0.0, 2.0);

        let (l, r) = side_handles(&p, &n, 0.1, 1.0).unwrap();
        assert_relative_eq!(l, Point3::new(0.0, 1.0, 0.1));
        assert_relative_eq!(r, Point3::new(0.0, 1.0, -0.1));

        let (l, r) = side_handles(&p, &n, 0.1, -1.0).unwrap();
        assert_relative_eq!(l, Point3::new(0.0, 1.0, -0.1));
        assert_relative_eq!(r, Point3::new(0.0, 1.0, 0.1));
    }

    #[test]
    fn test_side_handles_zero_normal() {
        let result = side_handles(&Point3::origin(), &Vector3::zeros(), 0.1, 1.0);
        assert!(matches!(result, Err(LaceError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_center_by_arc_length_midpoint() {
        let samples = [
            (Point3::new(0.0, 0.0, 0.0), Vector3::z()),
            (Point3::new(1.0, 0.0, 0.0), Vector3::z()),
            (Point3::new(2.0, 0.0, 0.0), Vector3::z()),
        ];
        let (p, n) = center_by_arc_length(&samples).unwrap();
        assert_relative_eq!(p, Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(n, Vector3::z());
    }

    #[test]
    fn test_center_by_arc_length_uneven() {
        // Total length 3, halfway falls a quarter into the second segment.
        let samples = [
            (Point3::new(0.0, 0.0, 0.0), Vector3::z()),
            (Point3::new(1.0, 0.0, 0.0), Vector3::z()),
            (Point3::new(3.0, 0.0, 0.0), Vector3::y()),
        ];
        let (p, n) = center_by_arc_length(&samples).unwrap();
        assert_relative_eq!(p, Point3::new(1.5, 0.0, 0.0));
        assert_relative_eq!(n, Vector3::new(0.0, 0.75, 0.25).normalize(), epsilon = 1e-12);
    }

    #[test]
    fn test_center_by_arc_length_normal_weights() {
        // Halfway lands exactly on the middle sample, at the end of the first
        // segment; the start normal carries all the weight.
        let samples = [
            (Point3::new(0.0, 0.0, 0.0), Vector3::x()),
            (Point3::new(1.0, 0.0, 0.0), Vector3::z()),
            (Point3::new(2.0, 0.0, 0.0), Vector3::y()),
        ];
        let (p, n) = center_by_arc_length(&samples).unwrap();
        assert_relative_eq!(p, Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(n, Vector3::x(), epsilon = 1e-12);

        // Two thirds of the way along the first segment.
        let samples = [
            (Point3::new(0.0, 0.0, 0.0), Vector3::x()),
            (Point3::new(3.0, 0.0, 0.0), Vector3::y()),
            (Point3::new(4.0, 0.0, 0.0), Vector3::z()),
        ];
        let (p, n) = center_by_arc_length(&samples).unwrap();
        assert_relative_eq!(p, Point3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(n, Vector3::new(2.0, 1.0, 0.0).normalize(), epsilon = 1e-12);
    }

    #[test]
    fn test_center_by_arc_length_degenerate() {
        assert!(center_by_arc_length(&[]).is_none());
        let p = (Point3::new(1.0, 1.0, 1.0), Vector3::z());
        assert!(center_by_arc_length(&[p]).is_none());
        assert!(center_by_arc_length(&[p, p]).is_none());
    }

    #[test]
    fn test_cross_center_new_vertex() {
        // Width 2: the diagonals meet inside the single quad.
        let mut mesh = grid_mesh(2, 2);
        let mut a = connect_vertex_path(&mut mesh, VertexId::new(0), VertexId::new(3)).unwrap();
        let b = connect_vertex_path(&mut mesh, VertexId::new(1), VertexId::new(2)).unwrap();

        let center = cross_center_vertex(&mesh, &mut a, &b).unwrap();
        assert_eq!(center, b[1]);
        assert_eq!(a, vec![VertexId::new(0), center, VertexId::new(3)]);
    }

    #[test]
    fn test_cross_center_shared_vertex() {
        // Width 3: both diagonals pass through the middle edge's midpoint.
        let mut mesh = grid_mesh(3, 2);
        let mut a = connect_vertex_path(&mut mesh, VertexId::new(0), VertexId::new(5)).unwrap();
        let b = connect_vertex_path(&mut mesh, VertexId::new(2), VertexId::new(3)).unwrap();
        let before = a.clone();

        let center = cross_center_vertex(&mesh, &mut a, &b).unwrap();
        assert_eq!(center, before[1]);
        assert_eq!(a, before);
    }

    #[test]
    fn test_cross_center_even_width() {
        let mut mesh = grid_mesh(4, 2);
        let mut a = connect_vertex_path(&mut mesh, VertexId::new(0), VertexId::new(7)).unwrap();
        let b = connect_vertex_path(&mut mesh, VertexId::new(3), VertexId::new(4)).unwrap();

        let center = cross_center_vertex(&mesh, &mut a, &b).unwrap();
        assert_relative_eq!(*mesh.position(center), Point3::new(1.5, 0.5, 0.0), epsilon = 1e-10);
        assert_eq!(a.len(), 5);
        assert_eq!(a[2], center);
    }

    #[test]
    fn test_cross_center_missing() {
        let mesh = grid_mesh(3, 3);
        let mut a = vec![VertexId::new(0), VertexId::new(1), VertexId::new(2)];
        let b = vec![VertexId::new(6), VertexId::new(7), VertexId::new(8)];
        assert!(cross_center_vertex(&mesh, &mut a, &b).is_none());
    }
}
