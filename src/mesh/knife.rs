//! Vertex path cutting.
//!
//! [`connect_vertex_path`] slices the mesh from one vertex to another, the way
//! an edit-mode "connect vertex path" tool does. The cut follows the plane
//! through both endpoints that contains their averaged normal. Edges crossed
//! by that plane are split and every face the cut passes through is split in
//! two along it.
//!
//! The edit is performed on face lists, and the half-edge mesh is rebuilt
//! afterwards. Existing vertex IDs are preserved; new vertices are appended.

use std::collections::HashSet;

use log::trace;
use nalgebra::{Point3, Vector3};

use super::builder::{build_from_polygons, to_face_lists};
use super::halfedge::HalfEdgeMesh;
use super::index::VertexId;
use crate::error::{LaceError, Result};

/// Relative tolerance for classifying a point as lying on the cutting plane.
const PLANE_EPSILON: f64 = 1e-7;

/// A place the cut can advance to from the current vertex.
#[derive(Debug, Clone, Copy)]
enum Step {
    /// An existing vertex lying on the plane.
    Vertex { face: usize, vertex: usize },
    /// The plane crosses edge `(u, w)` at parameter `t` from `u`.
    Crossing {
        face: usize,
        u: usize,
        w: usize,
        t: f64,
    },
}

/// Mutable face-list view of the mesh used while cutting.
struct FaceSoup {
    positions: Vec<Point3<f64>>,
    normals: Vec<Vector3<f64>>,
    faces: Vec<Vec<usize>>,
}

impl FaceSoup {
    fn from_mesh(mesh: &HalfEdgeMesh) -> Self {
        let (positions, normals, faces) = to_face_lists(mesh);
        Self {
            positions,
            normals,
            faces,
        }
    }

    /// Split an edge at parameter `t`, inserting the new vertex into every
    /// face that uses the edge.
    fn split_edge(&mut self, u: usize, w: usize, t: f64) -> usize {
        let pu = self.positions[u];
        let pw = self.positions[w];
        let position = pu + (pw - pu) * t;

        let blended = self.normals[u] * (1.0 - t) + self.normals[w] * t;
        let normal = blended.try_normalize(f64::EPSILON).unwrap_or(self.normals[u]);

        let id = self.positions.len();
        self.positions.push(position);
        self.normals.push(normal);

        for face in &mut self.faces {
            let n = face.len();
            if let Some(k) = (0..n).find(|&k| {
                let (a, b) = (face[k], face[(k + 1) % n]);
                (a == u && b == w) || (a == w && b == u)
            }) {
                face.insert(k + 1, id);
            }
        }

        id
    }

    /// Split face `f` along the chord `from -> to`.
    ///
    /// The first half keeps index `f`; the second half is appended. Returns the
    /// index of the second half, or `None` if the two vertices already share
    /// an edge of the face.
    fn split_face(&mut self, f: usize, from: usize, to: usize) -> Option<usize> {
        let face = &self.faces[f];
        let n = face.len();
        let i = face.iter().position(|&v| v == from)?;
        let j = face.iter().position(|&v| v == to)?;

        if (i + 1) % n == j || (j + 1) % n == i {
            return None;
        }

        let first = cyclic_range(face, i, j);
        let second = cyclic_range(face, j, i);

        self.faces[f] = first;
        self.faces.push(second);
        Some(self.faces.len() - 1)
    }
}

/// Collect `face[i..=j]`, wrapping around the end of the loop.
fn cyclic_range(face: &[usize], i: usize, j: usize) -> Vec<usize> {
    let n = face.len();
    let len = (j + n - i) % n + 1;
    (0..len).map(|k| face[(i + k) % n]).collect()
}

/// Cut a path of edges from `a` to `b` across the faces between them.
///
/// Returns the ordered vertex path from `a` to `b`, including any vertices
/// created where the cut crossed existing edges. The mesh is replaced by the
/// cut mesh; IDs of pre-existing vertices are unchanged.
///
/// # Errors
/// Returns [`LaceError::ConnectPathFailed`] if the endpoints coincide, the
/// cutting plane is undefined, or the walk cannot reach `b`.
pub fn connect_vertex_path(
    mesh: &mut HalfEdgeMesh,
    a: VertexId,
    b: VertexId,
) -> Result<Vec<VertexId>> {
    let (ai, bi) = (a.index(), b.index());
    let fail = |reason: &str| LaceError::connect_failed(ai, bi, reason);

    if ai >= mesh.num_vertices() || bi >= mesh.num_vertices() {
        return Err(fail("vertex out of range"));
    }
    if ai == bi {
        return Err(fail("endpoints coincide"));
    }

    let mut soup = FaceSoup::from_mesh(mesh);

    let pa = soup.positions[ai];
    let pb = soup.positions[bi];
    let dir = pb - pa;
    let length = dir.norm();
    if length <= f64::EPSILON {
        return Err(fail("endpoints coincide"));
    }

    let up = soup.normals[ai] + soup.normals[bi];
    let plane_normal = dir
        .cross(&up)
        .try_normalize(f64::EPSILON)
        .ok_or_else(|| fail("cutting plane is undefined"))?;

    let eps = PLANE_EPSILON * length;
    let side = |p: &Point3<f64>| plane_normal.dot(&(p - pa));

    let mut path = vec![ai];
    let mut excluded: HashSet<usize> = HashSet::new();
    let mut current = ai;
    let max_steps = 2 * (soup.positions.len() + soup.faces.len()) + 8;

    for _ in 0..max_steps {
        let candidates: Vec<usize> = (0..soup.faces.len())
            .filter(|f| !excluded.contains(f) && soup.faces[*f].contains(&current))
            .collect();

        // Finish as soon as a face joins the current vertex to the target.
        if let Some(&f) = candidates.iter().find(|&&f| soup.faces[f].contains(&bi)) {
            if let Some(second) = soup.split_face(f, current, bi) {
                trace!("cut face {} -> ({}, {})", f, f, second);
            }
            path.push(bi);
            *mesh = build_from_polygons(&soup.positions, Some(&soup.normals), &soup.faces)
                .map_err(|e| fail(&e.to_string()))?;
            trace!("connected {:?} -> {:?} through {} vertices", a, b, path.len());
            return Ok(path.into_iter().map(VertexId::new).collect());
        }

        let here = soup.positions[current];
        let to_target = pb - here;
        let mut best: Option<(f64, Step)> = None;

        let mut consider = |point: Point3<f64>, step: Step| {
            let offset = point - here;
            let norm = offset.norm();
            if norm <= eps || offset.dot(&to_target) <= eps * norm {
                return;
            }
            let score = offset.dot(&to_target) / (norm * to_target.norm());
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, step));
            }
        };

        for &f in &candidates {
            let face = &soup.faces[f];
            let n = face.len();
            for k in 0..n {
                let (u, w) = (face[k], face[(k + 1) % n]);
                if u != current && side(&soup.positions[u]).abs() <= eps {
                    consider(soup.positions[u], Step::Vertex { face: f, vertex: u });
                }
                if u == current || w == current {
                    continue;
                }
                let (su, sw) = (side(&soup.positions[u]), side(&soup.positions[w]));
                if (su > eps && sw < -eps) || (su < -eps && sw > eps) {
                    let t = su / (su - sw);
                    let pu = soup.positions[u];
                    let point = pu + (soup.positions[w] - pu) * t;
                    consider(point, Step::Crossing { face: f, u, w, t });
                }
            }
        }

        let next = match best {
            Some((_, Step::Vertex { face, vertex })) => {
                match soup.split_face(face, current, vertex) {
                    Some(second) => {
                        excluded.insert(face);
                        excluded.insert(second);
                    }
                    None => {
                        // Moving along an existing edge; neither side may be reused.
                        for (f, loop_) in soup.faces.iter().enumerate() {
                            if loop_.contains(&current) && loop_.contains(&vertex) {
                                excluded.insert(f);
                            }
                        }
                    }
                }
                vertex
            }
            Some((_, Step::Crossing { face, u, w, t })) => {
                let vertex = soup.split_edge(u, w, t);
                if let Some(second) = soup.split_face(face, current, vertex) {
                    excluded.insert(second);
                }
                excluded.insert(face);
                vertex
            }
            None => return Err(fail("cut left the mesh before reaching the target")),
        };

        trace!("cut step {} -> {}", current, next);
        path.push(next);
        current = next;
    }

    Err(fail("step limit exceeded"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_quads;

    /// Flat grid of `nx` x `ny` vertices in the XY plane.
    fn grid(nx: usize, ny: usize) -> HalfEdgeMesh {
        let mut vertices = Vec::new();
        for y in 0..ny {
            for x in 0..nx {
                vertices.push(Point3::new(x as f64, y as f64, 0.0));
            }
        }
        let mut faces = Vec::new();
        for y in 0..ny - 1 {
            for x in 0..nx - 1 {
                let v = y * nx + x;
                faces.push([v, v + 1, v + nx + 1, v + nx]);
            }
        }
        build_from_quads(&vertices, &faces).unwrap()
    }

    fn vid(nx: usize, x: usize, y: usize) -> VertexId {
        VertexId::new(y * nx + x)
    }

    #[test]
    fn test_cyclic_range() {
        let face = [10, 11, 12, 13, 14];
        assert_eq!(cyclic_range(&face, 1, 3), vec![11, 12, 13]);
        assert_eq!(cyclic_range(&face, 3, 1), vec![13, 14, 10, 11]);
    }

    #[test]
    fn test_adjacent_vertices_need_no_cut() {
        let mut mesh = grid(2, 2);
        let faces_before = mesh.num_faces();
        let path = connect_vertex_path(&mut mesh, vid(2, 0, 0), vid(2, 1, 0)).unwrap();

        assert_eq!(path, vec![vid(2, 0, 0), vid(2, 1, 0)]);
        assert_eq!(mesh.num_faces(), faces_before);
    }

    #[test]
    fn test_single_quad_diagonal() {
        let mut mesh = grid(2, 2);
        let path = connect_vertex_path(&mut mesh, vid(2, 0, 0), vid(2, 1, 1)).unwrap();

        assert_eq!(path, vec![vid(2, 0, 0), vid(2, 1, 1)]);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_vertices(), 4);
        assert!(mesh.is_valid());
        assert!(mesh.are_adjacent(vid(2, 0, 0), vid(2, 1, 1)));
    }

    #[test]
    fn test_crossing_diagonals_meet_in_new_vertex() {
        let mut mesh = grid(2, 2);
        connect_vertex_path(&mut mesh, vid(2, 0, 0), vid(2, 1, 1)).unwrap();
        let path = connect_vertex_path(&mut mesh, vid(2, 1, 0), vid(2, 0, 1)).unwrap();

        assert_eq!(path.len(), 3);
        let center = path[1];
        assert_eq!(center.index(), 4);
        assert!((mesh.position(center) - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-10);
        assert!((mesh.normal(center) - Vector3::z()).norm() < 1e-10);
        assert_eq!(mesh.valence(center), 4);
        assert_eq!(mesh.num_faces(), 4);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_cut_through_odd_width_hits_edge_midpoint() {
        let mut mesh = grid(3, 2);
        let path = connect_vertex_path(&mut mesh, vid(3, 0, 0), vid(3, 2, 1)).unwrap();

        assert_eq!(path.len(), 3);
        let mid = path[1];
        assert!((mesh.position(mid) - Point3::new(1.0, 0.5, 0.0)).norm() < 1e-10);

        // The opposite diagonal passes through the same point and reuses it.
        let other = connect_vertex_path(&mut mesh, vid(3, 2, 0), vid(3, 0, 1)).unwrap();
        assert_eq!(other, vec![vid(3, 2, 0), mid, vid(3, 0, 1)]);
        assert_eq!(mesh.valence(mid), 6);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_cut_through_even_width() {
        let mut mesh = grid(4, 2);
        let path = connect_vertex_path(&mut mesh, vid(4, 0, 0), vid(4, 3, 1)).unwrap();

        assert_eq!(path.len(), 4);
        assert!((mesh.position(path[1]) - Point3::new(1.0, 1.0 / 3.0, 0.0)).norm() < 1e-10);
        assert!((mesh.position(path[2]) - Point3::new(2.0, 2.0 / 3.0, 0.0)).norm() < 1e-10);
        assert!(mesh.is_valid());

        let other = connect_vertex_path(&mut mesh, vid(4, 3, 0), vid(4, 0, 1)).unwrap();
        assert_eq!(other.len(), 5);
        assert!((mesh.position(other[2]) - Point3::new(1.5, 0.5, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_coincident_endpoints_fail() {
        let mut mesh = grid(2, 2);
        let result = connect_vertex_path(&mut mesh, vid(2, 0, 0), vid(2, 0, 0));
        assert!(matches!(result, Err(LaceError::ConnectPathFailed { .. })));
    }
}
