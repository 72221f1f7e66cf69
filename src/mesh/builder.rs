//! Mesh construction utilities.
//!
//! This module provides functions for building half-edge meshes from
//! face-vertex lists as commonly found in mesh file formats. Faces are
//! arbitrary polygons given counter-clockwise.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use super::halfedge::{Face, HalfEdge, HalfEdgeMesh};
use super::index::{FaceId, HalfEdgeId, VertexId};
use crate::error::{LaceError, Result};

/// Build a half-edge mesh from vertices and polygon faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `normals` - Optional per-vertex normals; computed from the faces when `None`
/// * `faces` - List of polygon faces, each as a counter-clockwise index loop
///
/// # Returns
/// A half-edge mesh, or an error if the input is invalid.
///
/// # Example
/// ```
/// use lacework::mesh::{build_from_polygons, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3]];
///
/// let mesh: HalfEdgeMesh = build_from_polygons(&vertices, None, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 4);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_polygons(
    vertices: &[Point3<f64>],
    normals: Option<&[Vector3<f64>]>,
    faces: &[Vec<usize>],
) -> Result<HalfEdgeMesh> {
    if faces.is_empty() {
        return Err(LaceError::EmptyMesh);
    }

    if let Some(normals) = normals {
        if normals.len() != vertices.len() {
            return Err(LaceError::invalid_param(
                "normals",
                normals.len(),
                "must have one normal per vertex",
            ));
        }
    }

    for (fi, face) in faces.iter().enumerate() {
        if face.len() < 3 {
            return Err(LaceError::DegenerateFace { face: fi });
        }
        for &vi in face {
            if vi >= vertices.len() {
                return Err(LaceError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        for (i, &vi) in face.iter().enumerate() {
            if face[i + 1..].contains(&vi) {
                return Err(LaceError::DegenerateFace { face: fi });
            }
        }
    }

    let num_corners: usize = faces.iter().map(Vec::len).sum();
    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), num_corners * 2, faces.len());

    let vertex_ids: Vec<VertexId> = vertices
        .iter()
        .map(|&pos| mesh.add_vertex(pos, Vector3::zeros()))
        .collect();

    // Map from directed edge (v0, v1) to half-edge ID
    let mut edge_map: HashMap<(usize, usize), HalfEdgeId> = HashMap::with_capacity(num_corners);

    // First pass: create all half-edges and faces
    for face in faces {
        let n = face.len();
        let base = mesh.num_halfedges();
        let face_id = FaceId::new(mesh.num_faces());

        mesh.halfedges.extend((0..n).map(|_| HalfEdge::new()));
        mesh.faces.push(Face::new(HalfEdgeId::new(base)));

        for (i, &v) in face.iter().enumerate() {
            let id = HalfEdgeId::new(base + i);
            {
                let he = mesh.halfedge_mut(id);
                he.origin = vertex_ids[v];
                he.next = HalfEdgeId::new(base + (i + 1) % n);
                he.prev = HalfEdgeId::new(base + (i + n - 1) % n);
                he.face = face_id;
            }
            // Will be overwritten for shared vertices
            mesh.vertex_mut(vertex_ids[v]).halfedge = id;

            let w = face[(i + 1) % n];
            if edge_map.insert((v, w), id).is_some() {
                return Err(LaceError::NonManifoldEdge { v0: v, v1: w });
            }
        }
    }

    // Second pass: link twins
    let mut directed: Vec<((usize, usize), HalfEdgeId)> =
        edge_map.iter().map(|(&k, &he)| (k, he)).collect();
    directed.sort_by_key(|&(_, he)| he);

    for ((v0, v1), he) in directed {
        if let Some(&twin) = edge_map.get(&(v1, v0)) {
            mesh.halfedge_mut(he).twin = twin;
        } else {
            // Boundary edge - create boundary half-edge
            let boundary_he = HalfEdgeId::new(mesh.num_halfedges());
            mesh.halfedges.push(HalfEdge::new());

            mesh.halfedge_mut(he).twin = boundary_he;
            let bhe = mesh.halfedge_mut(boundary_he);
            bhe.origin = vertex_ids[v1];
            bhe.twin = he;
        }
    }

    // Third pass: link boundary half-edges into loops
    link_boundary_loops(&mut mesh);

    // Fourth pass: ensure boundary vertices point to boundary half-edges
    fix_boundary_vertex_halfedges(&mut mesh);

    match normals {
        Some(normals) => {
            for (vertex, n) in mesh.vertices.iter_mut().zip(normals) {
                vertex.normal = n.try_normalize(f64::EPSILON).unwrap_or(*n);
            }
        }
        None => mesh.recompute_vertex_normals(),
    }

    Ok(mesh)
}

/// Build a half-edge mesh from vertices and quad faces.
///
/// Vertex normals are computed from the faces.
pub fn build_from_quads(vertices: &[Point3<f64>], faces: &[[usize; 4]]) -> Result<HalfEdgeMesh> {
    let polygons: Vec<Vec<usize>> = faces.iter().map(|f| f.to_vec()).collect();
    build_from_polygons(vertices, None, &polygons)
}

/// Link boundary half-edges into proper loops.
fn link_boundary_loops(mesh: &mut HalfEdgeMesh) {
    let boundary_hes: Vec<HalfEdgeId> = mesh
        .halfedge_ids()
        .filter(|&he| mesh.is_boundary_halfedge(he))
        .collect();

    // Group by origin vertex for quick lookup
    let mut outgoing: HashMap<usize, HalfEdgeId> = HashMap::new();
    for &he in &boundary_hes {
        outgoing.insert(mesh.origin(he).index(), he);
    }

    for &he in &boundary_hes {
        // The next boundary half-edge starts where this one ends
        let dest = mesh.dest(he).index();
        if let Some(&next_he) = outgoing.get(&dest) {
            mesh.halfedge_mut(he).next = next_he;
            mesh.halfedge_mut(next_he).prev = he;
        }
    }
}

/// Ensure boundary vertices point to a boundary half-edge.
fn fix_boundary_vertex_halfedges(mesh: &mut HalfEdgeMesh) {
    for vid in mesh.vertex_ids().collect::<Vec<_>>() {
        let start_he = mesh.vertex(vid).halfedge;
        if !start_he.is_valid() {
            continue;
        }

        // Same circulation as VertexHalfEdgeIter: twin -> next
        let mut he = start_he;
        loop {
            if mesh.is_boundary_halfedge(he) {
                mesh.vertex_mut(vid).halfedge = he;
                break;
            }
            he = mesh.next(mesh.twin(he));
            if he == start_he || !he.is_valid() {
                break;
            }
        }
    }
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns `(positions, normals, faces)`, with faces as index loops in the
/// same winding they were built with.
pub fn to_face_lists(
    mesh: &HalfEdgeMesh,
) -> (Vec<Point3<f64>>, Vec<Vector3<f64>>, Vec<Vec<usize>>) {
    let positions = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();
    let normals = mesh.vertex_ids().map(|v| *mesh.normal(v)).collect();
    let faces = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(VertexId::index).collect())
        .collect();

    (positions, normals, faces)
}
