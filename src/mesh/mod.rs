//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation used as the host
//! surface for lace generation.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], which represents a polygon mesh with
//! per-vertex normals using a half-edge (doubly-connected edge list) data
//! structure. This representation provides cheap adjacency queries: vertex
//! neighbours, linked faces and boundary tests.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! # Construction
//!
//! Meshes are typically constructed from file I/O or from face-vertex lists:
//!
//! ```
//! use lacework::mesh::{HalfEdgeMesh, build_from_quads};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2, 3]];
//!
//! let mesh: HalfEdgeMesh = build_from_quads(&vertices, &faces).unwrap();
//! ```
//!
//! # Editing
//!
//! [`connect_vertex_path`] cuts a vertex-to-vertex path through the faces of a
//! mesh, splitting the edges and faces it crosses.

mod builder;
mod halfedge;
mod index;
mod knife;

pub use builder::{build_from_polygons, build_from_quads, to_face_lists};
pub use halfedge::{Face, HalfEdge, HalfEdgeMesh, Vertex};
pub use index::{FaceId, HalfEdgeId, VertexId};
pub use knife::connect_vertex_path;
