//! Shortest paths along mesh edges.
//!
//! This module computes edge-graph distances and paths on a mesh with
//! Dijkstra's algorithm. Paths can be restricted to boundary edges, which is
//! how the four sides of a lace patch are traced between its corners.
//!
//! # Example
//!
//! ```no_run
//! use lacework::prelude::*;
//! use lacework::algo::geodesic::{shortest_path, DijkstraOptions};
//!
//! let mesh: HalfEdgeMesh = lacework::io::load("patch.obj").unwrap();
//!
//! let options = DijkstraOptions::default().with_boundary_only(true);
//! if let Some(path) = shortest_path(&mesh, VertexId::new(0), VertexId::new(4), &options) {
//!     println!("{} edges", path.len() - 1);
//! }
//! ```

mod dijkstra;

pub use dijkstra::{dijkstra, shortest_path, DijkstraOptions};

use crate::mesh::VertexId;

/// Distances from one source vertex, with optional predecessors.
#[derive(Debug, Clone)]
pub struct GeodesicResult {
    /// Indexed by vertex; `f64::INFINITY` where unreachable.
    distances: Vec<f64>,

    /// Indexed by vertex; `None` at the source and at unreachable vertices.
    predecessors: Option<Vec<Option<VertexId>>>,
}

impl GeodesicResult {
    pub(crate) fn new(distances: Vec<f64>, predecessors: Option<Vec<Option<VertexId>>>) -> Self {
        Self {
            distances,
            predecessors,
        }
    }

    /// Distance to `v`, infinite if unreachable.
    #[inline]
    pub fn distance(&self, v: VertexId) -> f64 {
        self.distances[v.index()]
    }

    /// Number of vertices covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Whether the mesh had no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Whether `v` was reached from the source.
    #[inline]
    pub fn is_reachable(&self, v: VertexId) -> bool {
        self.distance(v).is_finite()
    }

    /// Walk the predecessors back from `target` to the source.
    ///
    /// Returns the path source-first, or `None` without predecessors or when
    /// `target` is unreachable.
    pub fn path_to(&self, target: VertexId) -> Option<Vec<VertexId>> {
        let predecessors = self.predecessors.as_ref()?;
        if !self.is_reachable(target) {
            return None;
        }

        let mut path = vec![target];
        while let Some(prev) = predecessors[path[path.len() - 1].index()] {
            if path.len() > self.distances.len() {
                return None;
            }
            path.push(prev);
        }

        path.reverse();
        Some(path)
    }
}
