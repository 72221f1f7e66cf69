//! Dijkstra's algorithm on the mesh edge graph.
//!
//! Computes shortest path distances along mesh edges. With
//! [`DijkstraOptions::boundary_only`] set, only boundary edges are relaxed, so
//! the search walks around the rim of an open patch.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::mesh::{HalfEdgeMesh, VertexId};

use super::GeodesicResult;

/// Options for Dijkstra's algorithm.
#[derive(Debug, Clone, Default)]
pub struct DijkstraOptions {
    /// Record each vertex's predecessor so paths can be rebuilt.
    pub store_predecessors: bool,

    /// Only traverse edges that lie on the mesh boundary.
    pub boundary_only: bool,

    /// Stop as soon as this vertex is settled.
    pub target: Option<VertexId>,
}

impl DijkstraOptions {
    /// Record predecessors for [`GeodesicResult::path_to`].
    pub fn with_predecessors(mut self, store: bool) -> Self {
        self.store_predecessors = store;
        self
    }

    /// Restrict the search to boundary edges.
    pub fn with_boundary_only(mut self, boundary_only: bool) -> Self {
        self.boundary_only = boundary_only;
        self
    }

    /// Stop once `target` is settled.
    pub fn with_target(mut self, target: VertexId) -> Self {
        self.target = Some(target);
        self
    }
}

/// Queue entry, ordered so that `BinaryHeap` pops the nearest vertex first.
/// Ties go to the lower vertex id, which keeps paths deterministic.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    distance: f64,
    vertex: VertexId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Edge-graph distances from `source` to every vertex.
///
/// Unreachable vertices, and every vertex when `source` is out of range, get
/// an infinite distance.
pub fn dijkstra(mesh: &HalfEdgeMesh, source: VertexId, options: &DijkstraOptions) -> GeodesicResult {
    let n = mesh.num_vertices();
    let mut distances = vec![f64::INFINITY; n];
    let mut predecessors = options.store_predecessors.then(|| vec![None; n]);

    if source.index() >= n {
        return GeodesicResult::new(distances, None);
    }

    let mut heap = BinaryHeap::new();
    distances[source.index()] = 0.0;
    heap.push(Frontier {
        distance: 0.0,
        vertex: source,
    });

    while let Some(Frontier { distance, vertex: u }) = heap.pop() {
        if distance > distances[u.index()] {
            continue;
        }
        if options.target == Some(u) {
            break;
        }

        for he in mesh.vertex_halfedges(u) {
            if options.boundary_only && !mesh.is_boundary_edge(he) {
                continue;
            }

            let v = mesh.dest(he);
            let through_u = distance + mesh.edge_length(he);
            if through_u >= distances[v.index()] {
                continue;
            }

            distances[v.index()] = through_u;
            if let Some(preds) = predecessors.as_mut() {
                preds[v.index()] = Some(u);
            }
            heap.push(Frontier {
                distance: through_u,
                vertex: v,
            });
        }
    }

    GeodesicResult::new(distances, predecessors)
}

/// Find the shortest edge path between two vertices.
///
/// Predecessors and early termination are enabled on top of `options`.
/// Returns `None` if `to` cannot be reached.
pub fn shortest_path(
    mesh: &HalfEdgeMesh,
    from: VertexId,
    to: VertexId,
    options: &DijkstraOptions,
) -> Option<Vec<VertexId>> {
    if to.index() >= mesh.num_vertices() {
        return None;
    }

    let options = options.clone().with_predecessors(true).with_target(to);
    dijkstra(mesh, from, &options).path_to(to)
}
