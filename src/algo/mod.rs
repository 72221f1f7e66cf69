//! Mesh processing algorithms.
//!
//! - **Geodesics**: Dijkstra shortest paths along mesh edges, optionally
//!   restricted to the boundary

pub mod geodesic;
