//! # Lacework
//!
//! Shoelace curve generation over quad eyelet meshes.
//!
//! Lacework takes a four-cornered, quad-dominant mesh patch (the eyelet field
//! of a shoe, a corset panel) and weaves a bezier lace back and forth between
//! its first and last columns. The result is a list of control points with
//! free handles, ready to be turned into a beveled curve.
//!
//! ## Features
//!
//! - **Half-edge data structure**: polygon meshes with per-vertex normals and
//!   a knife tool that cuts vertex-to-vertex paths across faces
//! - **Lattice extraction**: the patch's vertices as a `width x height` grid,
//!   starting from any of its four sides
//! - **Two weaves**: Display (criss-cross) and Bow Tie
//! - **Knots**: splice a two-spline knot asset into the top row
//! - **File formats**: OBJ and PLY meshes, JSON knots and curves
//!
//! ## Quick Start
//!
//! ```no_run
//! use lacework::prelude::*;
//!
//! let mesh = lacework::io::load("eyelets.obj").unwrap();
//!
//! let settings = LaceSettings::default()
//!     .with_method(LacingMethod::BowTie)
//!     .with_bevel_depth(0.005);
//! let curves = create_lace(&mesh, &settings).unwrap();
//!
//! for point in &curves.lace.points {
//!     println!("{:?} at {:?}", point.kind(), point.position());
//! }
//!
//! lacework::io::curve::save_curves(&curves, "lace.json").unwrap();
//! ```
//!
//! ## Building Patches Programmatically
//!
//! ```
//! use lacework::prelude::*;
//! use nalgebra::Point3;
//!
//! // Two rows of three eyelets.
//! let vertices: Vec<Point3<f64>> = (0..6)
//!     .map(|i| Point3::new((i % 3) as f64, (i / 3) as f64, 0.0))
//!     .collect();
//! let faces = vec![[0, 1, 4, 3], [1, 2, 5, 4]];
//!
//! let mesh = build_from_quads(&vertices, &faces).unwrap();
//! let corners = find_corner_vertices(&mesh).unwrap();
//! let grid = IndexGrid::build(&mesh, &corners, 0).unwrap();
//! assert_eq!((grid.width(), grid.height()), (3, 2));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod lace;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use lacework::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{LaceError, Result};
    pub use crate::lace::{
        create_lace, find_corner_vertices, ControlPoint, IndexGrid, KnotFragment, KnotSettings,
        LaceCurves, LaceResult, LaceSettings, LacingMethod, LacingStrategy, PointKind,
    };
    pub use crate::mesh::{
        build_from_polygons, build_from_quads, connect_vertex_path, FaceId, HalfEdgeId,
        HalfEdgeMesh, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
