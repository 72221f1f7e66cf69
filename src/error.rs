//! Error types for lacework.
//!
//! This module defines all error types used throughout the library. Every
//! error is fatal to the running lace invocation; nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`LaceError`].
pub type Result<T> = std::result::Result<T, LaceError>;

/// Errors that can occur while building meshes or generating lace curves.
#[derive(Error, Debug)]
pub enum LaceError {
    /// The mesh is not a single quad-bounded patch with four corners.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The corner paths or interior cells could not be arranged into a lattice.
    #[error("lattice could not be resolved: {0}")]
    UnresolvableLattice(String),

    /// A row polyline had no usable length.
    #[error("center calculation failed for row {row}")]
    CenterCalculationFailed {
        /// Lattice row being processed.
        row: usize,
    },

    /// No crossing vertex was found between two cut diagonals.
    #[error("no crossing vertex between diagonals starting at {from:?}")]
    CenterNotFound {
        /// Lattice cell the diagonals start from.
        from: (usize, usize),
    },

    /// A zero-length vector was encountered where a direction is required.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// The knot fragment does not have the requested splines.
    #[error("invalid knot asset: {0}")]
    KnotAssetInvalid(String),

    /// A vertex path could not be cut through the mesh.
    #[error("failed to connect vertex {from} to vertex {to}: {reason}")]
    ConnectPathFailed {
        /// Start vertex index.
        from: usize,
        /// End vertex index.
        to: usize,
        /// What went wrong.
        reason: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three vertices or repeats a vertex.
    #[error("face {face} is degenerate")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// An edge has more than two incident faces, or two faces share it with
    /// the same orientation.
    #[error("edge ({v0}, {v1}) is non-manifold")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

impl LaceError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        LaceError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    pub(crate) fn connect_failed(from: usize, to: usize, reason: impl Into<String>) -> Self {
        LaceError::ConnectPathFailed {
            from,
            to,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_param_message() {
        let err = LaceError::invalid_param("bevel_depth", -1.0, "must be non-negative");
        assert_eq!(
            err.to_string(),
            "invalid parameter: bevel_depth = -1 (must be non-negative)"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LaceError = io.into();
        assert!(matches!(err, LaceError::Io(_)));
    }
}
