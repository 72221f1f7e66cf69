//! Lacing strategies.
//!
//! A strategy walks the lattice bottom to top, calling the shared passes in
//! [`LaceContext`], and assembles the final control point sequence.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::bow_tie::BowTieLacing;
use super::display::DisplayLacing;
use super::passes::LaceContext;
use super::point::LaceResult;

/// A way of weaving the lace through the eyelets.
pub trait LacingStrategy {
    /// Human-readable name.
    fn label(&self) -> &'static str;

    /// Generate the lace control points over the context's lattice.
    fn create_curve_points(&self, ctx: &mut LaceContext<'_>) -> Result<LaceResult>;
}

/// The available lacing methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LacingMethod {
    /// Criss-cross lacing: the strands cross between every pair of rows.
    #[default]
    Display,
    /// Straight bars alternating with crossed pairs.
    BowTie,
}

impl LacingMethod {
    /// All methods, in menu order.
    pub const ALL: [LacingMethod; 2] = [LacingMethod::Display, LacingMethod::BowTie];
}

impl LacingStrategy for LacingMethod {
    fn label(&self) -> &'static str {
        match self {
            LacingMethod::Display => DisplayLacing.label(),
            LacingMethod::BowTie => BowTieLacing.label(),
        }
    }

    fn create_curve_points(&self, ctx: &mut LaceContext<'_>) -> Result<LaceResult> {
        match self {
            LacingMethod::Display => DisplayLacing.create_curve_points(ctx),
            LacingMethod::BowTie => BowTieLacing.create_curve_points(ctx),
        }
    }
}

impl fmt::Display for LacingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
