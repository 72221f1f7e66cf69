//! Bow tie lacing.
//!
//! Straight bars alternate with crossed pairs of rows. The bottom row is
//! chosen so that the top row always ends on a bar.

use log::trace;

use crate::error::Result;

use super::passes::{LaceContext, Strands};
use super::point::LaceResult;
use super::strategy::LacingStrategy;

/// Bow tie lacing: bars on alternate rows, crossed strands between them.
#[derive(Debug, Clone, Copy, Default)]
pub struct BowTieLacing;

impl LacingStrategy for BowTieLacing {
    fn label(&self) -> &'static str {
        "Bow Tie"
    }

    fn create_curve_points(&self, ctx: &mut LaceContext<'_>) -> Result<LaceResult> {
        let height = ctx.grid().height();
        let width = ctx.grid().width();
        let odd = height % 2 != 0;

        let bottom = ctx.center_points(0, odd)?;
        let mut strands = Strands::default();

        let (mut y, mut x1, mut x2, blocks) = if odd {
            (0, width - 1, 0, height / 2)
        } else {
            ctx.side_points(&mut strands, 0, width - 1, 0, false)?;
            (1, 0, width - 1, (height / 2).saturating_sub(1))
        };

        for _ in 0..blocks {
            trace!("bow tie block at rows {}..={}", y, y + 1);
            ctx.side_points(&mut strands, x1, x2, y, true)?;
            ctx.cross_points(&mut strands, x1, y, x2, y + 1)?;
            ctx.side_points(&mut strands, x2, x1, y + 1, false)?;

            std::mem::swap(&mut x1, &mut x2);
            y += 2;
        }

        let top = ctx.top_points()?;
        Ok(ctx.assemble(bottom, strands, top))
    }
}
