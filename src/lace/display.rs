//! Display (criss-cross) lacing.
//!
//! ```text
//!     O-------+-------+-------O
//!     |\      |       |      /|
//!     | \_____|___X___|_____/ |   cross between every pair of rows
//!     |       |       |       |
//!     O-------+-------+-------O
//!     |\      |       |      /|
//!     | \_____|___X___|_____/ |
//!     O-------O-------O-------O
//!              \_______\______    bottom bar
//! ```

use crate::error::Result;

use super::passes::{LaceContext, Strands};
use super::point::LaceResult;
use super::strategy::LacingStrategy;

/// Criss-cross lacing: a bottom bar, then the strands swap sides on every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayLacing;

impl LacingStrategy for DisplayLacing {
    fn label(&self) -> &'static str {
        "Display"
    }

    fn create_curve_points(&self, ctx: &mut LaceContext<'_>) -> Result<LaceResult> {
        let bottom = ctx.center_points(0, false)?;

        let mut strands = Strands::default();
        for y in 1..ctx.grid().height() {
            let from_x = ctx.alternating_column(y - 1);
            let to_x = ctx.alternating_column(y);

            ctx.side_points(&mut strands, from_x, to_x, y - 1, true)?;
            ctx.cross_points(&mut strands, from_x, y - 1, to_x, y)?;
        }

        let top = ctx.top_points()?;
        Ok(ctx.assemble(bottom, strands, top))
    }
}
