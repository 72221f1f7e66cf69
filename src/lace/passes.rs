//! Point passes shared by the lacing strategies.
//!
//! A lace is assembled from four kinds of pass over the lattice:
//!
//! ```text
//!     O-------O--KKK--O-------O   top: SIDE points, top centre, optional knot
//!     |       |       |       |
//!     O-------+-------+-------O   side: the lace dips through both columns
//!     |       O       O       |
//!     |       |\  X   |\      |   cross: MIDDLE points along two diagonals
//!     |       O_\__\__O_\_____|
//!     O-------O-------O-------O
//!              \       \
//!               \_______\____     centre: MIDDLE points along a row
//! ```

use log::debug;
use nalgebra::{Point3, Vector3};

use crate::error::{LaceError, Result};
use crate::mesh::{connect_vertex_path, HalfEdgeMesh, VertexId};

use super::geometry::{center_by_arc_length, center_handle, cross_center_vertex, side_handles};
use super::grid::IndexGrid;
use super::knot::{splice_knot, KnotTarget};
use super::point::{ControlPoint, LaceResult, PointKind};
use super::settings::LaceSettings;

/// The two lace strands, each growing from the bottom of the patch upwards.
#[derive(Debug, Clone, Default)]
pub struct Strands {
    /// Points of the strand starting on the left of the bottom row.
    pub left: Vec<ControlPoint>,
    /// Points of the other strand.
    pub right: Vec<ControlPoint>,
}

/// Points of the terminal (top) row.
#[derive(Debug, Clone)]
pub struct TopPoints {
    /// Appended to the left strand.
    pub left: Vec<ControlPoint>,
    /// Prepended to the right strand.
    pub right: Vec<ControlPoint>,
    /// False once a knot is spliced in.
    pub cyclic: bool,
}

/// Everything a lacing strategy works with.
///
/// `mesh` is the working copy; cross passes cut diagonals into it.
pub struct LaceContext<'a> {
    mesh: &'a mut HalfEdgeMesh,
    grid: &'a IndexGrid,
    settings: &'a LaceSettings,
}

impl<'a> LaceContext<'a> {
    /// Work on `mesh` over `grid`.
    pub fn new(mesh: &'a mut HalfEdgeMesh, grid: &'a IndexGrid, settings: &'a LaceSettings) -> Self {
        Self {
            mesh,
            grid,
            settings,
        }
    }

    /// The lattice.
    #[inline]
    pub fn grid(&self) -> &IndexGrid {
        self.grid
    }

    /// The settings in effect.
    #[inline]
    pub fn settings(&self) -> &LaceSettings {
        self.settings
    }

    #[inline]
    fn position(&self, v: VertexId) -> Point3<f64> {
        *self.mesh.position(v)
    }

    #[inline]
    fn normal(&self, v: VertexId) -> Vector3<f64> {
        *self.mesh.normal(v)
    }

    #[inline]
    fn cell(&self, x: usize, y: usize) -> VertexId {
        self.grid.get(x, y)
    }

    /// Column the lace sits at in row `y`: left on even rows, right on odd.
    pub fn alternating_column(&self, y: usize) -> usize {
        if y % 2 == 0 {
            0
        } else {
            self.grid.width() - 1
        }
    }

    /// MIDDLE points along row `y`, between the two side columns.
    ///
    /// In simple mode a single point is placed halfway along the row. The
    /// result is in reverse iteration order.
    pub fn center_points(&self, y: usize, reversed: bool) -> Result<Vec<ControlPoint>> {
        let width = self.grid.width();
        if width < 3 {
            return Ok(Vec::new());
        }

        let settings = self.settings;
        let columns: Vec<usize> = if settings.simple_curve {
            vec![1]
        } else if reversed {
            (1..width - 1).rev().collect()
        } else {
            (1..width - 1).collect()
        };

        let mut points = Vec::with_capacity(columns.len());
        for x in columns {
            let current = self.cell(x, y);
            let mut prev = self.position(self.cell(x - 1, y));
            let mut next = self.position(self.cell(x + 1, y));
            let mut position = self.position(current);
            let mut normal = self.normal(current);

            if settings.simple_curve {
                let samples: Vec<(Point3<f64>, Vector3<f64>)> = self
                    .grid
                    .row(y)
                    .map(|v| (self.position(v), self.normal(v)))
                    .collect();
                (position, normal) = center_by_arc_length(&samples)
                    .ok_or(LaceError::CenterCalculationFailed { row: y })?;
                next = self.position(self.cell(width - 1, y));
            }

            if settings.center_offset {
                position += normal * settings.side_handle_length;
            }

            if reversed {
                std::mem::swap(&mut prev, &mut next);
            }

            let ratio = settings.center_handle_length_ratio;
            let handle_left = position + center_handle(&position, &next, &prev, ratio)?;
            let handle_right = position + center_handle(&position, &prev, &next, ratio)?;

            points.insert(
                0,
                ControlPoint::new(PointKind::Middle, position, handle_left, handle_right),
            );
        }

        Ok(points)
    }

    /// SIDE points at `(left_x, y)` for the left strand and `(right_x, y)` for
    /// the right strand.
    ///
    /// Set `reversed` where the lace comes out of the eyelet towards the
    /// front, which flips the handles.
    pub fn side_points(
        &self,
        strands: &mut Strands,
        left_x: usize,
        right_x: usize,
        y: usize,
        reversed: bool,
    ) -> Result<()> {
        let length = self.settings.side_handle_length;

        for (strand, x, sign) in [
            (&mut strands.left, left_x, 1.0),
            (&mut strands.right, right_x, -1.0),
        ] {
            let v = self.cell(x, y);
            let position = self.position(v);
            let (handle_left, handle_right) = side_handles(&position, &self.normal(v), length, sign)?;

            let point = ControlPoint::new(PointKind::Side, position, handle_left, handle_right);
            strand.push(if reversed {
                point.swapped_handles()
            } else {
                point
            });
        }

        Ok(())
    }

    /// MIDDLE points along the two diagonals of the band between rows
    /// `from_y` and `to_y`.
    ///
    /// Diagonal A runs `(from_x, from_y) -> (to_x, to_y)` and feeds the left
    /// strand; diagonal B runs `(to_x, from_y) -> (from_x, to_y)` and feeds the
    /// right strand. Both are cut into the working mesh. The strands are
    /// pushed off the surface in opposite directions by the bevel depth so
    /// they do not intersect where they cross.
    pub fn cross_points(
        &mut self,
        strands: &mut Strands,
        from_x: usize,
        from_y: usize,
        to_x: usize,
        to_y: usize,
    ) -> Result<()> {
        let (a_from, a_to) = (self.cell(from_x, from_y), self.cell(to_x, to_y));
        let (b_from, b_to) = (self.cell(to_x, from_y), self.cell(from_x, to_y));

        let mut diagonal_a = connect_vertex_path(self.mesh, a_from, a_to)?;
        let mut diagonal_b = connect_vertex_path(self.mesh, b_from, b_to)?;

        let center = cross_center_vertex(self.mesh, &mut diagonal_a, &diagonal_b)
            .ok_or(LaceError::CenterNotFound {
                from: (from_x, from_y),
            })?;

        let settings = self.settings;
        if settings.simple_curve {
            for line in [&mut diagonal_a, &mut diagonal_b] {
                let (first, last) = (line[0], line[line.len() - 1]);
                *line = vec![first, center, last];
            }
        }

        let front_or_back = if to_y % 2 == 0 { 1.0 } else { -1.0 };
        let ratio = settings.center_handle_length_ratio;

        for (strand, line, sign) in [
            (&mut strands.left, &diagonal_a, 1.0),
            (&mut strands.right, &diagonal_b, -1.0),
        ] {
            for window in line.windows(3) {
                let prev = self.position(window[0]);
                let base = self.position(window[1]);
                let next = self.position(window[2]);

                let position =
                    base + self.normal(window[1]) * (settings.bevel_depth * sign * front_or_back);
                let handle_left = position + center_handle(&base, &prev, &next, ratio)?;
                let handle_right = position + center_handle(&base, &next, &prev, ratio)?;

                let point = ControlPoint::new(PointKind::Middle, position, handle_left, handle_right);
                strand.push(if sign < 0.0 {
                    point.swapped_handles()
                } else {
                    point
                });
            }
        }

        debug!(
            "cross ({}, {}) -> ({}, {}): {} + {} points",
            from_x,
            from_y,
            to_x,
            to_y,
            diagonal_a.len() - 2,
            diagonal_b.len() - 2
        );
        Ok(())
    }

    /// SIDE and centre points of the top row, with the knot spliced in when
    /// one is configured.
    pub fn top_points(&self) -> Result<TopPoints> {
        let height = self.grid.height();
        let y = height - 1;
        let x1 = self.alternating_column(y);
        let x2 = self.alternating_column(height);

        let mut top = Strands::default();
        self.side_points(&mut top, x1, x2, y, true)?;

        let reversed = height % 2 != 0;
        let center = self.center_points(y, reversed)?;

        let Some(knot) = &self.settings.knot else {
            let mut left = top.left;
            left.extend(center);
            return Ok(TopPoints {
                left,
                right: top.right,
                cyclic: true,
            });
        };

        // Midpoint of the centre run, or of the two SIDE points without one.
        let anchor = match (center.first(), center.last()) {
            (Some(first), Some(last)) => nalgebra::center(first.position(), last.position()),
            _ => nalgebra::center(top.left[0].position(), top.right[0].position()),
        };

        let target = KnotTarget {
            edge_from: self.position(self.cell(x1, y)),
            edge_to: self.position(self.cell(x2, y)),
            center: anchor,
            reversed,
        };
        let (knot_left, knot_right) = splice_knot(knot, self.settings.bevel_depth, &target)?;

        let mut left = top.left;
        left.extend(knot_left);
        let mut right = knot_right;
        right.extend(top.right);

        Ok(TopPoints {
            left,
            right,
            cyclic: false,
        })
    }

    /// Join the passes into one curve:
    /// `top.right + rev(right) + rev(bottom) + left + top.left`.
    pub fn assemble(&self, bottom: Vec<ControlPoint>, strands: Strands, top: TopPoints) -> LaceResult {
        let mut points = Vec::with_capacity(
            bottom.len() + strands.left.len() + strands.right.len() + top.left.len() + top.right.len(),
        );

        points.extend(top.right);
        points.extend(strands.right.into_iter().rev());
        points.extend(bottom.into_iter().rev());
        points.extend(strands.left);
        points.extend(top.left);

        debug!("assembled {} points (cyclic: {})", points.len(), top.cyclic);
        LaceResult {
            points,
            cyclic: top.cyclic,
        }
    }
}
