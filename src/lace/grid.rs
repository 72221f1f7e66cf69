//! Corner detection and lattice extraction.
//!
//! A lace patch is a quad-dominant mesh whose boundary has exactly four
//! corners. [`IndexGrid::build`] traces the four boundary sides between the
//! corners and then fills the interior cell by cell, producing a rectangular
//! `width x height` array of vertex IDs.
//!
//! ```text
//!   (0,h-1) ------------- (w-1,h-1)
//!      |                      |
//!      ^ reversed last side   |
//!      |                      |
//!   (0,0) --- first side --> (w-1,0)
//! ```

use std::collections::HashSet;

use log::debug;

use crate::algo::geodesic::{shortest_path, DijkstraOptions};
use crate::error::{LaceError, Result};
use crate::mesh::{HalfEdgeMesh, VertexId};

/// Find the four corner vertices of a lace patch.
///
/// A corner is a vertex touched by exactly one face. The corners are returned
/// in ascending vertex order.
///
/// # Errors
///
/// Returns [`LaceError::InvalidGeometry`] if any vertex is touched by zero,
/// three, or more than four faces, or if the patch does not have exactly four
/// corners.
pub fn find_corner_vertices(mesh: &HalfEdgeMesh) -> Result<[VertexId; 4]> {
    let mut corners = Vec::new();

    for v in mesh.vertex_ids() {
        match mesh.face_valence(v) {
            1 => corners.push(v),
            2 | 4 => {}
            n => {
                return Err(LaceError::InvalidGeometry(format!(
                    "vertex {} is linked to {} faces",
                    v.index(),
                    n
                )))
            }
        }
    }

    let found = corners.len();
    let corners: [VertexId; 4] = corners.try_into().map_err(|_| {
        LaceError::InvalidGeometry(format!("expected 4 corner vertices, found {}", found))
    })?;

    debug!("corner vertices: {:?}", corners);
    Ok(corners)
}

/// A rectangular lattice of vertex IDs.
///
/// Cells are addressed as `(x, y)` with `x` in `0..width` and `y` in
/// `0..height`. Every cell holds a distinct vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexGrid {
    width: usize,
    height: usize,
    /// Column-major: cell `(x, y)` is at `x * height + y`.
    cells: Vec<VertexId>,
}

impl IndexGrid {
    /// Extract the lattice spanned by `corners`.
    ///
    /// `offset` selects which boundary side becomes row 0; only `offset % 4`
    /// matters.
    ///
    /// # Errors
    ///
    /// Returns [`LaceError::UnresolvableLattice`] if the corners are not
    /// joined by four boundary sides forming a cycle, or if an interior cell
    /// has no unique candidate vertex.
    pub fn build(mesh: &HalfEdgeMesh, corners: &[VertexId; 4], offset: usize) -> Result<Self> {
        let sides = Self::trace_sides(mesh, corners)?;
        let mut walks = Self::order_sides(sides)?;
        walks.rotate_left(offset % 4);

        let first = &walks[0];
        let last = &walks[3];
        let width = first.len();
        let height = last.len();

        let mut cells = vec![VertexId::invalid(); width * height];
        let mut visited: HashSet<VertexId> = HashSet::with_capacity(width * height);

        for (x, &v) in first.iter().enumerate() {
            cells[x * height] = v;
            visited.insert(v);
        }
        for (y, &v) in last.iter().rev().enumerate() {
            cells[y] = v;
            visited.insert(v);
        }

        for x in 1..width {
            for y in 1..height {
                let left = cells[(x - 1) * height + y];
                let below = cells[x * height + y - 1];
                let v = Self::fill_cell(mesh, &visited, left, below).ok_or_else(|| {
                    LaceError::UnresolvableLattice(format!("cell ({}, {}) has no unique vertex", x, y))
                })?;
                visited.insert(v);
                cells[x * height + y] = v;
            }
        }

        debug!("lattice {}x{} (offset {})", width, height, offset % 4);

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Shortest boundary paths between all corner pairs, minus the two
    /// longest (the diagonals).
    fn trace_sides(mesh: &HalfEdgeMesh, corners: &[VertexId; 4]) -> Result<Vec<Vec<VertexId>>> {
        let options = DijkstraOptions::default().with_boundary_only(true);
        let mut paths = Vec::with_capacity(6);

        for i in 0..4 {
            for j in i + 1..4 {
                let path = shortest_path(mesh, corners[i], corners[j], &options).ok_or_else(|| {
                    LaceError::UnresolvableLattice(format!(
                        "no boundary path between corners {} and {}",
                        corners[i].index(),
                        corners[j].index()
                    ))
                })?;
                paths.push(path);
            }
        }

        // Stable: among equal lengths the earlier pair wins.
        paths.sort_by_key(Vec::len);
        paths.truncate(4);
        Ok(paths)
    }

    /// Chain the four sides into a cycle starting at the lowest side.
    fn order_sides(mut sides: Vec<Vec<VertexId>>) -> Result<Vec<Vec<VertexId>>> {
        let endpoints = |side: &Vec<VertexId>| (side[0], side[side.len() - 1]);
        sides.sort_by_key(|side| endpoints(side));

        let mut incidence: Vec<VertexId> = sides
            .iter()
            .flat_map(|side| {
                let (a, b) = endpoints(side);
                [a, b]
            })
            .collect();
        incidence.sort();
        let cycle_like = incidence.chunks(2).all(|pair| pair[0] == pair[1])
            && incidence.windows(3).all(|w| !(w[0] == w[1] && w[1] == w[2]));
        if !cycle_like {
            return Err(LaceError::UnresolvableLattice(
                "boundary sides do not form a cycle".to_string(),
            ));
        }

        let mut remaining: Vec<Option<Vec<VertexId>>> = sides.into_iter().map(Some).collect();
        let mut walks = Vec::with_capacity(4);

        let mut current = remaining[0].take();
        while let Some(walk) = current {
            let end = walk[walk.len() - 1];
            walks.push(walk);

            current = remaining.iter_mut().find_map(|slot| {
                let side = slot.as_ref()?;
                if side[0] == end {
                    slot.take()
                } else if side[side.len() - 1] == end {
                    slot.take().map(|mut s| {
                        s.reverse();
                        s
                    })
                } else {
                    None
                }
            });
        }

        let closed = walks.len() == 4 && walks[3][walks[3].len() - 1] == walks[0][0];
        if !closed {
            return Err(LaceError::UnresolvableLattice(
                "boundary sides do not form a cycle".to_string(),
            ));
        }

        Ok(walks)
    }

    /// The unique unvisited vertex adjacent to both `a` and `b`.
    fn fill_cell(
        mesh: &HalfEdgeMesh,
        visited: &HashSet<VertexId>,
        a: VertexId,
        b: VertexId,
    ) -> Option<VertexId> {
        let around_b: HashSet<VertexId> = mesh.vertex_neighbors(b).collect();
        let mut common = mesh
            .vertex_neighbors(a)
            .filter(|v| around_b.contains(v) && !visited.contains(v));

        let found = common.next()?;
        match common.next() {
            Some(_) => None,
            None => Some(found),
        }
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Vertex at cell `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> VertexId {
        assert!(x < self.width && y < self.height, "cell ({}, {}) out of range", x, y);
        self.cells[x * self.height + y]
    }

    /// Vertices of row `y`, from column 0 to `width - 1`.
    pub fn row(&self, y: usize) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.width).map(move |x| self.get(x, y))
    }

    /// All vertices, column by column.
    pub fn vertices(&self) -> &[VertexId] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lace::test_support::grid_mesh;
    use crate::mesh::build_from_quads;
    use nalgebra::Point3;

    fn vid(i: usize) -> VertexId {
        VertexId::new(i)
    }

    #[test]
    fn test_find_corners() {
        let mesh = grid_mesh(4, 3);
        let corners = find_corner_vertices(&mesh).unwrap();
        assert_eq!(corners, [vid(0), vid(3), vid(8), vid(11)]);
    }

    #[test]
    fn test_single_quad_corners() {
        let mesh = grid_mesh(2, 2);
        let corners = find_corner_vertices(&mesh).unwrap();
        assert_eq!(corners, [vid(0), vid(1), vid(2), vid(3)]);
    }

    #[test]
    fn test_three_faced_vertex_is_invalid() {
        // 3x3 vertex grid with the top-right quad removed: the centre vertex
        // touches three faces.
        let vertices: Vec<Point3<f64>> = (0..9)
            .map(|i| Point3::new((i % 3) as f64, (i / 3) as f64, 0.0))
            .collect();
        let faces = vec![[0, 1, 4, 3], [1, 2, 5, 4], [3, 4, 7, 6]];
        let mesh = build_from_quads(&vertices, &faces).unwrap();

        let result = find_corner_vertices(&mesh);
        assert!(matches!(result, Err(LaceError::InvalidGeometry(_))));
    }

    #[test]
    fn test_wrong_corner_count_is_invalid() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = crate::mesh::build_from_polygons(&vertices, None, &[vec![0, 1, 2]]).unwrap();

        let result = find_corner_vertices(&mesh);
        assert!(matches!(result, Err(LaceError::InvalidGeometry(_))));
    }

    #[test]
    fn test_build_offset_zero() {
        let mesh = grid_mesh(4, 3);
        let corners = find_corner_vertices(&mesh).unwrap();
        let grid = IndexGrid::build(&mesh, &corners, 0).unwrap();

        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        for x in 0..4 {
            for y in 0..3 {
                assert_eq!(grid.get(x, y), vid(y * 4 + x));
            }
        }
        assert_eq!(grid.row(2).collect::<Vec<_>>(), vec![vid(8), vid(9), vid(10), vid(11)]);
    }

    #[test]
    fn test_build_offset_one_rotates() {
        let (w, h) = (3, 4);
        let mesh = grid_mesh(w, h);
        let corners = find_corner_vertices(&mesh).unwrap();
        let grid = IndexGrid::build(&mesh, &corners, 1).unwrap();

        // Row 0 now runs along the mesh's last column, starting at the bottom.
        assert_eq!(grid.width(), h);
        assert_eq!(grid.height(), w);
        for x in 0..h {
            for y in 0..w {
                assert_eq!(grid.get(x, y), vid(x * w + (w - 1 - y)));
            }
        }
    }

    #[test]
    fn test_all_offsets_cover_mesh() {
        let mesh = grid_mesh(5, 3);
        let corners = find_corner_vertices(&mesh).unwrap();

        for offset in 0..4 {
            let grid = IndexGrid::build(&mesh, &corners, offset).unwrap();
            assert_eq!(grid.width() * grid.height(), 15);

            let unique: HashSet<VertexId> = grid.vertices().iter().copied().collect();
            assert_eq!(unique.len(), 15);

            let lattice_corners: HashSet<VertexId> = [
                grid.get(0, 0),
                grid.get(grid.width() - 1, 0),
                grid.get(0, grid.height() - 1),
                grid.get(grid.width() - 1, grid.height() - 1),
            ]
            .into_iter()
            .collect();
            let expected: HashSet<VertexId> = corners.into_iter().collect();
            assert_eq!(lattice_corners, expected);
        }
    }

    #[test]
    fn test_offset_wraps_modulo_four() {
        let mesh = grid_mesh(4, 3);
        let corners = find_corner_vertices(&mesh).unwrap();

        for k in 0..4 {
            let a = IndexGrid::build(&mesh, &corners, k).unwrap();
            let b = IndexGrid::build(&mesh, &corners, k + 4).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_interior_corner_is_unresolvable() {
        let mesh = grid_mesh(3, 3);
        let corners = [vid(0), vid(2), vid(4), vid(8)];

        let result = IndexGrid::build(&mesh, &corners, 0);
        assert!(matches!(result, Err(LaceError::UnresolvableLattice(_))));
    }
}
