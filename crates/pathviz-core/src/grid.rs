//! The [`Grid`] type: a square matrix of [`Cell`]s.
//!
//! Neighbour lists are cached per cell and are only valid after an explicit
//! [`refresh_neighbors`](Grid::refresh_neighbors) pass. The grid does not
//! recompute them on every edit; instead it records that a barrier changed
//! so that a search can refuse to run on stale lists.

use crate::cell::{Cell, Role};
use crate::error::GridError;
use crate::geom::Pos;

/// A square `size x size` grid of cells stored in row-major order.
#[derive(Debug, Clone)]
pub struct Grid {
    size: i32,
    cells: Vec<Cell>,
    neighbors_dirty: bool,
}

impl Grid {
    /// Build a grid of `size x size` empty cells.
    ///
    /// Neighbour lists start out uncomputed, so the grid is dirty until the
    /// first refresh.
    pub fn new(size: i32) -> Self {
        let size = size.max(0);
        Self {
            size,
            cells: Self::fresh_cells(size),
            neighbors_dirty: true,
        }
    }

    fn fresh_cells(size: i32) -> Vec<Cell> {
        let mut cells = Vec::with_capacity((size as usize) * (size as usize));
        for row in 0..size {
            for col in 0..size {
                cells.push(Cell::new(Pos::new(row, col)));
            }
        }
        cells
    }

    /// Number of cells per side.
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `p` lies inside the grid.
    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        p.row >= 0 && p.col >= 0 && p.row < self.size && p.col < self.size
    }

    /// Convert a position to a flat row-major index. Returns `None` if out of
    /// range.
    #[inline]
    pub fn index(&self, p: Pos) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some((p.row as usize) * (self.size as usize) + (p.col as usize))
    }

    /// Convert a flat index back to a position.
    #[inline]
    pub fn pos_of(&self, idx: usize) -> Pos {
        let size = self.size.max(1) as usize;
        Pos::new((idx / size) as i32, (idx % size) as i32)
    }

    /// Like [`index`](Grid::index), but fails with [`GridError::OutOfRange`].
    pub fn checked_index(&self, p: Pos) -> Result<usize, GridError> {
        self.index(p).ok_or(GridError::OutOfRange {
            pos: p,
            size: self.size,
        })
    }

    /// Bounds-checked cell accessor.
    pub fn cell_at(&self, p: Pos) -> Result<&Cell, GridError> {
        let i = self.checked_index(p)?;
        Ok(&self.cells[i])
    }

    /// Role of the cell at `p`.
    pub fn role_at(&self, p: Pos) -> Result<Role, GridError> {
        self.cell_at(p).map(Cell::role)
    }

    /// Set the role of the cell at `p`, returning the previous role.
    ///
    /// Any change in barrier status marks the neighbour lists stale.
    pub fn set_role(&mut self, p: Pos, role: Role) -> Result<Role, GridError> {
        let i = self.checked_index(p)?;
        let cell = &mut self.cells[i];
        let prev = cell.role();
        if prev.is_barrier() != role.is_barrier() {
            self.neighbors_dirty = true;
        }
        cell.set_role(role);
        Ok(prev)
    }

    /// Recompute the neighbour list of the cell at `p`.
    ///
    /// Neighbours are stored south, north, east, west; each one is kept only
    /// if it is inside the grid and not a barrier.
    pub fn compute_neighbors(&mut self, p: Pos) -> Result<(), GridError> {
        let i = self.checked_index(p)?;
        let neighbors = p
            .neighbors_4()
            .into_iter()
            .filter(|&n| {
                self.index(n)
                    .is_some_and(|ni| !self.cells[ni].role().is_barrier())
            })
            .collect();
        self.cells[i].set_neighbors(neighbors);
        Ok(())
    }

    /// Recompute every cell's neighbour list in row-major order and clear the
    /// stale flag.
    pub fn refresh_neighbors(&mut self) {
        for i in 0..self.cells.len() {
            let p = self.cells[i].pos();
            // Positions come from the grid itself and are always in range.
            let _ = self.compute_neighbors(p);
        }
        self.neighbors_dirty = false;
    }

    /// Whether a barrier changed since the last
    /// [`refresh_neighbors`](Grid::refresh_neighbors).
    #[inline]
    pub fn neighbors_dirty(&self) -> bool {
        self.neighbors_dirty
    }

    /// Replace every cell with a fresh empty one. The size is unchanged.
    pub fn reset(&mut self) {
        self.cells = Self::fresh_cells(self.size);
        self.neighbors_dirty = true;
    }

    /// Turn Open, Closed and Path cells back into Empty ones, keeping the
    /// user-painted roles. Returns the number of cells cleared.
    pub fn clear_search_marks(&mut self) -> usize {
        let mut cleared = 0;
        for cell in self.cells.iter_mut().filter(|c| c.role().is_search_mark()) {
            cell.set_role(Role::Empty);
            cleared += 1;
        }
        cleared
    }

    /// Row-major iterator over the cells.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
