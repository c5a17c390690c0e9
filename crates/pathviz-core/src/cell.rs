//! The [`Cell`] type: one grid position with a [`Role`] and its cached
//! neighbour list.

use std::hash::{Hash, Hasher};

use crate::geom::Pos;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// What a cell currently represents.
///
/// `Start`, `End` and `Barrier` are painted by the user; `Open`, `Closed` and
/// `Path` are written by the search while it runs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    #[default]
    Empty,
    Start,
    End,
    Barrier,
    /// Discovered, waiting in the open set.
    Open,
    /// Already expanded.
    Closed,
    /// Part of the reported shortest path.
    Path,
}

impl Role {
    #[inline]
    pub const fn is_barrier(self) -> bool {
        matches!(self, Self::Barrier)
    }

    /// Start or End.
    #[inline]
    pub const fn is_endpoint(self) -> bool {
        matches!(self, Self::Start | Self::End)
    }

    /// Roles written by the search engine.
    #[inline]
    pub const fn is_search_mark(self) -> bool {
        matches!(self, Self::Open | Self::Closed | Self::Path)
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A single grid cell.
///
/// Equality and hashing use the position only: the role is mutable state,
/// not identity.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pos: Pos,
    role: Role,
    #[cfg_attr(feature = "serde", serde(skip))]
    neighbors: Vec<Pos>,
}

impl Cell {
    /// A fresh, empty cell at `pos` with no neighbours computed yet.
    #[inline]
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            role: Role::Empty,
            neighbors: Vec::new(),
        }
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Set the role unconditionally.
    ///
    /// No single-start / single-end validation happens here; the controller
    /// owns that rule. Prefer [`Grid::set_role`](crate::Grid::set_role),
    /// which also tracks barrier changes.
    #[inline]
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Neighbours stored by the last neighbour refresh, in S, N, E, W order.
    #[inline]
    pub fn neighbors(&self) -> &[Pos] {
        &self.neighbors
    }

    #[inline]
    pub(crate) fn set_neighbors(&mut self, neighbors: Vec<Pos>) {
        self.neighbors = neighbors;
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pos.hash(state);
    }
}
