//! Errors raised by the grid data model.

use thiserror::Error;

use crate::geom::Pos;

/// Errors returned by bounds-checked [`Grid`](crate::Grid) accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// The coordinates lie outside `[0, size)` on some axis.
    #[error("cell {pos} is outside the {size}x{size} grid")]
    OutOfRange { pos: Pos, size: i32 },
}
