//! A* shortest-path search over a [`pathviz_core::Grid`].
//!
//! The grid is a 4-connected lattice with unit edge costs and the estimate is
//! the Manhattan distance, so the reported path is always optimal.
//!
//! The engine can run to completion with [`find_path`], or be driven one
//! expansion at a time through [`Astar::step`] so that a host loop can
//! repaint and handle input between steps. Every role the engine writes is
//! reported to a [`SearchObserver`] before the next mutation happens.

mod astar;
mod distance;
mod error;
mod observer;
mod open_set;

pub use astar::{Astar, PathResult, Step, find_path, find_path_with_context};
pub use distance::manhattan;
pub use error::{MissingEndpoint, SearchError};
pub use observer::{RoleChange, SearchObserver};
pub use open_set::UNREACHABLE;
