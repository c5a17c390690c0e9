//! **pathviz-core**: data model for the pathviz shortest-path visualizer.
//!
//! This crate provides the types shared by the search engine and the
//! interactive front-end: grid coordinates, cell roles, the square [`Grid`]
//! with its cached neighbour lists, and a cooperative-cancellation
//! [`CancelToken`].

pub mod cancel;
pub mod cell;
pub mod error;
pub mod geom;
pub mod grid;

pub use cancel::CancelToken;
pub use cell::{Cell, Role};
pub use error::GridError;
pub use geom::Pos;
pub use grid::Grid;
