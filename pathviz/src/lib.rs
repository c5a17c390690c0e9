//! pathviz: paint a start, an end and some walls, then watch A* find the
//! shortest way between them.
//!
//! The [`Visualizer`] is the interaction controller: it turns input messages
//! into grid edits, drives the search one step per frame and renders the
//! grid through the [`palette`].

pub mod config;
pub mod palette;
mod visualizer;

pub use config::VisualizerConfig;
pub use visualizer::{Status, Visualizer};
