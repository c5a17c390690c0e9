//! **pathviz-ui**: the boundary between the visualizer and a screen.
//!
//! A [`Model`] draws into a [`Canvas`] of styled [`Glyph`]s; the [`App`]
//! loop diffs successive canvases into [`Frame`]s and hands them to a
//! [`Driver`], which also feeds input back as [`Msg`]s. Nothing here knows
//! about pathfinding.

pub mod app;
pub mod canvas;
pub mod messages;

pub use app::{App, AppConfig, Driver, Effect, Model};
pub use canvas::{Canvas, Color, Emphasis, Frame, FrameCell, Glyph, Style};
pub use messages::{Key, MouseAction, Msg};
