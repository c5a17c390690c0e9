//! Visualizer configuration.

/// Cells per grid side.
pub const ROWS: i32 = 20;
/// Terminal columns per cell; two makes cells look roughly square.
pub const CELL_WIDTH: i32 = 2;
/// Lines below the grid: status and key help.
pub const FOOTER_LINES: i32 = 2;

/// Tunables for the grid size and animation pacing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VisualizerConfig {
    /// Cells per grid side.
    pub rows: i32,
    /// Terminal columns per cell.
    pub cell_width: i32,
    /// A* expansions per animation frame.
    pub steps_per_tick: u32,
    /// Frames a freshly closed cell takes to fade to its final colour.
    pub closed_fade_frames: u32,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            rows: ROWS,
            cell_width: CELL_WIDTH,
            steps_per_tick: 1,
            closed_fade_frames: 5,
        }
    }
}

impl VisualizerConfig {
    /// Width of the screen area in terminal columns.
    pub fn screen_width(&self) -> i32 {
        self.rows.max(0) * self.cell_width.max(1)
    }

    /// Height of the screen area in terminal lines, footer included.
    pub fn screen_height(&self) -> i32 {
        self.rows.max(0) + FOOTER_LINES
    }
}
