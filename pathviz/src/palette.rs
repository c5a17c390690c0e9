//! Role colours. Only rendering code maps roles to colours; the grid and
//! the search never see them.

use pathviz_core::Role;
use pathviz_ui::{Color, Emphasis, Style};

pub const EMPTY: Color = Color::from_rgb(255, 255, 255);
pub const BARRIER: Color = Color::from_rgb(51, 51, 49);
pub const START: Color = Color::from_rgb(44, 115, 109);
pub const END: Color = Color::from_rgb(83, 166, 124);
pub const OPEN: Color = Color::from_rgb(254, 250, 224);
pub const CLOSED: Color = Color::from_rgb(188, 108, 37);
pub const PATH: Color = Color::from_rgb(87, 187, 188);
pub const TEXT: Color = Color::from_rgb(230, 230, 250);

/// Background colour of a settled cell with `role`.
pub const fn role_color(role: Role) -> Color {
    match role {
        Role::Empty => EMPTY,
        Role::Start => START,
        Role::End => END,
        Role::Barrier => BARRIER,
        Role::Open => OPEN,
        Role::Closed => CLOSED,
        Role::Path => PATH,
    }
}

/// Colour of a cell closed `age` frames ago: it fades from the empty colour
/// to [`CLOSED`] over `fade_frames` frames.
pub fn closed_color(age: u32, fade_frames: u32) -> Color {
    EMPTY.lerp(CLOSED, age, fade_frames)
}

/// Glyph style for a grid cell.
pub fn cell_style(role: Role, bg: Color) -> Style {
    let style = Style::default().with_bg(bg).with_fg(BARRIER);
    if role.is_endpoint() {
        style.with_fg(EMPTY).with_emphasis(Emphasis::Bold)
    } else {
        style
    }
}

/// Style of the status line.
pub fn status_style() -> Style {
    Style::default().with_fg(TEXT).with_emphasis(Emphasis::Bold)
}

/// Style of the key help line.
pub fn help_style() -> Style {
    Style::default().with_fg(TEXT).with_emphasis(Emphasis::Dim)
}
