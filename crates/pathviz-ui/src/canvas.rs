//! The [`Canvas`] screen buffer of styled [`Glyph`]s and the [`Frame`] diff
//! handed to drivers.
//!
//! Screen positions reuse [`Pos`]: `row` is the terminal line, `col` the
//! terminal column.

use pathviz_core::Pos;

// ---------------------------------------------------------------------------
// Color / Emphasis / Style
// ---------------------------------------------------------------------------

/// A 24-bit colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn r(self) -> u8 {
        self.r
    }

    #[inline]
    pub const fn g(self) -> u8 {
        self.g
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.b
    }

    /// The colour `step / steps` of the way from `self` to `to`.
    ///
    /// `step` saturates at `steps`, and `steps == 0` yields `to`.
    pub fn lerp(self, to: Color, step: u32, steps: u32) -> Color {
        if step >= steps {
            return to;
        }
        let mix = |a: u8, b: u8| -> u8 {
            let (a, b) = (i64::from(a), i64::from(b));
            (a + (b - a) * i64::from(step) / i64::from(steps)) as u8
        };
        Color::from_rgb(mix(self.r, to.r), mix(self.g, to.g), mix(self.b, to.b))
    }
}

/// Text weight of a glyph.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Emphasis {
    #[default]
    Normal,
    Bold,
    Dim,
}

/// Colours and weight of a glyph. `None` colours leave the terminal default.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub emphasis: Emphasis,
}

impl Style {
    #[inline]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = Some(fg);
        self
    }

    #[inline]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self
    }

    #[inline]
    pub const fn with_emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }
}

// ---------------------------------------------------------------------------
// Glyph
// ---------------------------------------------------------------------------

/// A styled character cell on screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glyph {
    pub ch: char,
    pub style: Style,
}

impl Default for Glyph {
    #[inline]
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// A `width x height` buffer of glyphs in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    glyphs: Vec<Glyph>,
    width: i32,
    height: i32,
}

impl Canvas {
    /// Create a canvas of the given dimensions, filled with default glyphs.
    pub fn new(width: i32, height: i32) -> Self {
        let (width, height) = (width.max(0), height.max(0));
        Self {
            glyphs: vec![Glyph::default(); (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Whether `p` is inside the canvas.
    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        p.row >= 0 && p.col >= 0 && p.row < self.height && p.col < self.width
    }

    #[inline]
    fn index(&self, p: Pos) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some((p.row as usize) * (self.width as usize) + (p.col as usize))
    }

    /// Read the glyph at `p`. Returns `Glyph::default()` if `p` is outside.
    pub fn at(&self, p: Pos) -> Glyph {
        self.index(p)
            .map(|i| self.glyphs[i])
            .unwrap_or_default()
    }

    /// Set the glyph at `p`. No-op if `p` is outside.
    pub fn set(&mut self, p: Pos, glyph: Glyph) {
        if let Some(i) = self.index(p) {
            self.glyphs[i] = glyph;
        }
    }

    /// Fill every glyph with `glyph`.
    pub fn fill(&mut self, glyph: Glyph) {
        self.glyphs.fill(glyph);
    }

    /// Write `text` on line `row` starting at column `col`, clipped to the
    /// canvas. Returns the number of characters written.
    pub fn print(&mut self, row: i32, col: i32, text: &str, style: Style) -> usize {
        let mut written = 0;
        for (i, ch) in text.chars().enumerate() {
            let p = Pos::new(row, col + i as i32);
            if !self.contains(p) {
                break;
            }
            self.set(p, Glyph { ch, style });
            written += 1;
        }
        written
    }

    /// Copy all glyphs from a same-sized canvas.
    pub fn copy_from(&mut self, src: &Canvas) {
        if self.width == src.width && self.height == src.height {
            self.glyphs.copy_from_slice(&src.glyphs);
        } else {
            *self = src.clone();
        }
    }

    /// Row-major iterator over `(Pos, Glyph)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Glyph)> + '_ {
        let w = self.width.max(1) as usize;
        self.glyphs
            .iter()
            .enumerate()
            .map(move |(i, &g)| (Pos::new((i / w) as i32, (i % w) as i32), g))
    }
}

// ---------------------------------------------------------------------------
// Frame / FrameCell / compute_frame
// ---------------------------------------------------------------------------

/// A single glyph that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameCell {
    pub glyph: Glyph,
    pub pos: Pos,
}

/// A set of glyph changes (a diff frame).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// Compute the difference between two canvases.
///
/// Returns a [`Frame`] containing only the glyphs of `curr` that differ from
/// `prev`. Positions missing from `prev` count as default glyphs.
pub fn compute_frame(prev: &Canvas, curr: &Canvas) -> Frame {
    let cells = curr
        .iter()
        .filter(|&(p, g)| prev.at(p) != g || !prev.contains(p))
        .map(|(pos, glyph)| FrameCell { glyph, pos })
        .collect();
    Frame {
        cells,
        width: curr.width,
        height: curr.height,
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn glyph_round_trip() {
        let g = Glyph {
            ch: 'S',
            style: Style::default()
                .with_fg(Color::from_rgb(10, 20, 30))
                .with_emphasis(Emphasis::Bold),
        };
        let json = serde_json::to_string(&g).unwrap();
        let back: Glyph = serde_json::from_str(&json).unwrap();
        assert_eq!(g, back);
    }
}
