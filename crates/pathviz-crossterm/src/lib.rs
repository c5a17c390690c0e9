//! Crossterm terminal driver for pathviz.
//!
//! Provides a [`CrosstermDriver`] that implements [`pathviz_ui::Driver`],
//! painting canvas frames into the terminal and translating keyboard and
//! mouse input into [`Msg`]s.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind},
    execute, queue,
    style::{self, Attribute, Color as CtColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::debug;

use pathviz_core::{CancelToken, Pos};
use pathviz_ui::{Color, Emphasis, Frame, Key, MouseAction, Msg};

/// Maps an optional [`pathviz_ui::Color`] to a [`crossterm::style::Color`];
/// no colour means the terminal default.
fn to_ct_color(c: Option<Color>) -> CtColor {
    match c {
        Some(c) => CtColor::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        },
        None => CtColor::Reset,
    }
}

fn to_attribute(emphasis: Emphasis) -> Option<Attribute> {
    match emphasis {
        Emphasis::Normal => None,
        Emphasis::Bold => Some(Attribute::Bold),
        Emphasis::Dim => Some(Attribute::Dim),
    }
}

/// Maps a crossterm [`KeyCode`] to a pathviz [`Key`].
fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        _ => None,
    }
}

/// Maps a crossterm mouse event to a pathviz message, if it is one we use.
fn to_mouse_msg(me: MouseEvent) -> Option<Msg> {
    let pos = Pos::new(i32::from(me.row), i32::from(me.column));
    let action = match me.kind {
        MouseEventKind::Down(MouseButton::Left) => MouseAction::Main,
        MouseEventKind::Down(MouseButton::Right) => MouseAction::Secondary,
        MouseEventKind::Drag(MouseButton::Left) => MouseAction::DragMain,
        MouseEventKind::Drag(MouseButton::Right) => MouseAction::DragSecondary,
        MouseEventKind::Up(_) => MouseAction::Release,
        _ => return None,
    };
    Some(Msg::mouse(action, pos))
}

/// Translate one terminal event.
fn to_msg(ev: Event) -> Option<Msg> {
    match ev {
        Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
            to_key(code).map(Msg::key)
        }
        Event::Mouse(me) => to_mouse_msg(me),
        Event::Resize(w, h) => Some(Msg::Screen {
            width: i32::from(w),
            height: i32::from(h),
        }),
        _ => None,
    }
}

/// A terminal back-end for pathviz using crossterm.
pub struct CrosstermDriver {
    poll_interval: Duration,
}

impl CrosstermDriver {
    /// Create a new driver.
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_millis(16),
        }
    }

    /// How long a poll waits for input before handing control back to the
    /// loop. This paces animations.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl pathviz_ui::Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All),
            event::EnableMouseCapture
        )?;
        debug!("crossterm: terminal initialised");
        Ok(())
    }

    fn poll_msgs(
        &mut self,
        stop: &CancelToken,
        tx: &Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !event::poll(self.poll_interval)? {
            return Ok(());
        }

        while event::poll(Duration::ZERO)? {
            if stop.is_cancelled() {
                return Ok(());
            }
            if let Some(m) = to_msg(event::read()?) {
                tx.send(m).ok();
            }
        }

        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = io::stdout();

        for fc in &frame.cells {
            let p = fc.pos;
            let glyph = &fc.glyph;

            queue!(
                stdout,
                cursor::MoveTo(p.col as u16, p.row as u16),
                SetForegroundColor(to_ct_color(glyph.style.fg)),
                SetBackgroundColor(to_ct_color(glyph.style.bg))
            )?;

            let attr = to_attribute(glyph.style.emphasis);
            if let Some(attr) = attr {
                queue!(stdout, style::SetAttribute(attr))?;
            }

            write!(stdout, "{}", glyph.ch)?;

            if attr.is_some() {
                queue!(stdout, style::SetAttribute(Attribute::Reset))?;
            }
        }

        stdout.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(
            stdout,
            event::DisableMouseCapture,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
        debug!("crossterm: terminal restored");
    }
}
