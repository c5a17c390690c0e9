//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`].

use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, warn};
use pathviz_core::CancelToken;

use crate::canvas::{Canvas, Frame, compute_frame};
use crate::messages::Msg;

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
pub enum Effect {
    /// A one-shot command whose optional message is queued for the *next*
    /// loop iteration, after the driver has been polled again.
    Cmd(Box<dyn FnOnce() -> Option<Msg> + Send>),
    /// Signal the application loop to stop.
    End,
}

impl Effect {
    /// An effect that just delivers `msg` on the next iteration.
    pub fn msg(msg: Msg) -> Self {
        Self::Cmd(Box::new(move || Some(msg)))
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cmd(_) => f.write_str("Effect::Cmd(..)"),
            Self::End => f.write_str("Effect::End"),
        }
    }
}

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// The application model (Elm architecture).
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `canvas`.
    fn draw(&self, canvas: &mut Canvas);
}

// ---------------------------------------------------------------------------
// Driver trait
// ---------------------------------------------------------------------------

/// Back-end driver (e.g. a terminal).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Poll for input messages, sending them through `tx`.
    ///
    /// Should return promptly (after a short wait at most) so the loop can
    /// keep animating, and should stop early once `stop` is raised.
    fn poll_msgs(
        &mut self,
        stop: &CancelToken,
        tx: &Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Clean up / restore the screen.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
    pub height: i32,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
}

impl<M: Model, D: Driver> App<M, D> {
    /// Create a new application from a configuration.
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
        }
    }

    /// The model, e.g. for inspection after the loop ends.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run the main Model-View-Update loop.
    ///
    /// 1. Initialises the driver.
    /// 2. Sends `Msg::Init` through the model.
    /// 3. Enters the event loop: poll → update → draw → diff → flush.
    /// 4. Stops when the model returns `Effect::End`.
    ///
    /// Messages produced by commands during one iteration are handled in the
    /// next one, so input is polled between consecutive animation steps. A
    /// [`Msg::Screen`] repaints every glyph, since a resized terminal may
    /// have lost what was drawn.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;
        let result = self.event_loop();
        self.driver.close();
        result
    }

    fn event_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let stop = CancelToken::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();

        // Seed with Init.
        tx.send(Msg::Init).ok();

        let mut prev = Canvas::new(self.width, self.height);
        let mut curr = Canvas::new(self.width, self.height);
        // Force a full first paint.
        let mut full_redraw = true;

        loop {
            if self.process_pending(&rx, &stop, &tx, &mut prev, &mut curr, full_redraw)? {
                full_redraw = false;
            }
            if stop.is_cancelled() {
                debug!("app: loop finished");
                return Ok(());
            }
            self.driver.poll_msgs(&stop, &tx)?;
        }
    }

    /// Drain the messages queued so far, update the model, draw, diff, and
    /// flush. Returns whether a frame was drawn.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        stop: &CancelToken,
        tx: &Sender<Msg>,
        prev: &mut Canvas,
        curr: &mut Canvas,
        full_redraw: bool,
    ) -> Result<bool, Box<dyn std::error::Error>> {
        let pending: Vec<Msg> = rx.try_iter().collect();
        if pending.is_empty() {
            return Ok(false);
        }

        let mut resized = false;
        for msg in pending {
            if let Msg::Screen { width, height } = msg {
                debug!("app: screen resized to {width}x{height}, repainting");
                resized = true;
            }
            if let Some(effect) = self.model.update(msg) {
                if Self::handle_effect(effect, stop, tx) {
                    return Ok(false);
                }
            }
        }

        self.model.draw(curr);
        let frame = if full_redraw || resized {
            compute_frame(&Canvas::new(0, 0), curr)
        } else {
            compute_frame(prev, curr)
        };
        if !frame.cells.is_empty() {
            self.driver.flush(frame)?;
        }
        prev.copy_from(curr);
        Ok(true)
    }

    /// Returns `true` if the app should stop.
    fn handle_effect(effect: Effect, stop: &CancelToken, tx: &Sender<Msg>) -> bool {
        match effect {
            Effect::End => {
                stop.cancel();
                true
            }
            Effect::Cmd(f) => {
                if let Some(msg) = f() {
                    if tx.send(msg).is_err() {
                        warn!("app: message queue closed, dropping command result");
                    }
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Glyph;
    use pathviz_core::Pos;
    use std::collections::VecDeque;

    /// Counts ticks, asks for more until it reaches `until`, then quits on
    /// `Msg::Quit`.
    struct Counter {
        ticks: u32,
        until: u32,
        seen: Vec<Msg>,
    }

    impl Model for Counter {
        fn update(&mut self, msg: Msg) -> Option<Effect> {
            self.seen.push(msg.clone());
            match msg {
                Msg::Init | Msg::Tick if self.ticks < self.until => {
                    if msg == Msg::Tick {
                        self.ticks += 1;
                    }
                    Some(Effect::msg(Msg::Tick))
                }
                Msg::Quit => Some(Effect::End),
                _ => None,
            }
        }

        fn draw(&self, canvas: &mut Canvas) {
            let ch = char::from_digit(self.ticks % 10, 10).unwrap_or('?');
            canvas.set(Pos::new(0, 0), Glyph { ch, ..Glyph::default() });
        }
    }

    /// Replays one scripted batch of messages per poll and records frames.
    #[derive(Default)]
    struct Scripted {
        polls: VecDeque<Vec<Msg>>,
        frames: Vec<Frame>,
        inited: bool,
        closed: bool,
    }

    impl Driver for Scripted {
        fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.inited = true;
            Ok(())
        }

        fn poll_msgs(
            &mut self,
            _stop: &CancelToken,
            tx: &Sender<Msg>,
        ) -> Result<(), Box<dyn std::error::Error>> {
            let batch = self.polls.pop_front().unwrap_or_else(|| vec![Msg::Quit]);
            for m in batch {
                tx.send(m).ok();
            }
            Ok(())
        }

        fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.frames.push(frame);
            Ok(())
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    #[test]
    fn command_messages_wait_for_next_poll() {
        let model = Counter {
            ticks: 0,
            until: 3,
            seen: Vec::new(),
        };
        let driver = Scripted {
            polls: VecDeque::from(vec![vec![], vec![], vec![], vec![]]),
            ..Default::default()
        };
        let mut app = App::new(AppConfig {
            model,
            driver,
            width: 2,
            height: 1,
        });
        app.run().unwrap();

        assert!(app.driver().inited && app.driver().closed);
        assert_eq!(app.model().ticks, 3);
        // One tick per loop iteration; the last one is ignored by the model.
        assert_eq!(
            app.model().seen,
            vec![Msg::Init, Msg::Tick, Msg::Tick, Msg::Tick, Msg::Tick, Msg::Quit]
        );
        assert_eq!(app.driver().frames.len(), 4);
        // First frame is a full paint of the 2x1 canvas.
        assert_eq!(app.driver().frames[0].cells.len(), 2);
        // Later frames only carry the changed counter glyph.
        assert!(app.driver().frames[1..].iter().all(|f| f.cells.len() == 1));
    }

    #[test]
    fn resize_repaints_everything() {
        let model = Counter {
            ticks: 0,
            until: 0,
            seen: Vec::new(),
        };
        let driver = Scripted {
            polls: VecDeque::from(vec![vec![Msg::Screen {
                width: 80,
                height: 24,
            }]]),
            ..Default::default()
        };
        let mut app = App::new(AppConfig {
            model,
            driver,
            width: 3,
            height: 2,
        });
        app.run().unwrap();

        let frames = &app.driver().frames;
        // Init paint, then the resize repaint; Quit ends before drawing.
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].cells.len(), 6);
    }

    #[test]
    fn end_stops_before_drawing() {
        struct Quitter;
        impl Model for Quitter {
            fn update(&mut self, _msg: Msg) -> Option<Effect> {
                Some(Effect::End)
            }
            fn draw(&self, _canvas: &mut Canvas) {}
        }

        let mut app = App::new(AppConfig {
            model: Quitter,
            driver: Scripted::default(),
            width: 1,
            height: 1,
        });
        app.run().unwrap();
        assert!(app.driver().frames.is_empty());
        assert!(app.driver().closed);
    }
}
