use log::{debug, info};
use pathviz_core::{Grid, GridError, Pos, Role};
use pathviz_paths::{Astar, PathResult, RoleChange, SearchError, Step};
use pathviz_ui::{Canvas, Effect, Glyph, Key, Model, MouseAction, Msg};

use crate::config::VisualizerConfig;
use crate::palette;

const HELP: &str = "L-click: start/end/wall  R-click: erase  SPACE: run  c: clear  q: quit";

/// What the visualizer is doing, shown on the status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Editing,
    Searching { expanded: usize },
    Found { cells: usize, expanded: usize },
    NotFound { expanded: usize },
    Cancelled,
    /// A search request was refused.
    Refused(SearchError),
}

impl Status {
    fn line(&self) -> String {
        match self {
            Self::Editing => "Paint a start, an end and some walls".to_string(),
            Self::Searching { expanded } => format!("Searching... {expanded} expanded"),
            Self::Found { cells, expanded } => {
                format!("Path of {cells} cells, {expanded} expanded")
            }
            Self::NotFound { expanded } => format!("No path ({expanded} expanded)"),
            Self::Cancelled => "Search cancelled".to_string(),
            Self::Refused(err) => format!("Cannot search: {err}"),
        }
    }
}

/// Interaction controller and model for the visualizer.
///
/// Owns the grid, the remembered start and end cells and the search in
/// progress. While a search runs the grid only changes through it; painting
/// is ignored until the search ends or is cancelled.
pub struct Visualizer {
    config: VisualizerConfig,
    grid: Grid,
    start: Option<Pos>,
    end: Option<Pos>,
    search: Option<Astar>,
    status: Status,
    /// Animation frame counter, advanced on every tick.
    frame: u32,
    /// Frame at which each cell (row-major index) was last closed.
    closed_at: Vec<Option<u32>>,
}

impl Visualizer {
    pub fn new(config: VisualizerConfig) -> Self {
        let grid = Grid::new(config.rows);
        let closed_at = vec![None; grid.len()];
        Self {
            config,
            grid,
            start: None,
            end: None,
            search: None,
            status: Status::Editing,
            frame: 0,
            closed_at,
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    #[inline]
    pub fn start(&self) -> Option<Pos> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Option<Pos> {
        self.end
    }

    #[inline]
    pub fn status(&self) -> &Status {
        &self.status
    }

    #[inline]
    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    /// Map a screen position to the grid cell drawn there.
    pub fn cell_at_screen(&self, screen: Pos) -> Result<Pos, GridError> {
        let width = self.config.cell_width.max(1);
        let p = Pos::new(screen.row, screen.col.div_euclid(width));
        self.grid.checked_index(p).map(|_| p)
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    /// Give the cell at `p` a user role, keeping at most one start and one
    /// end: a new start or end replaces the old one, and overwriting the
    /// current start or end forgets it.
    pub fn set_cell_role(&mut self, p: Pos, role: Role) -> Result<(), GridError> {
        let prev = self.grid.set_role(p, role)?;
        if prev == Role::Start && role != Role::Start {
            self.start = None;
        }
        if prev == Role::End && role != Role::End {
            self.end = None;
        }
        match role {
            Role::Start => {
                if let Some(old) = self.start.replace(p).filter(|&old| old != p) {
                    self.grid.set_role(old, Role::Empty)?;
                }
            }
            Role::End => {
                if let Some(old) = self.end.replace(p).filter(|&old| old != p) {
                    self.grid.set_role(old, Role::Empty)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Primary click: place the start, then the end, then walls. The start
    /// and end themselves are never painted over.
    pub fn paint(&mut self, p: Pos) -> Result<(), GridError> {
        self.grid.checked_index(p)?;
        if self.start.is_none() && self.end != Some(p) {
            self.set_cell_role(p, Role::Start)
        } else if self.end.is_none() && self.start != Some(p) {
            self.set_cell_role(p, Role::End)
        } else if self.start != Some(p) && self.end != Some(p) {
            self.set_cell_role(p, Role::Barrier)
        } else {
            Ok(())
        }
    }

    /// Secondary click: reset the cell, forgetting it as start or end.
    pub fn erase(&mut self, p: Pos) -> Result<(), GridError> {
        self.set_cell_role(p, Role::Empty)?;
        if let Some(i) = self.grid.index(p) {
            self.closed_at[i] = None;
        }
        Ok(())
    }

    /// Start over with a fresh grid.
    pub fn clear_grid(&mut self) {
        if self.search.take().is_some() {
            debug!("visualizer: clear dropped a running search");
        }
        self.grid.reset();
        self.start = None;
        self.end = None;
        self.closed_at.fill(None);
        self.status = Status::Editing;
        info!("visualizer: grid cleared");
    }

    /// Begin a search between the current start and end.
    ///
    /// Marks from a previous run are wiped and neighbour lists refreshed
    /// first. The search then advances through [`advance`](Self::advance).
    pub fn run_search(&mut self) -> Result<(), SearchError> {
        if self.search.is_some() {
            return Ok(());
        }
        self.grid.clear_search_marks();
        self.closed_at.fill(None);
        self.grid.refresh_neighbors();
        match Astar::new(&self.grid, self.start, self.end) {
            Ok(search) => {
                info!(
                    "visualizer: searching {} -> {}",
                    search.start(),
                    search.end()
                );
                self.search = Some(search);
                self.status = Status::Searching { expanded: 0 };
                Ok(())
            }
            Err(err) => {
                debug!("visualizer: search refused: {err}");
                self.status = Status::Refused(err);
                Err(err)
            }
        }
    }

    /// Abort the running search. Marks already written stay on the grid.
    pub fn cancel_search(&mut self) {
        if let Some(search) = self.search.take() {
            info!(
                "visualizer: search cancelled after {} expansions",
                search.expanded()
            );
            self.status = Status::Cancelled;
        }
    }

    /// Advance the running search by up to `steps_per_tick` expansions.
    ///
    /// Returns the result when the search finishes during this call.
    pub fn advance(&mut self) -> Option<PathResult> {
        let search = self.search.as_mut()?;
        let mut changes: Vec<RoleChange> = Vec::new();
        let mut finished = None;
        for _ in 0..self.config.steps_per_tick.max(1) {
            if let Step::Done(result) = search.step(&mut self.grid, &mut changes) {
                finished = Some(result);
                break;
            }
        }
        let expanded = search.expanded();
        self.present(&changes);

        match &finished {
            Some(PathResult::Found(path)) => {
                info!("visualizer: path of {} cells", path.len());
                self.status = Status::Found {
                    cells: path.len(),
                    expanded,
                };
                self.search = None;
            }
            Some(PathResult::NotFound) => {
                info!("visualizer: no path");
                self.status = Status::NotFound { expanded };
                self.search = None;
            }
            None => self.status = Status::Searching { expanded },
        }
        finished
    }

    /// Record role changes for the closed-cell fade.
    fn present(&mut self, changes: &[RoleChange]) {
        for change in changes {
            let Some(i) = self.grid.index(change.pos) else {
                continue;
            };
            self.closed_at[i] = match change.role {
                Role::Closed => Some(self.frame),
                _ => None,
            };
        }
    }

    /// Whether some closed cell is still fading in.
    fn fading(&self) -> bool {
        let frames = self.config.closed_fade_frames;
        self.closed_at
            .iter()
            .flatten()
            .any(|&at| self.frame.saturating_sub(at) < frames)
    }

    /// Keep ticking while a search runs or a fade is in progress.
    fn next_tick(&self) -> Option<Effect> {
        (self.search.is_some() || self.fading()).then(|| Effect::msg(Msg::Tick))
    }

    fn handle_key(&mut self, key: Key) -> Option<Effect> {
        match key {
            Key::Char('q') => return Some(Effect::End),
            Key::Escape if self.is_searching() => self.cancel_search(),
            Key::Escape => return Some(Effect::End),
            Key::Char('c') => self.clear_grid(),
            Key::Space | Key::Enter if !self.is_searching() => {
                if self.run_search().is_ok() {
                    return Some(Effect::msg(Msg::Tick));
                }
            }
            _ => {}
        }
        None
    }

    fn handle_mouse(&mut self, action: MouseAction, screen: Pos) {
        if self.is_searching() {
            return;
        }
        let p = match self.cell_at_screen(screen) {
            Ok(p) => p,
            Err(err) => {
                debug!("visualizer: ignoring click: {err}");
                return;
            }
        };
        let result = match action {
            MouseAction::Main | MouseAction::DragMain => self.paint(p),
            MouseAction::Secondary | MouseAction::DragSecondary => self.erase(p),
            MouseAction::Release => Ok(()),
        };
        if let Err(err) = result {
            debug!("visualizer: edit at {p} failed: {err}");
        }
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new(VisualizerConfig::default())
    }
}

impl Model for Visualizer {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Init | Msg::Screen { .. } => None,
            Msg::Quit => Some(Effect::End),
            Msg::KeyDown { key } => self.handle_key(key),
            Msg::Mouse { action, pos } => {
                self.handle_mouse(action, pos);
                None
            }
            Msg::Tick => {
                self.frame = self.frame.wrapping_add(1);
                self.advance();
                self.next_tick()
            }
        }
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.fill(Glyph::default());
        let width = self.config.cell_width.max(1);
        let fade = self.config.closed_fade_frames;

        for (i, cell) in self.grid.iter().enumerate() {
            let role = cell.role();
            let bg = match (role, self.closed_at[i]) {
                (Role::Closed, Some(at)) => {
                    palette::closed_color(self.frame.saturating_sub(at), fade)
                }
                _ => palette::role_color(role),
            };
            let style = palette::cell_style(role, bg);
            let label = match role {
                Role::Start => 'S',
                Role::End => 'E',
                _ => ' ',
            };
            let p = cell.pos();
            for dx in 0..width {
                let ch = if dx == 0 { label } else { ' ' };
                canvas.set(Pos::new(p.row, p.col * width + dx), Glyph { ch, style });
            }
        }

        let rows = self.grid.size();
        canvas.print(rows, 0, &self.status.line(), palette::status_style());
        canvas.print(rows + 1, 0, HELP, palette::help_style());
    }
}
