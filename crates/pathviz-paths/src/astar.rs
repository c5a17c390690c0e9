use log::{debug, trace, warn};
use pathviz_core::{CancelToken, Grid, Pos, Role};

use crate::distance::manhattan;
use crate::error::{MissingEndpoint, SearchError};
use crate::observer::{RoleChange, SearchObserver};
use crate::open_set::{Node, OpenSet};

/// Outcome of a finished search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathResult {
    /// The shortest path, start and end included.
    Found(Vec<Pos>),
    /// The open set ran dry before reaching the end.
    NotFound,
}

impl PathResult {
    /// The path, if one was found.
    pub fn path(&self) -> Option<&[Pos]> {
        match self {
            Self::Found(path) => Some(path),
            Self::NotFound => None,
        }
    }

    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// What one call to [`Astar::step`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// `pos` was popped from the open set with key `f` and expanded.
    Expanded { pos: Pos, f: i32 },
    /// The search is over.
    Done(PathResult),
}

/// An in-flight A* search.
///
/// All scores, predecessors and the open set live here and are dropped with
/// the search. The grid itself is only borrowed during [`new`](Astar::new)
/// and each [`step`](Astar::step), so the owner can draw it in between.
#[derive(Debug)]
pub struct Astar {
    start: Pos,
    end: Pos,
    start_idx: usize,
    goal_idx: usize,
    nodes: Vec<Node>,
    open: OpenSet,
    expanded: usize,
    outcome: Option<PathResult>,
    // scratch buffer for the current cell's neighbours
    nbuf: Vec<Pos>,
}

impl Astar {
    /// Prepare a search from `start` to `end`.
    ///
    /// Fails if an endpoint is missing or outside the grid, or if a barrier
    /// changed since the grid's neighbour lists were last refreshed.
    pub fn new(grid: &Grid, start: Option<Pos>, end: Option<Pos>) -> Result<Self, SearchError> {
        let (start, end) = match (start, end) {
            (Some(s), Some(e)) => (s, e),
            (None, Some(_)) => {
                return Err(SearchError::InvalidConfiguration(MissingEndpoint::Start));
            }
            (Some(_), None) => {
                return Err(SearchError::InvalidConfiguration(MissingEndpoint::End));
            }
            (None, None) => {
                return Err(SearchError::InvalidConfiguration(MissingEndpoint::Both));
            }
        };
        let start_idx = grid.checked_index(start)?;
        let goal_idx = grid.checked_index(end)?;
        if grid.neighbors_dirty() {
            return Err(SearchError::StaleNeighbors);
        }

        let mut nodes = vec![Node::default(); grid.len()];
        let f = manhattan(start, end);
        {
            let node = &mut nodes[start_idx];
            node.g = 0;
            node.f = f;
            node.open = true;
        }
        let mut open = OpenSet::new();
        open.push(start_idx, f);

        let size = grid.size();
        debug!("astar: {start} -> {end} on {size}x{size} grid, estimate {f}");

        Ok(Self {
            start,
            end,
            start_idx,
            goal_idx,
            nodes,
            open,
            expanded: 0,
            outcome: None,
            nbuf: Vec::with_capacity(4),
        })
    }

    #[inline]
    pub fn start(&self) -> Pos {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Pos {
        self.end
    }

    /// Number of cells popped from the open set so far.
    #[inline]
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// The result, once the search has finished.
    #[inline]
    pub fn outcome(&self) -> Option<&PathResult> {
        self.outcome.as_ref()
    }

    /// Pop and expand one cell.
    ///
    /// `grid` must be the grid the search was created on; a grid of another
    /// size ends the search with [`PathResult::NotFound`] without touching
    /// it. Every role written to the grid is reported to `observer` before
    /// the next write. Once the search is over, further calls keep returning
    /// the same [`Step::Done`].
    pub fn step<O>(&mut self, grid: &mut Grid, observer: &mut O) -> Step
    where
        O: SearchObserver + ?Sized,
    {
        if let Some(outcome) = &self.outcome {
            return Step::Done(outcome.clone());
        }
        if grid.len() != self.nodes.len() {
            warn!(
                "astar: stepped on a grid of {} cells, search was built for {}",
                grid.len(),
                self.nodes.len()
            );
            return self.finish(PathResult::NotFound);
        }

        let Some(current) = self.open.pop() else {
            return self.finish(PathResult::NotFound);
        };
        let ci = current.idx;
        self.nodes[ci].open = false;
        self.expanded += 1;
        let current_pos = grid.pos_of(ci);
        trace!(
            "astar: expand {current_pos} f={} ({} open)",
            current.f,
            self.open.len()
        );

        if ci == self.goal_idx {
            let path = self.reconstruct(grid, observer);
            return self.finish(PathResult::Found(path));
        }

        if ci != self.start_idx {
            self.mark(grid, current_pos, Role::Closed, observer);
        }

        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        if let Ok(cell) = grid.cell_at(current_pos) {
            nbuf.extend_from_slice(cell.neighbors());
        }
        let tentative_g = self.nodes[ci].g + 1;
        for &np in &nbuf {
            let Some(ni) = grid.index(np) else {
                continue;
            };
            let n = &mut self.nodes[ni];
            // Equal costs keep the first predecessor found.
            if tentative_g >= n.g {
                continue;
            }
            n.parent = ci;
            n.g = tentative_g;
            n.f = tentative_g + manhattan(np, self.end);
            if !n.open {
                n.open = true;
                let f = n.f;
                self.open.push(ni, f);
                self.mark(grid, np, Role::Open, observer);
            }
        }
        self.nbuf = nbuf;

        Step::Expanded {
            pos: current_pos,
            f: current.f,
        }
    }

    /// Step until the search finishes, checking `cancel` before every step.
    ///
    /// Cancellation leaves the roles written so far in place.
    pub fn run<O>(
        &mut self,
        grid: &mut Grid,
        observer: &mut O,
        cancel: &CancelToken,
    ) -> Result<PathResult, SearchError>
    where
        O: SearchObserver + ?Sized,
    {
        loop {
            if cancel.is_cancelled() {
                debug!("astar: cancelled after {} expansions", self.expanded);
                return Err(SearchError::Cancelled);
            }
            if let Step::Done(result) = self.step(grid, observer) {
                return Ok(result);
            }
        }
    }

    fn finish(&mut self, result: PathResult) -> Step {
        match &result {
            PathResult::Found(path) => debug!(
                "astar: found path of {} cells after {} expansions",
                path.len(),
                self.expanded
            ),
            PathResult::NotFound => {
                debug!("astar: no path after {} expansions", self.expanded)
            }
        }
        self.outcome = Some(result.clone());
        Step::Done(result)
    }

    /// Walk predecessors back from the goal, marking the cells in between as
    /// Path, and return the path in start-to-end order.
    fn reconstruct<O>(&self, grid: &mut Grid, observer: &mut O) -> Vec<Pos>
    where
        O: SearchObserver + ?Sized,
    {
        let mut path = vec![self.end];
        let mut ci = self.nodes[self.goal_idx].parent;
        while ci != usize::MAX {
            let p = grid.pos_of(ci);
            self.mark(grid, p, Role::Path, observer);
            path.push(p);
            ci = self.nodes[ci].parent;
        }
        path.reverse();
        path
    }

    /// Write `role` and notify the observer. Endpoints keep their roles.
    fn mark<O>(&self, grid: &mut Grid, p: Pos, role: Role, observer: &mut O)
    where
        O: SearchObserver + ?Sized,
    {
        if p == self.start || p == self.end {
            return;
        }
        if grid.set_role(p, role).is_ok() {
            observer.role_changed(RoleChange { pos: p, role });
        }
    }
}

/// Run A* from `start` to `end` to completion.
///
/// `grid` must have had its neighbours refreshed since the last barrier
/// change. A search with `start == end` returns the single-cell path
/// `[start]`.
pub fn find_path<O: SearchObserver>(
    grid: &mut Grid,
    start: Pos,
    end: Pos,
    observer: O,
) -> Result<PathResult, SearchError> {
    find_path_with_context(grid, start, end, observer, &CancelToken::new())
}

/// Like [`find_path`], but aborts with [`SearchError::Cancelled`] as soon as
/// `cancel` is raised.
pub fn find_path_with_context<O: SearchObserver>(
    grid: &mut Grid,
    start: Pos,
    end: Pos,
    mut observer: O,
    cancel: &CancelToken,
) -> Result<PathResult, SearchError> {
    let mut search = Astar::new(grid, Some(start), Some(end))?;
    search.run(grid, &mut observer, cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathviz_core::GridError;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn open_grid(size: i32) -> Grid {
        let mut g = Grid::new(size);
        g.refresh_neighbors();
        g
    }

    fn with_barriers(size: i32, barriers: &[Pos]) -> Grid {
        let mut g = Grid::new(size);
        for &b in barriers {
            g.set_role(b, Role::Barrier).unwrap();
        }
        g.refresh_neighbors();
        g
    }

    fn assert_valid_path(grid: &Grid, path: &[Pos], start: Pos, end: Pos) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        for w in path.windows(2) {
            assert!(w[0].is_adjacent(w[1]), "{} and {} are not adjacent", w[0], w[1]);
            assert_ne!(grid.role_at(w[1]).unwrap(), Role::Barrier);
        }
    }

    #[test]
    fn corner_to_corner_on_empty_grid() {
        let mut g = open_grid(5);
        let (start, end) = (Pos::new(0, 0), Pos::new(4, 4));
        let mut search = Astar::new(&g, Some(start), Some(end)).unwrap();

        let mut popped = Vec::new();
        let result = loop {
            match search.step(&mut g, &mut ()) {
                Step::Expanded { f, .. } => popped.push(f),
                Step::Done(result) => break result,
            }
        };

        let path = result.path().unwrap();
        assert_eq!(path.len(), 9);
        assert_valid_path(&g, path, start, end);
        assert!(popped.windows(2).all(|w| w[0] <= w[1]), "{popped:?}");
    }

    #[test]
    fn routes_through_single_gap() {
        let wall: Vec<Pos> = (0..5)
            .filter(|&c| c != 2)
            .map(|c| Pos::new(2, c))
            .collect();
        let mut g = with_barriers(5, &wall);
        let result = find_path(&mut g, Pos::new(0, 0), Pos::new(4, 4), ()).unwrap();
        let path = result.path().unwrap();
        assert!(path.contains(&Pos::new(2, 2)));
        assert_eq!(path.len(), 9);
        assert_valid_path(&g, path, Pos::new(0, 0), Pos::new(4, 4));
    }

    #[test]
    fn start_equal_to_end_is_single_cell() {
        let mut g = open_grid(3);
        let mut changes: Vec<RoleChange> = Vec::new();
        let result = find_path(&mut g, Pos::new(1, 1), Pos::new(1, 1), &mut changes).unwrap();
        assert_eq!(result, PathResult::Found(vec![Pos::new(1, 1)]));
        assert!(changes.is_empty());
    }

    #[test]
    fn enclosed_end_is_not_found() {
        let ring = [
            Pos::new(3, 4),
            Pos::new(4, 3),
            Pos::new(2, 3),
            Pos::new(3, 2),
        ];
        let mut g = with_barriers(6, &ring);
        let mut search = Astar::new(&g, Some(Pos::new(0, 0)), Some(Pos::new(3, 3))).unwrap();
        let result = search.run(&mut g, &mut (), &CancelToken::new()).unwrap();
        assert_eq!(result, PathResult::NotFound);
        assert!(search.expanded() <= g.len());
        // Marks from the exhausted search stay visible.
        assert_eq!(g.role_at(Pos::new(5, 5)).unwrap(), Role::Closed);
    }

    #[test]
    fn endpoints_keep_their_roles() {
        let mut g = Grid::new(4);
        let (start, end) = (Pos::new(0, 0), Pos::new(3, 2));
        g.set_role(start, Role::Start).unwrap();
        g.set_role(end, Role::End).unwrap();
        g.refresh_neighbors();

        let mut changes: Vec<RoleChange> = Vec::new();
        let result = find_path(&mut g, start, end, &mut changes).unwrap();
        assert!(result.is_found());
        assert_eq!(g.role_at(start).unwrap(), Role::Start);
        assert_eq!(g.role_at(end).unwrap(), Role::End);
        assert!(changes.iter().all(|c| c.pos != start && c.pos != end));
    }

    #[test]
    fn events_mirror_grid_mutations() {
        let mut g = open_grid(5);
        let mut changes: Vec<RoleChange> = Vec::new();
        let result = find_path(&mut g, Pos::new(0, 0), Pos::new(4, 4), &mut changes).unwrap();
        let path = result.path().unwrap();

        // The last write to every cell is what the grid now holds.
        for cell in &g {
            if let Some(last) = changes.iter().rev().find(|c| c.pos == cell.pos()) {
                assert_eq!(last.role, cell.role());
            }
        }
        // Intermediate path cells are reported from the end backwards.
        let path_events: Vec<Pos> = changes
            .iter()
            .filter(|c| c.role == Role::Path)
            .map(|c| c.pos)
            .collect();
        let mut inner: Vec<Pos> = path[1..path.len() - 1].to_vec();
        inner.reverse();
        assert_eq!(path_events, inner);
        // The first events are the start's neighbours being opened, S then E.
        assert_eq!(
            &changes[..2],
            &[
                RoleChange {
                    pos: Pos::new(1, 0),
                    role: Role::Open
                },
                RoleChange {
                    pos: Pos::new(0, 1),
                    role: Role::Open
                },
            ]
        );
    }

    #[test]
    fn repeated_runs_are_identical() {
        let barriers = [Pos::new(1, 1), Pos::new(1, 2), Pos::new(3, 3), Pos::new(2, 4)];
        let mut a = with_barriers(6, &barriers);
        let mut b = a.clone();
        let first = find_path(&mut a, Pos::new(0, 0), Pos::new(5, 5), ()).unwrap();
        let second = find_path(&mut b, Pos::new(0, 0), Pos::new(5, 5), ()).unwrap();
        assert_eq!(first, second);

        // Rerunning on the already-marked grid gives the same path too.
        let third = find_path(&mut a, Pos::new(0, 0), Pos::new(5, 5), ()).unwrap();
        assert_eq!(first, third);
    }

    #[test]
    fn ties_prefer_south_first() {
        let mut g = open_grid(3);
        let result = find_path(&mut g, Pos::new(0, 0), Pos::new(1, 1), ()).unwrap();
        assert_eq!(
            result,
            PathResult::Found(vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(1, 1)])
        );
    }

    #[test]
    fn missing_endpoints_are_rejected() {
        let g = open_grid(3);
        assert_eq!(
            Astar::new(&g, None, Some(Pos::ZERO)).unwrap_err(),
            SearchError::InvalidConfiguration(MissingEndpoint::Start)
        );
        assert_eq!(
            Astar::new(&g, Some(Pos::ZERO), None).unwrap_err(),
            SearchError::InvalidConfiguration(MissingEndpoint::End)
        );
        assert_eq!(
            Astar::new(&g, None, None).unwrap_err(),
            SearchError::InvalidConfiguration(MissingEndpoint::Both)
        );
    }

    #[test]
    fn out_of_range_endpoint_is_rejected() {
        let mut g = open_grid(3);
        let err = find_path(&mut g, Pos::ZERO, Pos::new(3, 0), ()).unwrap_err();
        assert_eq!(
            err,
            SearchError::OutOfRange(GridError::OutOfRange {
                pos: Pos::new(3, 0),
                size: 3
            })
        );
    }

    #[test]
    fn stale_neighbors_are_rejected() {
        let mut g = open_grid(3);
        g.set_role(Pos::new(1, 1), Role::Barrier).unwrap();
        let err = find_path(&mut g, Pos::ZERO, Pos::new(2, 2), ()).unwrap_err();
        assert_eq!(err, SearchError::StaleNeighbors);
        g.refresh_neighbors();
        assert!(find_path(&mut g, Pos::ZERO, Pos::new(2, 2), ()).is_ok());
    }

    #[test]
    fn cancelled_token_stops_search() {
        let mut g = open_grid(8);
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut changes: Vec<RoleChange> = Vec::new();
        let err = find_path_with_context(&mut g, Pos::ZERO, Pos::new(7, 7), &mut changes, &cancel)
            .unwrap_err();
        assert_eq!(err, SearchError::Cancelled);
        assert!(changes.is_empty());
    }

    #[test]
    fn cancel_midway_keeps_marks() {
        let mut g = open_grid(8);
        let mut search = Astar::new(&g, Some(Pos::ZERO), Some(Pos::new(7, 7))).unwrap();
        for _ in 0..3 {
            assert!(matches!(search.step(&mut g, &mut ()), Step::Expanded { .. }));
        }
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(
            search.run(&mut g, &mut (), &cancel).unwrap_err(),
            SearchError::Cancelled
        );
        assert!(g.iter().any(|c| c.role() == Role::Closed));
        assert!(g.iter().any(|c| c.role() == Role::Open));
    }

    #[test]
    fn foreign_grid_ends_search() {
        let g = open_grid(3);
        let mut search = Astar::new(&g, Some(Pos::ZERO), Some(Pos::new(2, 2))).unwrap();
        let mut bigger = open_grid(5);
        let mut changes: Vec<RoleChange> = Vec::new();
        assert_eq!(
            search.step(&mut bigger, &mut changes),
            Step::Done(PathResult::NotFound)
        );
        assert!(changes.is_empty());
        assert!(bigger.iter().all(|c| c.role() == Role::Empty));
        assert_eq!(search.outcome(), Some(&PathResult::NotFound));
    }

    #[test]
    fn finished_search_keeps_reporting_outcome() {
        let mut g = open_grid(2);
        let mut search = Astar::new(&g, Some(Pos::ZERO), Some(Pos::new(1, 1))).unwrap();
        let result = search.run(&mut g, &mut (), &CancelToken::new()).unwrap();
        assert_eq!(search.step(&mut g, &mut ()), Step::Done(result.clone()));
        assert_eq!(search.outcome(), Some(&result));
    }

    #[test]
    fn random_open_grids_match_manhattan_distance() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let size = rng.random_range(2..12);
            let mut g = open_grid(size);
            let start = Pos::new(rng.random_range(0..size), rng.random_range(0..size));
            let end = Pos::new(rng.random_range(0..size), rng.random_range(0..size));
            let result = find_path(&mut g, start, end, ()).unwrap();
            let path = result.path().unwrap();
            assert_eq!(path.len() as i32 - 1, manhattan(start, end));
            assert_valid_path(&g, path, start, end);
        }
    }

    /// Breadth-first reference distance, or `None` when unreachable.
    fn bfs_distance(grid: &Grid, start: Pos, end: Pos) -> Option<usize> {
        let mut dist = vec![usize::MAX; grid.len()];
        let mut queue = std::collections::VecDeque::new();
        dist[grid.index(start)?] = 0;
        queue.push_back(start);
        while let Some(p) = queue.pop_front() {
            let d = dist[grid.index(p)?];
            if p == end {
                return Some(d);
            }
            for &n in grid.cell_at(p).ok()?.neighbors() {
                let ni = grid.index(n)?;
                if dist[ni] == usize::MAX {
                    dist[ni] = d + 1;
                    queue.push_back(n);
                }
            }
        }
        None
    }

    #[test]
    fn random_obstacle_grids_are_optimal_and_terminate() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let size = rng.random_range(3..15);
            let mut g = Grid::new(size);
            let start = Pos::new(rng.random_range(0..size), rng.random_range(0..size));
            let end = Pos::new(rng.random_range(0..size), rng.random_range(0..size));
            for cell in g.clone().iter() {
                let p = cell.pos();
                if p != start && p != end && rng.random_bool(0.3) {
                    g.set_role(p, Role::Barrier).unwrap();
                }
            }
            g.refresh_neighbors();
            let expected = bfs_distance(&g, start, end);

            let mut search = Astar::new(&g, Some(start), Some(end)).unwrap();
            let result = search.run(&mut g, &mut (), &CancelToken::new()).unwrap();
            assert!(search.expanded() <= g.len());
            match (result, expected) {
                (PathResult::Found(path), Some(d)) => {
                    assert_eq!(path.len() - 1, d);
                    assert_valid_path(&g, &path, start, end);
                }
                (PathResult::NotFound, None) => {}
                (got, want) => panic!("astar gave {got:?}, bfs gave {want:?}"),
            }
        }
    }
}
