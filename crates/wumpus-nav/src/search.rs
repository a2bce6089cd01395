use std::collections::VecDeque;

use crate::{Cell, CellSet, Grid};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered cell sequence from the query start (first) to the reached goal (last).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridPath {
    pub cells: Vec<Cell>,
}

impl GridPath {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn start(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    /// Number of moves along the path.
    pub fn hops(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// The first move, or `None` when the path starts on its goal.
    pub fn next_step(&self) -> Option<Cell> {
        self.cells.get(1).copied()
    }
}

/// What a query is looking for.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Cell(Cell),
    /// Whichever member the search frontier reaches first.
    AnyOf(&'a CellSet),
}

impl Target<'_> {
    fn matches(&self, cell: Cell) -> bool {
        match self {
            Target::Cell(goal) => *goal == cell,
            Target::AnyOf(set) => set.contains(cell),
        }
    }
}

impl From<Cell> for Target<'_> {
    fn from(cell: Cell) -> Self {
        Target::Cell(cell)
    }
}

impl<'a> From<&'a CellSet> for Target<'a> {
    fn from(set: &'a CellSet) -> Self {
        Target::AnyOf(set)
    }
}

/// Reusable scratch buffers for breadth-first queries.
///
/// The start cell is always expanded, even when it is not traversable itself; every other cell
/// on the returned path is a member of the traversable set. Goals are tested when a cell leaves
/// the frontier, so a start that already satisfies the target yields a single-cell path.
#[derive(Debug, Default)]
pub struct PathQuery {
    came_from: Vec<Option<usize>>,
    seen: Vec<bool>,
    frontier: VecDeque<usize>,
}

impl PathQuery {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self, len: usize) {
        self.came_from.clear();
        self.came_from.resize(len, None);
        self.seen.clear();
        self.seen.resize(len, false);
        self.frontier.clear();
    }

    fn search(
        &mut self,
        grid: Grid,
        start: Cell,
        target: Target<'_>,
        traversable: &CellSet,
    ) -> Option<usize> {
        let start_idx = grid.index(start)?;
        self.reset(grid.len());

        self.seen[start_idx] = true;
        self.frontier.push_back(start_idx);

        while let Some(idx) = self.frontier.pop_front() {
            let cell = grid.cell_at(idx);
            if target.matches(cell) {
                return Some(idx);
            }

            for n in grid.neighbors(cell) {
                let Some(n_idx) = grid.index(n) else { continue };
                if self.seen[n_idx] || !traversable.contains_index(n_idx) {
                    continue;
                }
                self.seen[n_idx] = true;
                self.came_from[n_idx] = Some(idx);
                self.frontier.push_back(n_idx);
            }
        }

        None
    }

    /// Shortest path (in hops) from `start` to `target`, written into `out`.
    ///
    /// Returns `false` and leaves `out` empty when no route exists inside `traversable`.
    pub fn find_path_into(
        &mut self,
        start: Cell,
        target: Target<'_>,
        traversable: &CellSet,
        out: &mut GridPath,
    ) -> bool {
        out.cells.clear();
        let grid = traversable.grid();
        let Some(mut current) = self.search(grid, start, target, traversable) else {
            return false;
        };

        out.cells.push(grid.cell_at(current));
        while let Some(prev) = self.came_from[current] {
            current = prev;
            out.cells.push(grid.cell_at(current));
        }
        out.cells.reverse();
        true
    }

    pub fn is_reachable(&mut self, start: Cell, target: Target<'_>, traversable: &CellSet) -> bool {
        self.search(traversable.grid(), start, target, traversable)
            .is_some()
    }
}

/// Breadth-first shortest path over `traversable`. See [`PathQuery`] for the exact contract.
pub fn find_path<'a>(
    start: Cell,
    target: impl Into<Target<'a>>,
    traversable: &CellSet,
) -> Option<GridPath> {
    let mut query = PathQuery::new();
    let mut out = GridPath::new(Vec::new());
    query
        .find_path_into(start, target.into(), traversable, &mut out)
        .then_some(out)
}

pub fn is_reachable<'a>(start: Cell, target: impl Into<Target<'a>>, traversable: &CellSet) -> bool {
    PathQuery::new().is_reachable(start, target.into(), traversable)
}
