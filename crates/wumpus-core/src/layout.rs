//! Ground-truth hazard and treasure placement.

use serde::{Deserialize, Serialize};
use wumpus_nav::{is_reachable, Cell, CellSet, Grid};

use crate::error::LayoutError;

/// The two kinds of lethal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hazard {
    Monster,
    Pit,
}

/// One episode's ground truth: where the monster, the pits and the gold are.
///
/// Invariants (checked by [`Layout::new`], guaranteed by the generator): every special cell is
/// in bounds, outside the start zone (start cell plus its neighbours), and no two special
/// items share a cell. Solvability is a separate property, see [`Layout::is_solvable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    grid: Grid,
    start: Cell,
    monster: Option<Cell>,
    pits: Vec<Cell>,
    gold: Cell,
}

impl Layout {
    pub fn new(
        grid: Grid,
        start: Cell,
        monster: Cell,
        pits: Vec<Cell>,
        gold: Cell,
    ) -> Result<Self, LayoutError> {
        if !grid.contains(start) {
            return Err(LayoutError::OutOfBounds(start));
        }
        let layout = Self::assemble(grid, start, monster, pits, gold);
        layout.validate()?;
        Ok(layout)
    }

    /// Build without validation; the caller upholds the invariants.
    pub(crate) fn assemble(
        grid: Grid,
        start: Cell,
        monster: Cell,
        pits: Vec<Cell>,
        gold: Cell,
    ) -> Self {
        Self {
            grid,
            start,
            monster: Some(monster),
            pits,
            gold,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), LayoutError> {
        let zone = self.start_zone();
        let mut placed = CellSet::new(self.grid);
        let specials = self
            .monster
            .iter()
            .chain(core::iter::once(&self.gold))
            .chain(self.pits.iter());

        for &cell in specials {
            if !self.grid.contains(cell) {
                return Err(LayoutError::OutOfBounds(cell));
            }
            if zone.contains(cell) {
                return Err(LayoutError::InStartZone(cell));
            }
            if !placed.insert(cell) {
                return Err(LayoutError::Overlap(cell));
            }
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    /// `None` once the monster has been killed.
    pub fn monster(&self) -> Option<Cell> {
        self.monster
    }

    pub fn pits(&self) -> &[Cell] {
        &self.pits
    }

    pub fn gold(&self) -> Cell {
        self.gold
    }

    pub fn is_pit(&self, cell: Cell) -> bool {
        self.pits.contains(&cell)
    }

    pub fn hazard_at(&self, cell: Cell) -> Option<Hazard> {
        if self.monster == Some(cell) {
            Some(Hazard::Monster)
        } else if self.is_pit(cell) {
            Some(Hazard::Pit)
        } else {
            None
        }
    }

    /// Start cell plus its orthogonal neighbours; nothing special may be placed here.
    pub fn start_zone(&self) -> CellSet {
        self.grid.neighborhood(self.start)
    }

    /// Every cell that is not the monster or a pit.
    pub fn walkable(&self) -> CellSet {
        let mut set = CellSet::full(self.grid);
        if let Some(monster) = self.monster {
            set.remove(monster);
        }
        for &pit in &self.pits {
            set.remove(pit);
        }
        set
    }

    /// A hazard-free route exists from the start to the gold and from the gold back again.
    pub fn is_solvable(&self) -> bool {
        let walkable = self.walkable();
        is_reachable(self.start, self.gold, &walkable)
            && is_reachable(self.gold, self.start, &walkable)
    }

    /// Remove a killed monster. Returns the cell it occupied.
    pub fn remove_monster(&mut self) -> Option<Cell> {
        self.monster.take()
    }
}
