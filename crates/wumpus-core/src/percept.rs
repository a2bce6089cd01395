//! Percepts derived from the ground-truth layout.

use serde::{Deserialize, Serialize};
use wumpus_nav::{Cell, Grid};

use crate::layout::{Hazard, Layout};

/// Cues sensed on a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerceptSet {
    /// The monster is on a neighbouring cell.
    pub stench: bool,
    /// A pit is on a neighbouring cell.
    pub breeze: bool,
    /// The gold is on this cell.
    pub glitter: bool,
}

impl PerceptSet {
    pub const NONE: PerceptSet = PerceptSet {
        stench: false,
        breeze: false,
        glitter: false,
    };

    pub fn has_danger_cue(self) -> bool {
        self.stench || self.breeze
    }

    /// The cue that signals an adjacent `hazard`.
    pub fn cue(self, hazard: Hazard) -> bool {
        match hazard {
            Hazard::Monster => self.stench,
            Hazard::Pit => self.breeze,
        }
    }
}

/// Precomputed percepts for every cell of a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerceptTable {
    grid: Grid,
    percepts: Vec<PerceptSet>,
}

impl PerceptTable {
    pub fn build(layout: &Layout) -> Self {
        let grid = layout.grid();
        let percepts = grid
            .cells()
            .map(|cell| PerceptSet {
                stench: grid
                    .neighbors(cell)
                    .any(|n| layout.monster() == Some(n)),
                breeze: grid.neighbors(cell).any(|n| layout.is_pit(n)),
                glitter: cell == layout.gold(),
            })
            .collect();
        Self { grid, percepts }
    }

    pub fn get(&self, cell: Cell) -> Option<PerceptSet> {
        self.grid.index(cell).map(|idx| self.percepts[idx])
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }
}
