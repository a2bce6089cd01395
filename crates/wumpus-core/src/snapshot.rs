//! Serializable view of an episode for presentation layers.

use serde::Serialize;
use wumpus_nav::Cell;

use crate::episode::{Episode, EpisodeStatus};
use crate::knowledge::Classification;
use crate::layout::Layout;
use crate::percept::PerceptSet;

/// What the agent believes about one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub cell: Cell,
    pub class: Classification,
    /// Recorded percepts; `None` until the cell is visited.
    pub percepts: Option<PerceptSet>,
}

/// Everything a spectator needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeSnapshot {
    pub grid_size: u32,
    pub turn: u64,
    pub start: Cell,
    pub agent: Cell,
    pub has_gold: bool,
    pub status: EpisodeStatus,
    /// Row-major, one entry per grid cell.
    pub cells: Vec<CellView>,
    pub layout: Layout,
    pub contradictions: u32,
    pub corrections: u32,
}

impl EpisodeSnapshot {
    pub fn capture(episode: &Episode) -> Self {
        let knowledge = episode.knowledge();
        let grid = knowledge.grid();
        let cells = grid
            .cells()
            .map(|cell| CellView {
                cell,
                class: knowledge.classification(cell).unwrap_or_default(),
                percepts: knowledge.percepts(cell),
            })
            .collect();

        Self {
            grid_size: grid.size(),
            turn: episode.turn(),
            start: episode.layout().start(),
            agent: episode.position(),
            has_gold: episode.has_gold(),
            status: episode.status(),
            cells,
            layout: episode.layout().clone(),
            contradictions: knowledge.contradictions(),
            corrections: knowledge.corrections(),
        }
    }

    pub fn view(&self, cell: Cell) -> Option<&CellView> {
        self.cells.iter().find(|v| v.cell == cell)
    }
}
