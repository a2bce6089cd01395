use wumpus_nav::{Cell, CellSet, Grid, GridPath, PathQuery, Target};

use crate::knowledge::KnowledgeBase;
use crate::rng::{choose, DeterministicRng};

/// Read-only view of the agent's situation at decision time.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub grid: Grid,
    pub position: Cell,
    pub start: Cell,
    pub has_gold: bool,
    pub knowledge: &'a KnowledgeBase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveReason {
    /// Step onto an adjacent safe, unvisited cell.
    Explore,
    /// Head for the nearest safe, unvisited cell.
    Frontier,
    /// Carry the gold back to the start.
    ReturnHome,
    /// Fall back to an adjacent visited cell.
    Retreat,
}

impl MoveReason {
    pub fn name(self) -> &'static str {
        match self {
            MoveReason::Explore => "explore",
            MoveReason::Frontier => "frontier",
            MoveReason::ReturnHome => "return_home",
            MoveReason::Retreat => "retreat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub next: Cell,
    pub reason: MoveReason,
}

/// Picks the agent's next cell. `None` means stay put this turn.
pub trait Policy: 'static {
    fn decide(
        &mut self,
        ctx: &DecisionContext<'_>,
        rng: &mut dyn DeterministicRng,
    ) -> Option<Decision>;
}

/// Explore safe cells until the gold is found, then walk home.
///
/// Only cells classified safe are ever entered. Ties between adjacent candidates are broken
/// with the episode RNG.
#[derive(Debug)]
pub struct ExplorerPolicy {
    query: PathQuery,
    path: GridPath,
}

impl ExplorerPolicy {
    pub fn new() -> Self {
        Self {
            query: PathQuery::new(),
            path: GridPath::new(Vec::new()),
        }
    }

    fn first_step(
        &mut self,
        from: Cell,
        target: Target<'_>,
        traversable: &CellSet,
    ) -> Option<Cell> {
        if !self
            .query
            .find_path_into(from, target, traversable, &mut self.path)
        {
            return None;
        }
        self.path.next_step()
    }

    fn retreat(
        &self,
        ctx: &DecisionContext<'_>,
        rng: &mut dyn DeterministicRng,
    ) -> Option<Decision> {
        let visited: Vec<Cell> = ctx
            .grid
            .neighbors(ctx.position)
            .filter(|c| ctx.knowledge.is_visited(*c) && ctx.knowledge.is_safe(*c))
            .collect();
        choose(rng, &visited).map(|&next| Decision {
            next,
            reason: MoveReason::Retreat,
        })
    }
}

impl Default for ExplorerPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for ExplorerPolicy {
    fn decide(
        &mut self,
        ctx: &DecisionContext<'_>,
        rng: &mut dyn DeterministicRng,
    ) -> Option<Decision> {
        let traversable = ctx.knowledge.safe_cells();

        if ctx.has_gold {
            if let Some(next) = self.first_step(ctx.position, Target::Cell(ctx.start), &traversable)
            {
                return Some(Decision {
                    next,
                    reason: MoveReason::ReturnHome,
                });
            }
            return self.retreat(ctx, rng);
        }

        let frontier = ctx.knowledge.frontier();
        let adjacent: Vec<Cell> = ctx
            .grid
            .neighbors(ctx.position)
            .filter(|c| frontier.contains(*c))
            .collect();
        if let Some(&next) = choose(rng, &adjacent) {
            return Some(Decision {
                next,
                reason: MoveReason::Explore,
            });
        }

        if !frontier.is_empty() {
            if let Some(next) = self.first_step(ctx.position, Target::AnyOf(&frontier), &traversable)
            {
                return Some(Decision {
                    next,
                    reason: MoveReason::Frontier,
                });
            }
        }

        self.retreat(ctx, rng)
    }
}
