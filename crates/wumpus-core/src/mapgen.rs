//! Guaranteed-solvable layout generation.
//!
//! Monster, gold and pits are drawn from every cell outside the start zone; a sample is kept
//! only if the gold can be reached from the start and the start reached again from the gold
//! without stepping on a hazard. Rejected samples are redrawn from scratch until the attempt
//! budget runs out.

use wumpus_nav::{Cell, Grid};

use crate::error::GenerateError;
use crate::layout::Layout;
use crate::rng::{sample_prefix, DeterministicRng};

/// Generator parameters. Usually derived from [`crate::GameConfig::mapgen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapGenConfig {
    pub grid_size: u32,
    pub start: Cell,
    pub num_pits: usize,
    pub max_attempts: u32,
}

impl Default for MapGenConfig {
    fn default() -> Self {
        Self {
            grid_size: 4,
            start: Cell::new(0, 3),
            num_pits: 2,
            max_attempts: 10_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Crowded,
    GoldUnreachable,
    NoWayBack,
}

#[derive(Debug)]
enum Sample {
    Accepted(Layout),
    Rejected(Rejection),
}

/// Generate a layout satisfying the placement and solvability invariants.
pub fn generate_layout<R>(config: &MapGenConfig, rng: &mut R) -> Result<Layout, GenerateError>
where
    R: DeterministicRng + ?Sized,
{
    if config.grid_size < 2 {
        return Err(GenerateError::GridTooSmall {
            grid_size: config.grid_size,
        });
    }
    if config.grid_size > Grid::MAX_SIZE {
        return Err(GenerateError::GridTooLarge {
            grid_size: config.grid_size,
            max: Grid::MAX_SIZE,
        });
    }
    let grid = Grid::new(config.grid_size);
    if !grid.contains(config.start) {
        return Err(GenerateError::StartOutOfBounds {
            start: config.start,
            grid_size: config.grid_size,
        });
    }

    let zone = grid.neighborhood(config.start);
    let candidates: Vec<Cell> = grid.cells().filter(|c| !zone.contains(*c)).collect();
    let required = config.num_pits + 2;
    if candidates.len() < required {
        return Err(GenerateError::Infeasible {
            required,
            available: candidates.len(),
        });
    }

    let attempts = config.max_attempts.max(1);
    for attempt in 1..=attempts {
        match sample_once(grid, config, &candidates, rng) {
            Sample::Accepted(layout) => {
                debug_assert!(layout.validate().is_ok());
                tracing::debug!(
                    attempt,
                    monster = ?layout.monster(),
                    gold = %layout.gold(),
                    pits = ?layout.pits(),
                    "Generated layout"
                );
                return Ok(layout);
            }
            Sample::Rejected(reason) => {
                tracing::trace!(attempt, ?reason, "Rejected layout sample");
            }
        }
    }

    tracing::warn!(attempts, "Layout generation exhausted its attempt budget");
    Err(GenerateError::AttemptsExhausted { attempts })
}

fn sample_once<R>(grid: Grid, config: &MapGenConfig, candidates: &[Cell], rng: &mut R) -> Sample
where
    R: DeterministicRng + ?Sized,
{
    let mut pool = candidates.to_vec();

    let monster = take_one(&mut pool, rng);
    let gold = take_one(&mut pool, rng);
    let pits = match sample_prefix(rng, &mut pool, config.num_pits) {
        Some(picked) => picked.to_vec(),
        None => return Sample::Rejected(Rejection::Crowded),
    };

    let layout = Layout::assemble(grid, config.start, monster, pits, gold);
    let walkable = layout.walkable();

    if !wumpus_nav::is_reachable(config.start, gold, &walkable) {
        return Sample::Rejected(Rejection::GoldUnreachable);
    }
    if !wumpus_nav::is_reachable(gold, config.start, &walkable) {
        return Sample::Rejected(Rejection::NoWayBack);
    }
    Sample::Accepted(layout)
}

/// Remove and return a uniformly chosen element. `pool` must be non-empty.
fn take_one<R>(pool: &mut Vec<Cell>, rng: &mut R) -> Cell
where
    R: DeterministicRng + ?Sized,
{
    let idx = rng.gen_index(pool.len());
    pool.swap_remove(idx)
}
