//! Manually controlled hunter with an arrow, scored per action.
//!
//! Unlike [`crate::Episode`] nothing is inferred here: the player reads the percepts at the
//! hunter's cell and picks actions. Actions that are not allowed in the current state return
//! `false` and change nothing.

use serde::{Deserialize, Serialize};
use wumpus_nav::{Cell, Direction};

use crate::config::GameConfig;
use crate::error::GenerateError;
use crate::layout::{Hazard, Layout};
use crate::mapgen::generate_layout;
use crate::percept::{PerceptSet, PerceptTable};
use crate::rng::DeterministicRng;

pub const MOVE_COST: i64 = -1;
pub const SHOOT_COST: i64 = -10;
pub const KILL_REWARD: i64 = 1000;
pub const GRAB_REWARD: i64 = 1000;
pub const CLIMB_REWARD: i64 = 1000;
pub const DEATH_PENALTY: i64 = -1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Move(Direction),
    Shoot(Direction),
    Grab,
    Climb,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualStatus {
    #[default]
    Playing,
    /// Climbed out of the start cell.
    Escaped { with_gold: bool },
    Dead(Hazard),
}

#[derive(Debug, Clone)]
pub struct ManualGame {
    layout: Layout,
    percepts: PerceptTable,
    hunter: Cell,
    has_gold: bool,
    has_arrow: bool,
    score: i64,
    status: ManualStatus,
}

impl ManualGame {
    pub fn new(layout: Layout) -> Self {
        Self {
            percepts: PerceptTable::build(&layout),
            hunter: layout.start(),
            has_gold: false,
            has_arrow: true,
            score: 0,
            status: ManualStatus::Playing,
            layout,
        }
    }

    /// Start on a freshly generated layout.
    pub fn generate<R>(config: &GameConfig, rng: &mut R) -> Result<Self, GenerateError>
    where
        R: DeterministicRng + ?Sized,
    {
        config.validate()?;
        Ok(Self::new(generate_layout(&config.mapgen(), rng)?))
    }

    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Move(dir) => self.move_hunter(dir),
            Action::Shoot(dir) => self.shoot(dir),
            Action::Grab => self.grab(),
            Action::Climb => self.climb(),
        }
    }

    pub fn move_hunter(&mut self, dir: Direction) -> bool {
        if self.is_over() {
            return false;
        }
        let Some(next) = self.layout.grid().step(self.hunter, dir) else {
            return false;
        };

        self.hunter = next;
        self.score += MOVE_COST;
        if let Some(hazard) = self.layout.hazard_at(next) {
            self.score += DEATH_PENALTY;
            self.status = ManualStatus::Dead(hazard);
            tracing::info!(cell = %next, ?hazard, score = self.score, "Hunter died");
        }
        true
    }

    /// Fire the single arrow. It flies to the grid edge and kills the monster if it is in line.
    pub fn shoot(&mut self, dir: Direction) -> bool {
        if self.is_over() || !self.has_arrow {
            return false;
        }
        self.has_arrow = false;
        self.score += SHOOT_COST;

        let monster = self.layout.monster();
        let hit = self
            .layout
            .grid()
            .ray(self.hunter, dir)
            .any(|cell| Some(cell) == monster);
        if hit {
            self.layout.remove_monster();
            self.percepts = PerceptTable::build(&self.layout);
            self.score += KILL_REWARD;
            tracing::info!(from = %self.hunter, ?dir, "Monster killed");
        } else {
            tracing::debug!(from = %self.hunter, ?dir, "Arrow missed");
        }
        true
    }

    pub fn grab(&mut self) -> bool {
        if self.is_over() || self.has_gold || self.hunter != self.layout.gold() {
            return false;
        }
        self.has_gold = true;
        self.score += GRAB_REWARD;
        tracing::info!(cell = %self.hunter, "Gold grabbed");
        true
    }

    /// Leave the cave. Only possible from the start cell; ends the game either way.
    pub fn climb(&mut self) -> bool {
        if self.is_over() || self.hunter != self.layout.start() {
            return false;
        }
        if self.has_gold {
            self.score += CLIMB_REWARD;
        }
        self.status = ManualStatus::Escaped {
            with_gold: self.has_gold,
        };
        tracing::info!(with_gold = self.has_gold, score = self.score, "Hunter climbed out");
        true
    }

    /// Cues at the hunter's cell. Glitter disappears once the gold is carried.
    pub fn percepts(&self) -> PerceptSet {
        let mut percepts = self.percepts.get(self.hunter).unwrap_or_default();
        percepts.glitter &= !self.has_gold;
        percepts
    }

    pub fn hunter(&self) -> Cell {
        self.hunter
    }

    pub fn has_gold(&self) -> bool {
        self.has_gold
    }

    pub fn has_arrow(&self) -> bool {
        self.has_arrow
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn status(&self) -> ManualStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status != ManualStatus::Playing
    }

    pub fn is_victory(&self) -> bool {
        self.status == ManualStatus::Escaped { with_gold: true }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}
