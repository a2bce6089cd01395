//! One playthrough of the autonomous agent: reset, step, back.
//!
//! A turn senses the current cell (feeding the knowledge base), asks the policy for the next
//! cell, refuses to walk onto the monster, moves, and finally checks for a terminal state.

use core::fmt;

use serde::{Deserialize, Serialize};
use wumpus_nav::{is_reachable, Cell, Target};
use wumpus_tools::{TraceEvent, TraceSink};

use crate::config::GameConfig;
use crate::error::GenerateError;
use crate::knowledge::{Classification, KnowledgeBase, Observation};
use crate::layout::{Hazard, Layout};
use crate::mapgen::generate_layout;
use crate::percept::{PerceptSet, PerceptTable};
use crate::policy::{Decision, DecisionContext, ExplorerPolicy, Policy};
use crate::rng::{entropy_seed, SplitMix64};
use crate::snapshot::EpisodeSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossCause {
    Pit,
    Monster,
    /// No safe, unvisited cell is left to explore and the gold was never found.
    Trapped,
}

impl From<Hazard> for LossCause {
    fn from(hazard: Hazard) -> Self {
        match hazard {
            Hazard::Pit => LossCause::Pit,
            Hazard::Monster => LossCause::Monster,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "cause")]
pub enum EpisodeStatus {
    #[default]
    Exploring,
    Won,
    Lost(LossCause),
}

impl EpisodeStatus {
    pub fn is_terminal(self) -> bool {
        self != EpisodeStatus::Exploring
    }
}

impl fmt::Display for EpisodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeStatus::Exploring => f.write_str("exploring"),
            EpisodeStatus::Won => f.write_str("won"),
            EpisodeStatus::Lost(LossCause::Pit) => f.write_str("lost (fell into a pit)"),
            EpisodeStatus::Lost(LossCause::Monster) => f.write_str("lost (eaten by the monster)"),
            EpisodeStatus::Lost(LossCause::Trapped) => f.write_str("lost (trapped)"),
        }
    }
}

/// What a single [`Episode::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved(Cell),
    /// The policy found no move; the agent stays put.
    Stayed,
    /// The episode is (now) terminal.
    Finished(EpisodeStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub turns: u64,
    pub status: EpisodeStatus,
    pub hit_turn_cap: bool,
}

impl RunSummary {
    /// Neither terminal nor capped: the policy ran out of moves.
    pub fn stalled(&self) -> bool {
        !self.status.is_terminal() && !self.hit_turn_cap
    }
}

pub struct Episode {
    config: GameConfig,
    seed: u64,
    rng: SplitMix64,
    layout: Layout,
    percepts: PerceptTable,
    knowledge: KnowledgeBase,
    position: Cell,
    has_gold: bool,
    history: Vec<Cell>,
    status: EpisodeStatus,
    turn: u64,
    policy: Box<dyn Policy>,
    trace: Option<Box<dyn TraceSink>>,
}

impl fmt::Debug for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Episode")
            .field("seed", &self.seed)
            .field("layout", &self.layout)
            .field("position", &self.position)
            .field("has_gold", &self.has_gold)
            .field("status", &self.status)
            .field("turn", &self.turn)
            .finish_non_exhaustive()
    }
}

impl Episode {
    /// Generate a fresh layout and place the agent on the start cell.
    pub fn new(config: GameConfig) -> Result<Self, GenerateError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(entropy_seed);
        let mut rng = SplitMix64::new(seed);
        let layout = generate_layout(&config.mapgen(), &mut rng)?;
        Ok(Self::assemble(config, seed, rng, layout))
    }

    /// Play on a hand-built layout. The config's seed (if any) still drives tie-breaks.
    pub fn with_layout(config: GameConfig, layout: Layout) -> Self {
        let seed = config.seed.unwrap_or_else(entropy_seed);
        Self::assemble(config, seed, SplitMix64::new(seed), layout)
    }

    fn assemble(config: GameConfig, seed: u64, rng: SplitMix64, layout: Layout) -> Self {
        let mut episode = Self {
            config,
            seed,
            rng,
            percepts: PerceptTable::build(&layout),
            knowledge: KnowledgeBase::new(layout.grid()),
            position: layout.start(),
            has_gold: false,
            history: Vec::new(),
            status: EpisodeStatus::Exploring,
            turn: 0,
            layout,
            policy: Box::new(ExplorerPolicy::new()),
            trace: None,
        };
        episode.knowledge.assume_safe(episode.position);
        tracing::info!(
            seed,
            start = %episode.position,
            gold = %episode.layout.gold(),
            pits = episode.layout.pits().len(),
            "Episode started"
        );
        episode
    }

    pub fn with_policy(mut self, policy: impl Policy) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.trace = Some(sink);
    }

    /// Discard the current playthrough and start over on a newly generated layout.
    ///
    /// The RNG keeps advancing, so consecutive resets yield different layouts.
    pub fn reset(&mut self) -> Result<(), GenerateError> {
        let layout = generate_layout(&self.config.mapgen(), &mut self.rng)?;
        self.percepts = PerceptTable::build(&layout);
        self.knowledge = KnowledgeBase::new(layout.grid());
        self.position = layout.start();
        self.layout = layout;
        self.has_gold = false;
        self.history.clear();
        self.status = EpisodeStatus::Exploring;
        self.turn = 0;
        self.knowledge.assume_safe(self.position);
        tracing::info!(start = %self.position, gold = %self.layout.gold(), "Episode reset");
        Ok(())
    }

    /// Advance one turn. Does nothing once the episode is terminal.
    pub fn step(&mut self) -> StepOutcome {
        if self.status.is_terminal() {
            return StepOutcome::Finished(self.status);
        }
        self.turn += 1;

        self.sense();
        if self.status.is_terminal() {
            return StepOutcome::Finished(self.status);
        }

        let Some(decision) = self.decide_guarded() else {
            tracing::debug!(turn = self.turn, cell = %self.position, "No move available");
            return StepOutcome::Stayed;
        };

        self.history.push(self.position);
        self.position = decision.next;
        tracing::debug!(
            turn = self.turn,
            cell = %decision.next,
            reason = decision.reason.name(),
            "Moved"
        );
        self.emit(
            TraceEvent::new(self.turn, "move")
                .at(decision.next)
                .with_detail(decision.reason.name()),
        );

        if let Some(hazard) = self.layout.hazard_at(self.position) {
            self.finish(EpisodeStatus::Lost(hazard.into()));
        } else if self.has_gold && self.position == self.layout.start() {
            self.finish(EpisodeStatus::Won);
        }

        if self.status.is_terminal() {
            StepOutcome::Finished(self.status)
        } else {
            StepOutcome::Moved(decision.next)
        }
    }

    /// Undo the most recent move. Returns `false` when there is nothing to undo or the episode
    /// is over.
    ///
    /// Only the position is restored; knowledge and the gold flag are kept.
    pub fn back(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        let Some(previous) = self.history.pop() else {
            return false;
        };
        self.position = previous;
        tracing::debug!(cell = %previous, "Stepped back");
        self.emit(TraceEvent::new(self.turn, "back").at(previous));
        true
    }

    /// Step until the episode ends, the policy runs out of moves, or `max_turns` turns were
    /// played.
    pub fn run(&mut self, max_turns: u64) -> RunSummary {
        let mut turns = 0;
        let mut stalled = false;
        while turns < max_turns && !self.is_terminal() {
            turns += 1;
            if self.step() == StepOutcome::Stayed {
                stalled = true;
                break;
            }
        }
        RunSummary {
            turns,
            status: self.status,
            hit_turn_cap: !stalled && !self.is_terminal(),
        }
    }

    fn sense(&mut self) {
        let cell = self.position;
        let Some(percepts) = self.percepts.get(cell) else {
            return;
        };

        if !self.knowledge.is_visited(cell) {
            let obs = self.knowledge.observe(cell, percepts);
            self.emit(
                TraceEvent::new(self.turn, "observe")
                    .at(cell)
                    .with_detail(percept_detail(percepts)),
            );
            self.trace_observation(&obs);
        }

        if percepts.glitter && !self.has_gold {
            self.has_gold = true;
            tracing::info!(cell = %cell, turn = self.turn, "Picked up the gold");
        }

        if self.is_trapped() {
            self.finish(EpisodeStatus::Lost(LossCause::Trapped));
        }
    }

    /// No safe cell can reach a safe, unvisited cell while the agent is still empty-handed and
    /// away from the start.
    ///
    /// Checked on every turn, not only on first visits: the frontier can empty out while the
    /// agent is walking back over known cells.
    fn is_trapped(&self) -> bool {
        if self.has_gold || self.position == self.layout.start() {
            return false;
        }
        let frontier = self.knowledge.frontier();
        if !frontier.is_empty() {
            return false;
        }
        let safe = self.knowledge.safe_cells();
        let reachable = safe
            .iter()
            .any(|cell| is_reachable(cell, Target::AnyOf(&frontier), &safe));
        !reachable
    }

    fn decide(&mut self) -> Option<Decision> {
        let ctx = DecisionContext {
            grid: self.layout.grid(),
            position: self.position,
            start: self.layout.start(),
            has_gold: self.has_gold,
            knowledge: &self.knowledge,
        };
        self.policy.decide(&ctx, &mut self.rng)
    }

    /// Ask the policy, and never accept the monster's cell as the next step.
    fn decide_guarded(&mut self) -> Option<Decision> {
        let decision = self.decide()?;
        let Some(monster) = self.layout.monster() else {
            return Some(decision);
        };
        if decision.next != monster {
            return Some(decision);
        }

        self.knowledge.force_danger(monster, Hazard::Monster);
        tracing::warn!(cell = %monster, turn = self.turn, "Refused to step onto the monster");
        self.emit(TraceEvent::new(self.turn, "guard").at(monster));

        self.decide().filter(|retry| retry.next != monster)
    }

    fn finish(&mut self, status: EpisodeStatus) {
        self.status = status;
        let tag = match status {
            EpisodeStatus::Won => "won",
            _ => "lost",
        };
        tracing::info!(turn = self.turn, cell = %self.position, %status, "Episode over");
        self.emit(
            TraceEvent::new(self.turn, tag)
                .at(self.position)
                .with_detail(status.to_string()),
        );
    }

    fn trace_observation(&mut self, obs: &Observation) {
        if self.trace.is_none() {
            return;
        }
        for deduction in &obs.deductions {
            let tag = match deduction.class {
                Classification::Danger(_) => "infer_danger",
                _ => "infer_safe",
            };
            self.emit(
                TraceEvent::new(self.turn, tag)
                    .at(deduction.cell)
                    .with_detail(deduction.rule.name()),
            );
        }
    }

    fn emit(&mut self, event: TraceEvent) {
        if let Some(sink) = self.trace.as_mut() {
            sink.emit(event);
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed the episode RNG was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn has_gold(&self) -> bool {
        self.has_gold
    }

    pub fn status(&self) -> EpisodeStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.status, EpisodeStatus::Lost(_))
    }

    pub fn is_victory(&self) -> bool {
        self.status == EpisodeStatus::Won
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn history(&self) -> &[Cell] {
        &self.history
    }

    pub fn classification(&self, cell: Cell) -> Option<Classification> {
        self.knowledge.classification(cell)
    }

    /// Percepts the agent recorded on `cell`, `None` if it was never visited.
    pub fn percepts_at(&self, cell: Cell) -> Option<PerceptSet> {
        self.knowledge.percepts(cell)
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Ground truth. The agent never reads this for its decisions except in the safety guard.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn snapshot(&self) -> EpisodeSnapshot {
        EpisodeSnapshot::capture(self)
    }
}

fn percept_detail(percepts: PerceptSet) -> String {
    let cues: Vec<&str> = [
        (percepts.stench, "stench"),
        (percepts.breeze, "breeze"),
        (percepts.glitter, "glitter"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();
    if cues.is_empty() {
        "none".to_owned()
    } else {
        cues.join(",")
    }
}
