//! Knowledge base and propositional inference over observed percepts.
//!
//! Every cell carries exactly one [`Classification`]. Cells only ever move out of
//! `Unknown`; a rule that would flip a `Safe` cell to `Danger` (or the reverse) leaves the
//! cell alone and is counted as a contradiction instead. The one sanctioned override is
//! [`KnowledgeBase::force_danger`], used by the turn controller's safety guard.
//!
//! `observe` applies, in order:
//!
//! 1. the observed cell becomes visited and safe;
//! 2. no stench and no breeze: every unvisited neighbour is safe;
//!
//! and then repeats until nothing changes:
//!
//! 3. elimination: a cue whose cell has exactly one neighbour not proven safe pins the hazard
//!    on that neighbour;
//! 4. convergence: an unknown cell next to two or more cells with the same cue is dangerous;
//! 5. if no monster is located yet, the first stench-convergence cell is taken as the monster
//!    and its pit-free neighbours become safe;
//! 6. with the monster located, every other pit-free neighbour of a stench cell is safe.
//!
//! "Pit-free" is decided from evidence only: the cell was visited, or one of its observed
//! neighbours reported no breeze. The ground-truth layout is never consulted.

use serde::Serialize;
use wumpus_nav::{Cell, CellSet, Grid};

use crate::layout::Hazard;
use crate::percept::PerceptSet;

/// The agent's belief about one cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    #[default]
    Unknown,
    Safe,
    Danger(Hazard),
}

impl Classification {
    pub fn is_safe(self) -> bool {
        self == Classification::Safe
    }

    pub fn is_danger(self) -> bool {
        matches!(self, Classification::Danger(_))
    }

    pub fn is_unknown(self) -> bool {
        self == Classification::Unknown
    }
}

/// Which inference produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    NoDanger,
    Elimination,
    Convergence,
    MonsterNeighborhood,
    ExplainedStench,
}

impl Rule {
    pub fn name(self) -> &'static str {
        match self {
            Rule::NoDanger => "no_danger",
            Rule::Elimination => "elimination",
            Rule::Convergence => "convergence",
            Rule::MonsterNeighborhood => "monster_neighborhood",
            Rule::ExplainedStench => "explained_stench",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deduction {
    pub cell: Cell,
    pub class: Classification,
    pub rule: Rule,
}

/// Everything a single [`KnowledgeBase::observe`] call concluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    pub deductions: Vec<Deduction>,
    /// Set when this observation fixed the monster's location.
    pub monster_located: Option<Cell>,
}

impl Observation {
    pub fn is_empty(&self) -> bool {
        self.deductions.is_empty() && self.monster_located.is_none()
    }

    pub fn safe(&self) -> impl Iterator<Item = Cell> + '_ {
        self.deductions
            .iter()
            .filter(|d| d.class.is_safe())
            .map(|d| d.cell)
    }

    pub fn danger(&self) -> impl Iterator<Item = (Cell, Hazard)> + '_ {
        self.deductions.iter().filter_map(|d| match d.class {
            Classification::Danger(hazard) => Some((d.cell, hazard)),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct CellKnowledge {
    class: Classification,
    observed: Option<PerceptSet>,
}

/// Visited cells with their percepts, plus the classification of every cell.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    grid: Grid,
    cells: Vec<CellKnowledge>,
    monster: Option<Cell>,
    contradictions: u32,
    corrections: u32,
}

impl KnowledgeBase {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            cells: vec![CellKnowledge::default(); grid.len()],
            monster: None,
            contradictions: 0,
            corrections: 0,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    fn entry(&self, cell: Cell) -> Option<&CellKnowledge> {
        self.grid.index(cell).map(|idx| &self.cells[idx])
    }

    pub fn classification(&self, cell: Cell) -> Option<Classification> {
        self.entry(cell).map(|k| k.class)
    }

    pub fn is_safe(&self, cell: Cell) -> bool {
        self.entry(cell).is_some_and(|k| k.class.is_safe())
    }

    pub fn is_danger(&self, cell: Cell) -> bool {
        self.entry(cell).is_some_and(|k| k.class.is_danger())
    }

    pub fn is_unknown(&self, cell: Cell) -> bool {
        self.entry(cell).is_some_and(|k| k.class.is_unknown())
    }

    pub fn is_visited(&self, cell: Cell) -> bool {
        self.entry(cell).is_some_and(|k| k.observed.is_some())
    }

    /// Percepts recorded when `cell` was visited.
    pub fn percepts(&self, cell: Cell) -> Option<PerceptSet> {
        self.entry(cell).and_then(|k| k.observed)
    }

    /// The located monster cell, if any.
    pub fn monster(&self) -> Option<Cell> {
        self.monster
    }

    /// Rules that disagreed with an earlier classification and were ignored.
    pub fn contradictions(&self) -> u32 {
        self.contradictions
    }

    /// Classifications overridden through [`KnowledgeBase::force_danger`].
    pub fn corrections(&self) -> u32 {
        self.corrections
    }

    fn collect(&self, keep: impl Fn(&CellKnowledge) -> bool) -> CellSet {
        let cells = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, k)| keep(k))
            .map(|(idx, _)| self.grid.cell_at(idx));
        CellSet::from_cells(self.grid, cells)
    }

    pub fn safe_cells(&self) -> CellSet {
        self.collect(|k| k.class.is_safe())
    }

    pub fn danger_cells(&self) -> CellSet {
        self.collect(|k| k.class.is_danger())
    }

    pub fn unknown_cells(&self) -> CellSet {
        self.collect(|k| k.class.is_unknown())
    }

    pub fn visited_cells(&self) -> CellSet {
        self.collect(|k| k.observed.is_some())
    }

    /// Safe cells not visited yet.
    pub fn frontier(&self) -> CellSet {
        self.collect(|k| k.class.is_safe() && k.observed.is_none())
    }

    /// Classify an unknown cell as safe without observing it (the start cell).
    pub fn assume_safe(&mut self, cell: Cell) -> bool {
        let Some(idx) = self.grid.index(cell) else {
            return false;
        };
        if !self.cells[idx].class.is_unknown() {
            return false;
        }
        self.cells[idx].class = Classification::Safe;
        true
    }

    /// Record the percepts sensed on `cell` and run inference to a fixed point.
    ///
    /// Idempotent: observing an already visited cell changes nothing.
    pub fn observe(&mut self, cell: Cell, percepts: PerceptSet) -> Observation {
        let mut obs = Observation::default();
        let Some(idx) = self.grid.index(cell) else {
            return obs;
        };
        if self.cells[idx].observed.is_some() {
            return obs;
        }

        self.cells[idx].observed = Some(percepts);
        match self.cells[idx].class {
            Classification::Unknown => self.cells[idx].class = Classification::Safe,
            Classification::Safe => {}
            Classification::Danger(hazard) => {
                self.contradictions += 1;
                tracing::warn!(cell = %cell, ?hazard, "Visited a cell classified as dangerous");
            }
        }
        tracing::debug!(
            cell = %cell,
            stench = percepts.stench,
            breeze = percepts.breeze,
            glitter = percepts.glitter,
            "Observed cell"
        );

        if !percepts.has_danger_cue() {
            let grid = self.grid;
            for n in grid.neighbors(cell) {
                if !self.is_visited(n) {
                    self.mark_safe(n, Rule::NoDanger, &mut obs);
                }
            }
        }

        self.infer(&mut obs);
        obs
    }

    /// Classify `cell` as `hazard` regardless of its current class.
    ///
    /// Overriding a `Safe` cell is counted in [`KnowledgeBase::corrections`]. Forcing the
    /// monster also relocates it.
    pub fn force_danger(&mut self, cell: Cell, hazard: Hazard) -> bool {
        let Some(idx) = self.grid.index(cell) else {
            return false;
        };
        let previous = self.cells[idx].class;
        if previous == Classification::Danger(hazard) {
            return false;
        }
        if !previous.is_unknown() {
            self.corrections += 1;
            tracing::warn!(cell = %cell, ?previous, ?hazard, "Overriding classification");
        }
        self.cells[idx].class = Classification::Danger(hazard);
        if hazard == Hazard::Monster {
            self.monster = Some(cell);
        }
        true
    }

    fn infer(&mut self, obs: &mut Observation) {
        loop {
            let before = (obs.deductions.len(), self.monster);

            self.eliminate(obs);

            let monster_candidates = self.convergence_candidates(Hazard::Monster);
            let pit_candidates = self.convergence_candidates(Hazard::Pit);
            for &cell in &monster_candidates {
                self.mark_danger(cell, Hazard::Monster, Rule::Convergence, obs);
            }
            for &cell in &pit_candidates {
                self.mark_danger(cell, Hazard::Pit, Rule::Convergence, obs);
            }

            if self.monster.is_none() {
                if let Some(&cell) = monster_candidates.first() {
                    self.locate_monster(cell, obs);
                    self.clear_monster_neighborhood(cell, obs);
                }
            }

            self.explain_stenches(obs);

            if (obs.deductions.len(), self.monster) == before {
                break;
            }
        }
    }

    fn observed(&self) -> impl Iterator<Item = (Cell, PerceptSet)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(idx, k)| k.observed.map(|p| (self.grid.cell_at(idx), p)))
    }

    fn eliminate(&mut self, obs: &mut Observation) {
        let grid = self.grid;
        let cued: Vec<(Cell, PerceptSet)> = self
            .observed()
            .filter(|(_, p)| p.has_danger_cue())
            .collect();

        for (cell, percepts) in cued {
            for hazard in [Hazard::Pit, Hazard::Monster] {
                if !percepts.cue(hazard) {
                    continue;
                }
                let open: Vec<Cell> = grid
                    .neighbors(cell)
                    .filter(|n| !self.is_safe(*n))
                    .collect();
                let &[only] = open.as_slice() else {
                    continue;
                };

                self.mark_danger(only, hazard, Rule::Elimination, obs);
                if hazard == Hazard::Monster
                    && self.classification(only) == Some(Classification::Danger(Hazard::Monster))
                {
                    self.locate_monster(only, obs);
                }
            }
        }
    }

    /// Unknown cells adjacent to more than one observed cell carrying `hazard`'s cue.
    fn convergence_candidates(&self, hazard: Hazard) -> Vec<Cell> {
        let grid = self.grid;
        let mut counts = vec![0u8; grid.len()];
        for (cell, percepts) in self.observed() {
            if !percepts.cue(hazard) {
                continue;
            }
            for n in grid.neighbors(cell) {
                if let Some(idx) = grid.index(n) {
                    if self.cells[idx].class.is_unknown() {
                        counts[idx] = counts[idx].saturating_add(1);
                    }
                }
            }
        }
        counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 1)
            .map(|(idx, _)| grid.cell_at(idx))
            .collect()
    }

    fn locate_monster(&mut self, cell: Cell, obs: &mut Observation) {
        match self.monster {
            None => {
                self.monster = Some(cell);
                obs.monster_located = Some(cell);
                tracing::debug!(cell = %cell, "Located monster");
            }
            Some(known) if known != cell => {
                self.contradictions += 1;
                tracing::warn!(known = %known, candidate = %cell, "Second monster location ignored");
            }
            Some(_) => {}
        }
    }

    fn clear_monster_neighborhood(&mut self, monster: Cell, obs: &mut Observation) {
        let grid = self.grid;
        let clear: Vec<Cell> = grid
            .neighbors(monster)
            .filter(|n| !self.is_danger(*n) && self.is_pit_free(*n))
            .collect();
        for n in clear {
            self.mark_safe(n, Rule::MonsterNeighborhood, obs);
        }
    }

    fn explain_stenches(&mut self, obs: &mut Observation) {
        let Some(monster) = self.monster else {
            return;
        };
        let grid = self.grid;
        let clear: Vec<Cell> = self
            .observed()
            .filter(|(_, p)| p.stench)
            .flat_map(|(cell, _)| grid.neighbors(cell))
            .filter(|n| *n != monster && !self.is_danger(*n) && self.is_pit_free(*n))
            .collect();
        for n in clear {
            self.mark_safe(n, Rule::ExplainedStench, obs);
        }
    }

    fn is_pit_free(&self, cell: Cell) -> bool {
        self.is_visited(cell)
            || self
                .grid
                .neighbors(cell)
                .any(|n| self.percepts(n).is_some_and(|p| !p.breeze))
    }

    fn mark_safe(&mut self, cell: Cell, rule: Rule, obs: &mut Observation) -> bool {
        let Some(idx) = self.grid.index(cell) else {
            return false;
        };
        match self.cells[idx].class {
            Classification::Unknown => {
                self.cells[idx].class = Classification::Safe;
                obs.deductions.push(Deduction {
                    cell,
                    class: Classification::Safe,
                    rule,
                });
                tracing::debug!(cell = %cell, rule = rule.name(), "Inferred safe");
                true
            }
            Classification::Safe => false,
            Classification::Danger(hazard) => {
                self.contradictions += 1;
                tracing::warn!(
                    cell = %cell,
                    rule = rule.name(),
                    ?hazard,
                    "Rule marks a dangerous cell safe; keeping danger"
                );
                false
            }
        }
    }

    fn mark_danger(
        &mut self,
        cell: Cell,
        hazard: Hazard,
        rule: Rule,
        obs: &mut Observation,
    ) -> bool {
        let Some(idx) = self.grid.index(cell) else {
            return false;
        };
        match self.cells[idx].class {
            Classification::Unknown => {
                let class = Classification::Danger(hazard);
                self.cells[idx].class = class;
                obs.deductions.push(Deduction { cell, class, rule });
                tracing::debug!(cell = %cell, rule = rule.name(), ?hazard, "Inferred danger");
                true
            }
            Classification::Danger(_) => false,
            Classification::Safe => {
                self.contradictions += 1;
                tracing::warn!(
                    cell = %cell,
                    rule = rule.name(),
                    ?hazard,
                    "Rule marks a safe cell dangerous; keeping safe"
                );
                false
            }
        }
    }
}
