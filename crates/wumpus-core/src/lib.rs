//! Knowledge-based wumpus agent: layouts, percepts, inference and turn control.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod episode;
pub mod error;
pub mod knowledge;
pub mod layout;
pub mod manual;
pub mod mapgen;
pub mod percept;
pub mod policy;
pub mod rng;
pub mod snapshot;

pub use config::GameConfig;
pub use episode::{Episode, EpisodeStatus, LossCause, RunSummary, StepOutcome};
pub use error::{GenerateError, LayoutError};
pub use knowledge::{Classification, Deduction, KnowledgeBase, Observation, Rule};
pub use layout::{Hazard, Layout};
pub use manual::{Action, ManualGame, ManualStatus};
pub use mapgen::{generate_layout, MapGenConfig};
pub use percept::{PerceptSet, PerceptTable};
pub use policy::{Decision, DecisionContext, ExplorerPolicy, MoveReason, Policy};
pub use rng::{DeterministicRng, SplitMix64};
pub use snapshot::{CellView, EpisodeSnapshot};
