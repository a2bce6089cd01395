//! Game configuration loading and validation.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wumpus_nav::{Cell, Grid};

use crate::error::GenerateError;
use crate::mapgen::MapGenConfig;

/// Episode configuration, usually loaded from a `wumpus.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid
    pub grid_size: u32,

    /// Number of pits placed per layout
    pub num_pits: usize,

    /// Start cell; defaults to the bottom-left corner
    pub start: Option<Cell>,

    /// Rejection-sampling budget for the map generator
    pub max_generation_attempts: u32,

    /// Turn cap used by `Episode::run`
    pub max_turns: u64,

    /// RNG seed; `None` asks for a fresh seed per process
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 4,
            num_pits: 2,
            start: None,
            max_generation_attempts: 10_000,
            max_turns: 200,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_size.clamp(1, Grid::MAX_SIZE))
    }

    pub fn start_cell(&self) -> Cell {
        self.start
            .unwrap_or_else(|| Cell::new(0, self.grid_size.saturating_sub(1) as i32))
    }

    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.grid_size < 2 {
            return Err(GenerateError::GridTooSmall {
                grid_size: self.grid_size,
            });
        }
        if self.grid_size > Grid::MAX_SIZE {
            return Err(GenerateError::GridTooLarge {
                grid_size: self.grid_size,
                max: Grid::MAX_SIZE,
            });
        }
        let start = self.start_cell();
        if !self.grid().contains(start) {
            return Err(GenerateError::StartOutOfBounds {
                start,
                grid_size: self.grid_size,
            });
        }
        Ok(())
    }

    pub fn mapgen(&self) -> MapGenConfig {
        MapGenConfig {
            grid_size: self.grid_size,
            start: self.start_cell(),
            num_pits: self.num_pits,
            max_attempts: self.max_generation_attempts,
        }
    }
}
