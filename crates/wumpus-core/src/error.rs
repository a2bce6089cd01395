//! Error types for layout construction and generation.

use thiserror::Error;
use wumpus_nav::Cell;

/// Why a layout could not be generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("grid size {grid_size} is too small (minimum is 2)")]
    GridTooSmall { grid_size: u32 },

    #[error("grid size {grid_size} is too large (maximum is {max})")]
    GridTooLarge { grid_size: u32, max: u32 },

    #[error("start cell {start} lies outside the {grid_size}x{grid_size} grid")]
    StartOutOfBounds { start: Cell, grid_size: u32 },

    #[error(
        "configuration is infeasible: {required} distinct cells are needed outside the start zone but only {available} exist"
    )]
    Infeasible { required: usize, available: usize },

    #[error("no solvable layout found after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
}

/// A hand-built layout violates a placement invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("cell {0} lies outside the grid")]
    OutOfBounds(Cell),

    #[error("cell {0} is the start cell or adjacent to it")]
    InStartZone(Cell),

    #[error("cell {0} holds more than one special item")]
    Overlap(Cell),
}
