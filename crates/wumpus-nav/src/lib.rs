//! Square-grid geometry and breadth-first path queries.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod grid;
pub mod search;

pub use grid::{Cell, CellSet, Direction, Grid};
pub use search::{find_path, is_reachable, GridPath, PathQuery, Target};
