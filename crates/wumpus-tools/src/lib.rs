//! Turn traces for replaying and debugging wumpus episodes.
//!
//! Rendering is left to the binary; this crate only records events.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{SharedTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink};
