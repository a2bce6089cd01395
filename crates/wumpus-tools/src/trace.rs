#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use wumpus_nav::Cell;

/// One thing that happened during a turn: an observation, an inference, a move.
///
/// `cell` is where it happened, `detail` a short free-form note (percepts, rule name, outcome).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub turn: u64,
    pub tag: Cow<'static, str>,
    pub cell: Option<Cell>,
    pub detail: Option<Cow<'static, str>>,
}

impl TraceEvent {
    pub fn new(turn: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            turn,
            tag: tag.into(),
            cell: None,
            detail: None,
        }
    }

    pub fn at(mut self, cell: Cell) -> Self {
        self.cell = Some(cell);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<Cow<'static, str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Sink whose events stay readable by the caller after the sink is handed to an episode.
#[derive(Debug, Clone, Default)]
pub struct SharedTraceSink(Rc<RefCell<TraceLog>>);

impl SharedTraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> TraceLog {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TraceSink for SharedTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TraceEvent> + 'a {
        self.events.iter().filter(move |e| e.tag == tag)
    }
}
