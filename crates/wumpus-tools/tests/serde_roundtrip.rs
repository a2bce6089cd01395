#![cfg(feature = "serde")]

use wumpus_nav::Cell;
use wumpus_tools::{TraceEvent, TraceLog};

#[test]
fn trace_log_roundtrips_via_serde() {
    let mut log = TraceLog::default();
    log.push(TraceEvent::new(3, "guard").at(Cell::new(1, 1)));
    log.push(TraceEvent::new(4, "lost").with_detail("pit"));

    let json = serde_json::to_string(&log).expect("serialize trace");
    let back: TraceLog = serde_json::from_str(&json).expect("deserialize trace");

    assert_eq!(back, log);
}
