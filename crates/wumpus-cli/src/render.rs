//! Plain-text spectator view.
//!
//! Every cell is drawn as two characters: what is really there (agent, monster, pit, gold)
//! followed by what the agent believes about it.

use std::fmt::Write;

use wumpus_core::{Classification, EpisodeSnapshot, ManualGame, PerceptSet};
use wumpus_nav::Cell;

pub const LEGEND: &str =
    "A agent  W monster  P pit  G gold | . visited  o safe  ! danger  ? unknown";

pub fn board(snapshot: &EpisodeSnapshot) -> String {
    let size = snapshot.grid_size as i32;
    let mut out = String::new();

    for y in 0..size {
        for x in 0..size {
            let cell = Cell::new(x, y);
            let Some(view) = snapshot.view(cell) else {
                continue;
            };
            let truth = truth_glyph(snapshot, cell);
            let belief = match view.class {
                Classification::Safe if view.percepts.is_some() => '.',
                Classification::Safe => 'o',
                Classification::Danger(_) => '!',
                Classification::Unknown => '?',
            };
            let _ = write!(out, "{truth}{belief} ");
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    out
}

fn truth_glyph(snapshot: &EpisodeSnapshot, cell: Cell) -> char {
    let layout = &snapshot.layout;
    if snapshot.agent == cell {
        'A'
    } else if layout.monster() == Some(cell) {
        'W'
    } else if layout.is_pit(cell) {
        'P'
    } else if layout.gold() == cell && !snapshot.has_gold {
        'G'
    } else {
        ' '
    }
}

pub fn percepts(percepts: PerceptSet) -> String {
    let cues: Vec<&str> = [
        (percepts.stench, "stench"),
        (percepts.breeze, "breeze"),
        (percepts.glitter, "glitter"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();
    if cues.is_empty() {
        "nothing".to_owned()
    } else {
        cues.join(", ")
    }
}

pub fn manual_status(game: &ManualGame) -> String {
    format!(
        "hunter {} | senses {} | arrow {} | gold {} | score {}",
        game.hunter(),
        percepts(game.percepts()),
        if game.has_arrow() { "yes" } else { "no" },
        if game.has_gold() { "yes" } else { "no" },
        game.score(),
    )
}
