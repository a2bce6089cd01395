use wumpus_core::{Classification, Episode, EpisodeStatus, GameConfig, Layout};
use wumpus_nav::{Cell, Grid};

fn episode() -> Episode {
    let layout = Layout::new(
        Grid::new(4),
        Cell::new(0, 3),
        Cell::new(3, 0),
        vec![Cell::new(0, 0), Cell::new(1, 0)],
        Cell::new(2, 3),
    )
    .unwrap();
    let config = GameConfig {
        seed: Some(7),
        ..GameConfig::default()
    };
    Episode::with_layout(config, layout)
}

#[test]
fn snapshot_mirrors_episode_state() {
    let mut episode = episode();
    episode.step();

    let snapshot = episode.snapshot();

    assert_eq!(snapshot.grid_size, 4);
    assert_eq!(snapshot.turn, 1);
    assert_eq!(snapshot.agent, episode.position());
    assert_eq!(snapshot.status, EpisodeStatus::Exploring);
    assert_eq!(snapshot.cells.len(), 16);

    let start = snapshot.view(Cell::new(0, 3)).unwrap();
    assert_eq!(start.class, Classification::Safe);
    assert!(start.percepts.is_some());
    assert_eq!(snapshot.view(Cell::new(3, 3)).unwrap().percepts, None);
}

#[test]
fn snapshot_serializes_to_json() {
    let mut episode = episode();
    episode.step();

    let value = serde_json::to_value(episode.snapshot()).unwrap();

    assert_eq!(value["grid_size"], 4);
    assert_eq!(value["status"]["status"], "exploring");
    assert_eq!(value["start"]["x"], 0);
    assert_eq!(value["start"]["y"], 3);
    assert_eq!(value["layout"]["monster"]["x"], 3);
    assert_eq!(value["cells"].as_array().unwrap().len(), 16);
    assert_eq!(value["cells"][12]["class"], "safe");
}

#[test]
fn terminal_status_serializes_with_cause() {
    let value = serde_json::to_value(EpisodeStatus::Lost(wumpus_core::LossCause::Pit)).unwrap();
    assert_eq!(value, serde_json::json!({"status": "lost", "cause": "pit"}));
}
