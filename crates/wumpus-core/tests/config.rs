use std::io::Write;

use wumpus_core::{generate_layout, Episode, GameConfig, GenerateError, SplitMix64};
use wumpus_nav::{Cell, Grid};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn defaults_match_the_classic_board() {
    let config = GameConfig::default();

    assert_eq!(config.grid_size, 4);
    assert_eq!(config.num_pits, 2);
    assert_eq!(config.start_cell(), Cell::new(0, 3));
    assert_eq!(config.max_turns, 200);
    assert!(config.validate().is_ok());
}

#[test]
fn loads_partial_yaml_over_defaults() {
    let file = write_config("grid_size: 6\nnum_pits: 4\nseed: 42\n");

    let config = GameConfig::load(file.path()).unwrap();

    assert_eq!(config.grid_size, 6);
    assert_eq!(config.num_pits, 4);
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.max_generation_attempts, 10_000);
    assert_eq!(config.start_cell(), Cell::new(0, 5));

    let mapgen = config.mapgen();
    assert_eq!(mapgen.grid_size, 6);
    assert_eq!(mapgen.start, Cell::new(0, 5));
}

#[test]
fn loads_explicit_start() {
    let file = write_config("start:\n  x: 2\n  y: 1\n");

    let config = GameConfig::load(file.path()).unwrap();

    assert_eq!(config.start_cell(), Cell::new(2, 1));
}

#[test]
fn rejects_invalid_values_with_context() {
    let file = write_config("grid_size: 1\n");

    let err = GameConfig::load(file.path()).unwrap_err();

    assert!(err.to_string().contains("Invalid config"));
    assert_eq!(
        err.downcast_ref::<GenerateError>(),
        Some(&GenerateError::GridTooSmall { grid_size: 1 })
    );
}

#[test]
fn rejects_start_outside_grid() {
    let config = GameConfig {
        start: Some(Cell::new(5, 0)),
        ..GameConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(GenerateError::StartOutOfBounds { .. })
    ));
}

#[test]
fn rejects_malformed_yaml() {
    let file = write_config("grid_size: [not a number\n");
    let err = GameConfig::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wumpus.yaml");

    assert_eq!(GameConfig::load_or_default(&path).unwrap(), GameConfig::default());
    assert!(GameConfig::load(&path).is_err());
}

#[test]
fn rejects_grid_too_large_to_index() {
    let config = GameConfig {
        grid_size: 50_000,
        ..GameConfig::default()
    };

    assert_eq!(
        config.validate(),
        Err(GenerateError::GridTooLarge {
            grid_size: 50_000,
            max: Grid::MAX_SIZE,
        })
    );
    assert!(matches!(
        Episode::new(config.clone()),
        Err(GenerateError::GridTooLarge { .. })
    ));

    let mut rng = SplitMix64::new(1);
    assert!(matches!(
        generate_layout(&config.mapgen(), &mut rng),
        Err(GenerateError::GridTooLarge { .. })
    ));
}
