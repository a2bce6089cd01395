#![cfg(feature = "serde")]

use wumpus_nav::{find_path, Cell, CellSet, Direction, Grid, GridPath};

#[test]
fn grid_path_roundtrips_via_serde() {
    let traversable = CellSet::full(Grid::new(4));
    let path = find_path(Cell::new(0, 3), Cell::new(3, 0), &traversable).expect("path");

    let json = serde_json::to_string(&path).expect("serialize path");
    let back: GridPath = serde_json::from_str(&json).expect("deserialize path");

    assert_eq!(path, back);
}

#[test]
fn cell_and_direction_roundtrip_via_serde() {
    let json = serde_json::to_string(&(Cell::new(2, 1), Direction::West)).expect("serialize");
    let back: (Cell, Direction) = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, (Cell::new(2, 1), Direction::West));
}
