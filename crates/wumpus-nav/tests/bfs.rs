use wumpus_nav::{find_path, is_reachable, Cell, CellSet, Grid, GridPath, PathQuery, Target};

fn open_grid(size: u32) -> CellSet {
    CellSet::full(Grid::new(size))
}

#[test]
fn path_length_matches_manhattan_distance_on_open_grid() {
    let traversable = open_grid(6);
    let start = Cell::new(0, 0);
    let goal = Cell::new(5, 3);

    let path = find_path(start, goal, &traversable).expect("path should exist");

    assert_eq!(path.start(), Some(start));
    assert_eq!(path.goal(), Some(goal));
    assert_eq!(path.hops(), start.manhattan(goal) as usize);
    for pair in path.cells.windows(2) {
        assert!(pair[0].is_adjacent(pair[1]));
    }
}

#[test]
fn path_detours_around_blocked_wall() {
    let grid = Grid::new(5);
    let mut traversable = CellSet::full(grid);
    // Vertical wall at x = 2 with a single gap at y = 4.
    for y in 0..4 {
        traversable.remove(Cell::new(2, y));
    }

    let path = find_path(Cell::new(0, 0), Cell::new(4, 0), &traversable).expect("path");

    // Down to the gap, across, and back up.
    assert_eq!(path.hops(), 4 + 4 + 4);
    assert!(path.cells.contains(&Cell::new(2, 4)));
    assert!(path.cells.iter().skip(1).all(|c| traversable.contains(*c)));
}

#[test]
fn returns_none_when_goal_is_walled_off() {
    let grid = Grid::new(4);
    let mut traversable = CellSet::full(grid);
    for y in 0..4 {
        traversable.remove(Cell::new(1, y));
    }

    assert!(find_path(Cell::new(0, 0), Cell::new(3, 3), &traversable).is_none());
    assert!(!is_reachable(Cell::new(0, 0), Cell::new(3, 3), &traversable));
}

#[test]
fn untraversable_goal_is_not_reached() {
    let grid = Grid::new(3);
    let mut traversable = CellSet::full(grid);
    traversable.remove(Cell::new(2, 2));

    assert!(find_path(Cell::new(0, 0), Cell::new(2, 2), &traversable).is_none());
}

#[test]
fn start_is_expanded_even_when_not_traversable() {
    let grid = Grid::new(3);
    let mut traversable = CellSet::full(grid);
    traversable.remove(Cell::new(0, 0));

    let path = find_path(Cell::new(0, 0), Cell::new(0, 2), &traversable).expect("path");
    assert_eq!(path.hops(), 2);
}

#[test]
fn start_on_goal_yields_single_cell_path() {
    let traversable = open_grid(3);
    let path = find_path(Cell::new(1, 1), Cell::new(1, 1), &traversable).expect("path");

    assert_eq!(path.cells, vec![Cell::new(1, 1)]);
    assert_eq!(path.next_step(), None);
}

#[test]
fn start_outside_grid_has_no_path() {
    let traversable = open_grid(3);
    assert!(find_path(Cell::new(-1, 0), Cell::new(1, 1), &traversable).is_none());
}

#[test]
fn target_set_reaches_nearest_member_by_hops() {
    let grid = Grid::new(5);
    let traversable = CellSet::full(grid);
    let targets = CellSet::from_cells(grid, [Cell::new(4, 4), Cell::new(0, 2), Cell::new(3, 0)]);

    let path = find_path(Cell::new(0, 0), &targets, &traversable).expect("path");

    assert_eq!(path.goal(), Some(Cell::new(0, 2)));
    assert_eq!(path.hops(), 2);
}

#[test]
fn empty_target_set_is_never_reached() {
    let grid = Grid::new(4);
    let traversable = CellSet::full(grid);
    let targets = CellSet::new(grid);

    assert!(find_path(Cell::new(0, 0), &targets, &traversable).is_none());
}

#[test]
fn reused_query_matches_one_shot_search() {
    let grid = Grid::new(8);
    let mut traversable = CellSet::full(grid);
    for x in 0..7 {
        traversable.remove(Cell::new(x, 4));
    }

    let mut query = PathQuery::new();
    let mut out = GridPath::new(Vec::new());
    for _ in 0..3 {
        assert!(query.find_path_into(
            Cell::new(0, 0),
            Target::Cell(Cell::new(0, 7)),
            &traversable,
            &mut out
        ));
        let fresh = find_path(Cell::new(0, 0), Cell::new(0, 7), &traversable).expect("path");
        assert_eq!(out, fresh);
    }
}

#[test]
fn search_is_deterministic_for_same_input() {
    let traversable = open_grid(10);
    let a = find_path(Cell::new(1, 1), Cell::new(8, 8), &traversable).expect("path");
    let b = find_path(Cell::new(1, 1), Cell::new(8, 8), &traversable).expect("path");
    assert_eq!(a, b);
}
