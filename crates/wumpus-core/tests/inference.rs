use wumpus_core::{
    Classification, Hazard, KnowledgeBase, Layout, PerceptSet, PerceptTable, Rule,
};
use wumpus_nav::{Cell, Grid};

fn c(x: i32, y: i32) -> Cell {
    Cell::new(x, y)
}

fn stench() -> PerceptSet {
    PerceptSet {
        stench: true,
        ..PerceptSet::NONE
    }
}

fn breeze() -> PerceptSet {
    PerceptSet {
        breeze: true,
        ..PerceptSet::NONE
    }
}

fn observe_from(kb: &mut KnowledgeBase, table: &PerceptTable, cell: Cell) {
    let percepts = table.get(cell).expect("cell in bounds");
    kb.observe(cell, percepts);
}

#[test]
fn quiet_cell_marks_unvisited_neighbours_safe() {
    let mut kb = KnowledgeBase::new(Grid::new(4));

    let obs = kb.observe(c(1, 1), PerceptSet::NONE);

    assert!(kb.is_visited(c(1, 1)));
    for n in [c(1, 0), c(2, 1), c(1, 2), c(0, 1)] {
        assert_eq!(kb.classification(n), Some(Classification::Safe), "{n}");
    }
    assert_eq!(obs.safe().count(), 4);
    assert!(obs.deductions.iter().all(|d| d.rule == Rule::NoDanger));
    assert!(kb.is_unknown(c(2, 2)));
}

#[test]
fn observing_twice_is_a_no_op() {
    let mut kb = KnowledgeBase::new(Grid::new(4));
    kb.observe(c(0, 3), PerceptSet::NONE);
    let before = kb.safe_cells();

    let obs = kb.observe(c(0, 3), breeze());

    assert!(obs.is_empty());
    assert_eq!(kb.percepts(c(0, 3)), Some(PerceptSet::NONE));
    assert_eq!(kb.safe_cells(), before);
}

#[test]
fn corner_cue_with_one_safe_neighbour_pins_the_other() {
    let mut kb = KnowledgeBase::new(Grid::new(4));
    kb.assume_safe(c(0, 1));

    let obs = kb.observe(c(0, 0), breeze());

    assert_eq!(
        kb.classification(c(1, 0)),
        Some(Classification::Danger(Hazard::Pit))
    );
    assert_eq!(obs.danger().collect::<Vec<_>>(), vec![(c(1, 0), Hazard::Pit)]);
    assert_eq!(obs.deductions[0].rule, Rule::Elimination);
    assert_eq!(kb.monster(), None);
}

#[test]
fn start_walk_marks_expected_cells_safe() {
    // Monster at (2,2) is diagonal to (1,3), so neither start-side cell senses anything.
    let grid = Grid::new(4);
    let layout = Layout::new(grid, c(0, 3), c(2, 2), vec![c(3, 0)], c(1, 1)).unwrap();
    let table = PerceptTable::build(&layout);
    let mut kb = KnowledgeBase::new(grid);

    observe_from(&mut kb, &table, c(0, 3));
    observe_from(&mut kb, &table, c(1, 3));

    for cell in [c(0, 2), c(1, 2), c(2, 3)] {
        assert!(kb.is_safe(cell), "{cell} should be safe");
    }
    assert!(kb.danger_cells().is_empty());
}

#[test]
fn stench_with_single_open_neighbour_locates_monster() {
    let grid = Grid::new(4);
    let layout = Layout::new(
        grid,
        c(0, 3),
        c(0, 1),
        vec![c(3, 0), c(3, 3)],
        c(1, 1),
    )
    .unwrap();
    let table = PerceptTable::build(&layout);
    let mut kb = KnowledgeBase::new(grid);

    observe_from(&mut kb, &table, c(0, 3));
    observe_from(&mut kb, &table, c(1, 3));
    assert!(kb.is_safe(c(1, 2)));

    let percepts = table.get(c(0, 2)).unwrap();
    assert!(percepts.stench);
    let obs = kb.observe(c(0, 2), percepts);

    assert_eq!(
        kb.classification(c(0, 1)),
        Some(Classification::Danger(Hazard::Monster))
    );
    assert_eq!(kb.monster(), Some(c(0, 1)));
    assert_eq!(obs.monster_located, Some(c(0, 1)));
    assert_eq!(kb.contradictions(), 0);
}

#[test]
fn converging_stenches_fix_monster_and_clear_explained_cells() {
    let mut kb = KnowledgeBase::new(Grid::new(4));
    kb.observe(c(0, 2), PerceptSet::NONE);
    kb.observe(c(0, 1), stench());
    assert!(kb.danger_cells().is_empty());

    let obs = kb.observe(c(1, 2), stench());

    assert_eq!(
        kb.classification(c(1, 1)),
        Some(Classification::Danger(Hazard::Monster))
    );
    assert!(obs
        .deductions
        .iter()
        .any(|d| d.cell == c(1, 1) && d.rule == Rule::Convergence));
    assert_eq!(obs.monster_located, Some(c(1, 1)));

    // Every other neighbour of a stench cell with no-breeze evidence is cleared.
    for cell in [c(0, 0), c(2, 2), c(1, 3)] {
        assert!(kb.is_safe(cell), "{cell} should be safe");
        assert!(
            obs.deductions
                .iter()
                .any(|d| d.cell == cell && d.rule == Rule::ExplainedStench),
            "{cell} should be cleared by the located monster"
        );
    }
    // No evidence about pits around (1,0) and (2,1).
    assert!(kb.is_unknown(c(1, 0)));
    assert!(kb.is_unknown(c(2, 1)));
    assert_eq!(kb.contradictions(), 0);
}

#[test]
fn located_monster_clears_its_pit_free_neighbours() {
    let mut kb = KnowledgeBase::new(Grid::new(4));
    kb.observe(c(0, 2), PerceptSet::NONE);
    kb.observe(c(0, 1), stench());
    // No breeze on (2,2) is the only evidence that (2,1) holds no pit.
    kb.observe(c(2, 2), stench());
    assert!(kb.is_unknown(c(2, 1)));
    assert_eq!(kb.monster(), None);

    let obs = kb.observe(c(1, 2), stench());

    assert_eq!(obs.monster_located, Some(c(1, 1)));
    let rule_for = |cell: Cell| {
        obs.deductions
            .iter()
            .find(|d| d.cell == cell)
            .map(|d| (d.class, d.rule))
    };
    assert_eq!(
        rule_for(c(2, 1)),
        Some((Classification::Safe, Rule::MonsterNeighborhood))
    );
    for cell in [c(0, 0), c(3, 2), c(2, 3), c(1, 3)] {
        assert_eq!(
            rule_for(cell),
            Some((Classification::Safe, Rule::ExplainedStench)),
            "{cell}"
        );
    }
    // Nothing rules out a pit on (1,0).
    assert!(kb.is_unknown(c(1, 0)));
    assert_eq!(kb.contradictions(), 0);
}

#[test]
fn converging_breezes_mark_a_pit() {
    let mut kb = KnowledgeBase::new(Grid::new(4));
    kb.assume_safe(c(1, 0));
    kb.assume_safe(c(0, 1));
    kb.observe(c(1, 0), breeze());
    kb.observe(c(0, 1), breeze());

    // (0,0) and (1,1) both sit next to two breezes.
    assert_eq!(
        kb.classification(c(0, 0)),
        Some(Classification::Danger(Hazard::Pit))
    );
    assert_eq!(
        kb.classification(c(1, 1)),
        Some(Classification::Danger(Hazard::Pit))
    );
    assert_eq!(kb.monster(), None);
}

#[test]
fn visiting_a_dangerous_cell_is_counted_not_overwritten() {
    let mut kb = KnowledgeBase::new(Grid::new(4));
    kb.assume_safe(c(0, 1));
    kb.observe(c(0, 0), breeze());
    assert!(kb.is_danger(c(1, 0)));

    kb.observe(c(1, 0), PerceptSet::NONE);

    assert_eq!(kb.contradictions(), 1);
    assert_eq!(
        kb.classification(c(1, 0)),
        Some(Classification::Danger(Hazard::Pit))
    );
    assert!(kb.is_visited(c(1, 0)));
}

#[test]
fn force_danger_overrides_safe_and_counts_correction() {
    let mut kb = KnowledgeBase::new(Grid::new(4));
    kb.observe(c(0, 3), PerceptSet::NONE);
    assert!(kb.is_safe(c(1, 3)));

    assert!(kb.force_danger(c(1, 3), Hazard::Monster));
    assert!(!kb.force_danger(c(1, 3), Hazard::Monster));

    assert_eq!(kb.corrections(), 1);
    assert_eq!(kb.monster(), Some(c(1, 3)));
    assert!(!kb.frontier().contains(c(1, 3)));
    assert!(!kb.force_danger(c(9, 9), Hazard::Pit));
}

#[test]
fn classification_sets_partition_the_grid() {
    let grid = Grid::new(4);
    let mut kb = KnowledgeBase::new(grid);
    let script = [
        (c(0, 3), PerceptSet::NONE),
        (c(0, 2), stench()),
        (c(1, 3), breeze()),
        (c(1, 2), PerceptSet::NONE),
    ];

    for (cell, percepts) in script {
        kb.observe(cell, percepts);
        let safe = kb.safe_cells();
        let danger = kb.danger_cells();
        let unknown = kb.unknown_cells();

        assert_eq!(safe.len() + danger.len() + unknown.len(), grid.len());
        for cell in grid.cells() {
            let members = [safe.contains(cell), danger.contains(cell), unknown.contains(cell)];
            assert_eq!(members.iter().filter(|m| **m).count(), 1, "{cell}");
        }
        assert!(kb.visited_cells().iter().all(|v| safe.contains(v)));
    }
}
