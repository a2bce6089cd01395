use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A grid coordinate. `(0, 0)` is the top-left corner and `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step away in `dir`. May lie outside any grid.
    pub fn offset(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn is_adjacent(self, other: Cell) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Orthogonal direction. `North` points towards `y = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Fixed order for determinism: N, E, S, W.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Square `size x size` board with row-major cell indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grid {
    size: i32,
}

impl Grid {
    /// Largest side length whose cell count still fits in an `i32` index.
    pub const MAX_SIZE: u32 = 46_340;

    pub fn new(size: u32) -> Self {
        assert!(size > 0, "grid must be non-empty");
        assert!(size <= Self::MAX_SIZE, "grid too large");
        Self { size: size as i32 }
    }

    pub fn size(self) -> u32 {
        self.size as u32
    }

    pub fn len(self) -> usize {
        let side = self.size as usize;
        side * side
    }

    pub fn is_empty(self) -> bool {
        false
    }

    pub fn contains(self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.size && cell.y < self.size
    }

    pub fn index(self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        Some((cell.y * self.size + cell.x) as usize)
    }

    pub fn cell_at(self, idx: usize) -> Cell {
        let idx = idx as i32;
        Cell {
            x: idx % self.size,
            y: idx / self.size,
        }
    }

    /// All cells in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        (0..self.len()).map(move |idx| self.cell_at(idx))
    }

    /// In-bounds orthogonal neighbours in N, E, S, W order.
    pub fn neighbors(self, cell: Cell) -> impl Iterator<Item = Cell> {
        Direction::ALL
            .into_iter()
            .map(move |dir| cell.offset(dir))
            .filter(move |n| self.contains(*n))
    }

    pub fn step(self, cell: Cell, dir: Direction) -> Option<Cell> {
        let next = cell.offset(dir);
        self.contains(next).then_some(next)
    }

    /// Cells strictly after `from` in `dir`, up to the edge of the grid.
    pub fn ray(self, from: Cell, dir: Direction) -> impl Iterator<Item = Cell> {
        core::iter::successors(self.step(from, dir), move |c| self.step(*c, dir))
    }

    /// `cell` together with its in-bounds neighbours.
    pub fn neighborhood(self, cell: Cell) -> CellSet {
        let mut set = CellSet::new(self);
        set.insert(cell);
        set.extend(self.neighbors(cell));
        set
    }
}

/// Grid-indexed membership set.
///
/// Stored as a dense bit vector over the grid's row-major indices; iteration is in row-major
/// order. Cells outside the grid are never members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSet {
    grid: Grid,
    bits: Vec<bool>,
    len: usize,
}

impl CellSet {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            bits: vec![false; grid.len()],
            len: 0,
        }
    }

    pub fn full(grid: Grid) -> Self {
        Self {
            grid,
            bits: vec![true; grid.len()],
            len: grid.len(),
        }
    }

    pub fn from_cells(grid: Grid, cells: impl IntoIterator<Item = Cell>) -> Self {
        let mut set = Self::new(grid);
        set.extend(cells);
        set
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Returns `true` if the cell was newly inserted.
    pub fn insert(&mut self, cell: Cell) -> bool {
        let Some(idx) = self.grid.index(cell) else {
            return false;
        };
        if self.bits[idx] {
            return false;
        }
        self.bits[idx] = true;
        self.len += 1;
        true
    }

    /// Returns `true` if the cell was a member.
    pub fn remove(&mut self, cell: Cell) -> bool {
        let Some(idx) = self.grid.index(cell) else {
            return false;
        };
        if !self.bits[idx] {
            return false;
        }
        self.bits[idx] = false;
        self.len -= 1;
        true
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.grid
            .index(cell)
            .map(|idx| self.bits[idx])
            .unwrap_or(false)
    }

    pub(crate) fn contains_index(&self, idx: usize) -> bool {
        self.bits.get(idx).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, member)| **member)
            .map(|(idx, _)| self.grid.cell_at(idx))
    }
}

impl Extend<Cell> for CellSet {
    fn extend<I: IntoIterator<Item = Cell>>(&mut self, iter: I) {
        for cell in iter {
            self.insert(cell);
        }
    }
}
