//! Grid layout representation
//!
//! This module defines the typed 2-D board shared by all grid tasks: cells,
//! cardinal actions, positions, and the `Grid` container with its textual
//! form. Layouts are rectangular character grids with a wall border, one
//! agent, and one target.

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub mod generate;
pub mod randomize;
pub mod solve;

/// Contents of a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Impassable wall
    Wall,
    /// Walkable floor
    Field,
    /// The navigating agent
    Agent,
    /// The goal cell
    Target,
    /// A failure cell, stepping in ends the episode
    Hazard,
}

impl Cell {
    /// Character used in the textual layout format
    pub fn to_char(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Field => ' ',
            Cell::Agent => 'A',
            Cell::Target => 'T',
            Cell::Hazard => 'H',
        }
    }

    /// Parse a layout character
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(Cell::Wall),
            ' ' => Some(Cell::Field),
            'A' => Some(Cell::Agent),
            'T' => Some(Cell::Target),
            'H' => Some(Cell::Hazard),
            _ => None,
        }
    }

    /// Numeric code used in flattened observations
    pub fn code(self) -> u8 {
        match self {
            Cell::Wall => 0,
            Cell::Field => 1,
            Cell::Agent => 2,
            Cell::Target => 3,
            Cell::Hazard => 4,
        }
    }
}

/// Cardinal movement action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Decrease row
    Up,
    /// Increase column
    Right,
    /// Increase row
    Down,
    /// Decrease column
    Left,
}

impl Action {
    /// All actions in discrete index order
    pub const ALL: [Action; 4] = [Action::Up, Action::Right, Action::Down, Action::Left];

    /// Create action from a discrete action index
    pub fn from_index(action: i64) -> Self {
        match action {
            0 => Action::Up,
            1 => Action::Right,
            2 => Action::Down,
            _ => Action::Left,
        }
    }

    /// Discrete index of this action
    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Right => 1,
            Action::Down => 2,
            Action::Left => 3,
        }
    }

    /// Movement vector as (row delta, col delta)
    pub fn to_delta(self) -> (i32, i32) {
        match self {
            Action::Up => (-1, 0),
            Action::Right => (0, 1),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
        }
    }
}

/// Position on the board as (row, col), row 0 at the top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index
    pub row: i32,
    /// Column index
    pub col: i32,
}

impl Position {
    /// Create new position
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Position reached by applying `action` `n` times
    pub fn step(self, action: Action, n: i32) -> Self {
        let (dr, dc) = action.to_delta();
        Self::new(self.row + dr * n, self.col + dc * n)
    }

    /// Euclidean distance to another position
    pub fn distance(self, other: Position) -> f64 {
        let dr = f64::from(self.row - other.row);
        let dc = f64::from(self.col - other.col);
        (dr * dr + dc * dc).sqrt()
    }

    /// Manhattan distance to another position
    pub fn manhattan(self, other: Position) -> usize {
        ((self.row - other.row).abs() + (self.col - other.col).abs()) as usize
    }
}

/// Rectangular cell grid
///
/// Both the immutable layout template of a task and the live per-episode
/// board are `Grid`s; the episode controller clones the former into the
/// latter on reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Validate a single grid dimension: odd, within `7..=15`.
    pub fn check_dimension(s: usize) -> Result<usize, Error> {
        if s % 2 == 1 && (7..=15).contains(&s) {
            Ok(s)
        } else {
            Err(Error::InvalidSize(s))
        }
    }

    /// Create a grid filled with a single cell kind
    pub fn filled(rows: usize, cols: usize, fill: Cell) -> Self {
        Self { rows, cols, cells: vec![fill; rows * cols] }
    }

    /// Parse the textual layout format, one row per line.
    ///
    /// Rejects ragged rows, characters outside `# ATH`, dimensions that are
    /// even or outside `7..=15`, and layouts without exactly one agent and
    /// one target.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self, Error> {
        let rows = lines.len();
        let cols = lines.first().map_or(0, |l| l.as_ref().chars().count());
        for s in [rows, cols] {
            if Self::check_dimension(s).is_err() {
                return Err(Error::MalformedLayout(format!(
                    "grid is {rows}x{cols}, each dimension must be odd and within 7..=15"
                )));
            }
        }
        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            if line.chars().count() != cols {
                return Err(Error::MalformedLayout(format!(
                    "row {row} has {} characters, expected {cols}",
                    line.chars().count()
                )));
            }
            for (col, c) in line.chars().enumerate() {
                cells.push(Cell::from_char(c).ok_or_else(|| {
                    Error::MalformedLayout(format!("invalid character {c:?} at ({row}, {col})"))
                })?);
            }
        }
        let grid = Self { rows, cols, cells };
        for cell in [Cell::Agent, Cell::Target] {
            let count = grid.count(cell);
            if count != 1 {
                return Err(Error::MalformedLayout(format!(
                    "expected exactly one {cell:?} cell, found {count}"
                )));
            }
        }
        Ok(grid)
    }

    /// Render the textual layout format, one row per line.
    ///
    /// Inverse of [`Grid::parse`] on well-formed input.
    pub fn render_lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|c| c.to_char()).collect())
            .collect()
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether `pos` lies inside the grid
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.rows
            && (pos.col as usize) < self.cols
    }

    pub(crate) fn index_of(&self, pos: Position) -> usize {
        pos.row as usize * self.cols + pos.col as usize
    }

    /// Cell at `pos`, or `None` outside the grid
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.in_bounds(pos).then(|| self.cells[self.index_of(pos)])
    }

    /// Overwrite the cell at `pos`
    pub fn set(&mut self, pos: Position, cell: Cell) {
        assert!(self.in_bounds(pos), "cell write outside the grid at {pos:?}");
        let index = self.index_of(pos);
        self.cells[index] = cell;
    }

    /// Number of cells holding `cell`
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Unique coordinate of `cell`.
    ///
    /// Anything other than exactly one match means the board is corrupted
    /// and fails with [`Error::AmbiguousOrMissingCell`].
    pub fn position_of(&self, cell: Cell) -> Result<Position, Error> {
        let count = self.count(cell);
        if count != 1 {
            return Err(Error::AmbiguousOrMissingCell { cell, count });
        }
        let index = self.cells.iter().position(|&c| c == cell).unwrap_or_default();
        Ok(Position::new((index / self.cols) as i32, (index % self.cols) as i32))
    }

    /// Whether applying `action` `n` times from `pos` stays inside the wall
    /// border (a margin of `n` cells around the grid edge).
    pub fn action_in_bounds(&self, action: Action, pos: Position, n: i32) -> bool {
        match action {
            Action::Up => pos.row > n,
            Action::Right => pos.col < self.cols as i32 - n - 1,
            Action::Down => pos.row < self.rows as i32 - n - 1,
            Action::Left => pos.col > n,
        }
    }

    /// Map each cardinal action allowed by `condition` to the position
    /// reached by applying it `n` times, in action index order.
    pub fn moves<F>(&self, pos: Position, n: i32, condition: F) -> Vec<(Action, Position)>
    where
        F: Fn(Action, Position, i32) -> bool,
    {
        Action::ALL
            .iter()
            .filter(|&&action| condition(action, pos, n))
            .map(|&action| (action, pos.step(action, n)))
            .collect()
    }

    /// Flattened observation: one numeric cell code per cell, row major
    pub fn observation(&self) -> Vec<f32> {
        self.cells.iter().map(|c| f32::from(c.code())).collect()
    }
}
