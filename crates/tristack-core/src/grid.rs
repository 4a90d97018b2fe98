//! The 3x3 grid of colored cells that every puzzle is built from.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Side length of a grid
pub const GRID_SIZE: usize = 3;

/// Number of cells in a grid
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// A single cell: one of three ink colors, or empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    Red,
    Blue,
    Yellow,
    #[default]
    Empty,
}

impl Cell {
    /// All ink colors (every cell value except `Empty`)
    pub const INKS: [Cell; 3] = [Cell::Red, Cell::Blue, Cell::Yellow];

    /// Check if the cell is transparent
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Check if the cell carries a color
    pub fn is_ink(self) -> bool {
        !self.is_empty()
    }

    /// Single-character symbol used in the text format
    pub fn symbol(self) -> char {
        match self {
            Cell::Red => 'R',
            Cell::Blue => 'B',
            Cell::Yellow => 'Y',
            Cell::Empty => 'X',
        }
    }

    /// Parse a symbol. `X` and `.` both mean empty; lowercase is accepted.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(Cell::Red),
            'B' => Some(Cell::Blue),
            'Y' => Some(Cell::Yellow),
            'X' | '.' => Some(Cell::Empty),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A cell coordinate inside a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        debug_assert!(row < GRID_SIZE && col < GRID_SIZE);
        Self { row, col }
    }

    /// Every position in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| Position { row, col }))
    }

    /// Row-major index of this position
    pub fn index(self) -> usize {
        self.row * GRID_SIZE + self.col
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Errors from parsing the grid text format
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid must have exactly 9 cells, found {0}")]
    WrongLength(usize),

    #[error("invalid cell symbol {0:?} (expected R, B, Y or X)")]
    InvalidSymbol(char),

    #[error("grid must have exactly 3 rows of 3 cells")]
    WrongShape,
}

/// An immutable 3x3 matrix of cells.
///
/// Grids are small `Copy` values; every operation that "changes" a grid
/// returns a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Grid {
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// A grid with every cell empty
    pub const fn empty() -> Self {
        Self {
            cells: [[Cell::Empty; GRID_SIZE]; GRID_SIZE],
        }
    }

    pub const fn from_rows(cells: [[Cell; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { cells }
    }

    /// Parse a grid from its compact text form, e.g. `"RBX/RBY/XXY"`.
    ///
    /// Row separators (`/`, `|`, whitespace) are optional; exactly nine
    /// cell symbols must remain.
    pub fn from_string(s: &str) -> Result<Self, GridError> {
        let mut cells = [[Cell::Empty; GRID_SIZE]; GRID_SIZE];
        let mut count = 0;

        for c in s.chars() {
            if c == '/' || c == '|' || c.is_whitespace() {
                continue;
            }
            let cell = Cell::from_symbol(c).ok_or(GridError::InvalidSymbol(c))?;
            if count < CELL_COUNT {
                cells[count / GRID_SIZE][count % GRID_SIZE] = cell;
            }
            count += 1;
        }

        if count != CELL_COUNT {
            return Err(GridError::WrongLength(count));
        }
        Ok(Self { cells })
    }

    /// Compact text form with `/` between rows
    pub fn to_string_compact(&self) -> String {
        self.row_strings().join("/")
    }

    /// Each row as a three-character string
    pub fn row_strings(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }

    pub fn cell(&self, pos: Position) -> Cell {
        self.cells[pos.row][pos.col]
    }

    pub fn rows(&self) -> &[[Cell; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Return a copy of this grid with one cell replaced
    pub fn with_cell(&self, pos: Position, cell: Cell) -> Self {
        let mut cells = self.cells;
        cells[pos.row][pos.col] = cell;
        Self { cells }
    }

    /// Number of colored cells
    pub fn ink_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_ink()).count()
    }

    /// Check if no cell carries a color
    pub fn is_empty(&self) -> bool {
        self.ink_count() == 0
    }

    /// Positions that carry a color
    pub fn inked_positions(&self) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(move |&pos| self.cell(pos).is_ink())
    }
}

impl TryFrom<Vec<String>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        if rows.len() != GRID_SIZE
            || rows
                .iter()
                .any(|row| row.chars().filter(|c| !c.is_whitespace()).count() != GRID_SIZE)
        {
            return Err(GridError::WrongShape);
        }
        Grid::from_string(&rows.concat())
    }
}

impl From<Grid> for Vec<String> {
    fn from(grid: Grid) -> Self {
        grid.row_strings()
    }
}

impl std::str::FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grid::from_string(s)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.row_strings().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", row)?;
        }
        Ok(())
    }
}
