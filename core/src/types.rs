use serde::{Deserialize, Serialize};

/// Single coordinate axis used for row and column positions.
pub type Coord = u8;

/// Two-dimensional coordinates `(row, column)`.
pub type Coord2 = (Coord, Coord);

/// Number of rows and of columns.
pub const GRID_SIZE: Coord = 5;

/// Total number of cells.
pub const CELL_COUNT: usize = GRID_SIZE as usize * GRID_SIZE as usize;

/// Row-major cell index for `coords`.
pub const fn cell_index((row, column): Coord2) -> usize {
    row as usize * GRID_SIZE as usize + column as usize
}

/// Inverse of [`cell_index`].
pub const fn cell_coords(index: usize) -> Coord2 {
    (
        (index / GRID_SIZE as usize) as Coord,
        (index % GRID_SIZE as usize) as Coord,
    )
}

/// One row or one column, each carrying its own clue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Line {
    Row(Coord),
    Column(Coord),
}

impl Line {
    /// All ten lines, rows first. Deduction rules are applied in this order.
    pub const ALL: [Self; 10] = [
        Self::Row(0),
        Self::Row(1),
        Self::Row(2),
        Self::Row(3),
        Self::Row(4),
        Self::Column(0),
        Self::Column(1),
        Self::Column(2),
        Self::Column(3),
        Self::Column(4),
    ];

    /// The five coordinates belonging to this line, in grid order.
    pub fn cells(self) -> impl Iterator<Item = Coord2> {
        (0..GRID_SIZE).map(move |i| match self {
            Self::Row(row) => (row, i),
            Self::Column(column) => (i, column),
        })
    }
}
