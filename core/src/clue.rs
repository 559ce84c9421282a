use serde::{Deserialize, Serialize};

use crate::*;

/// Declared totals for one line: the sum of its non-bomb values and its
/// bomb count. Set once during setup, immutable afterwards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineClue {
    points: u8,
    bombs: u8,
}

impl LineClue {
    /// Validates against line arithmetic: at most five bombs, and the
    /// non-bomb cells (each worth 1 to 3) must be able to carry `points`.
    pub fn new(points: u8, bombs: u8) -> Result<Self> {
        if bombs > GRID_SIZE || points > 3 * (GRID_SIZE - bombs) {
            return Err(GameError::MalformedClue);
        }
        Ok(Self { points, bombs })
    }

    pub const fn points(self) -> u8 {
        self.points
    }

    pub const fn bombs(self) -> u8 {
        self.bombs
    }

    /// Combined points and bombs. A line whose capacity is exactly 5 holds
    /// nothing but bombs and 1s.
    pub const fn capacity(self) -> u8 {
        self.points + self.bombs
    }
}

/// The ten line clues, five rows and five columns. Fixed-size storage
/// populated through the indexed setters, never resized.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clues {
    rows: [LineClue; GRID_SIZE as usize],
    columns: [LineClue; GRID_SIZE as usize],
}

impl Clues {
    pub fn line(&self, line: Line) -> LineClue {
        match line {
            Line::Row(index) => self.rows[index as usize],
            Line::Column(index) => self.columns[index as usize],
        }
    }

    pub(crate) fn set_row(&mut self, index: Coord, clue: LineClue) -> Result<()> {
        let slot = self
            .rows
            .get_mut(index as usize)
            .ok_or(GameError::MalformedClue)?;
        *slot = clue;
        Ok(())
    }

    pub(crate) fn set_column(&mut self, index: Coord, clue: LineClue) -> Result<()> {
        let slot = self
            .columns
            .get_mut(index as usize)
            .ok_or(GameError::MalformedClue)?;
        *slot = clue;
        Ok(())
    }
}
