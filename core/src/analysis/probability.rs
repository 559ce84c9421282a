use alloc::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::*;

/// Per-cell safety estimate derived from a candidate ensemble, row-major.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellProbabilities {
    safe: [f64; CELL_COUNT],
}

impl CellProbabilities {
    /// Probability that the cell is not a bomb.
    pub fn safe_probability(&self, coords: Coord2) -> f64 {
        self.safe[cell_index(coords)]
    }

    pub fn bomb_fraction(&self, coords: Coord2) -> f64 {
        1.0 - self.safe_probability(coords)
    }

    pub const fn as_array(&self) -> &[f64; CELL_COUNT] {
        &self.safe
    }
}

/// Exact estimate over the enumerated ensemble: a cell's bomb fraction is
/// the share of candidates placing a bomb there.
///
/// An empty ensemble means the declared clues admit no board at all, which
/// can only come from bad input; it is reported instead of estimated.
pub fn estimate(candidates: &BTreeSet<Grid>) -> Result<CellProbabilities> {
    if candidates.is_empty() {
        return Err(GameError::UnsatisfiableClues);
    }

    let mut bomb_counts = [0usize; CELL_COUNT];
    for grid in candidates {
        for (index, cell) in grid.as_array().iter().enumerate() {
            if matches!(cell, Cell::Bomb) {
                bomb_counts[index] += 1;
            }
        }
    }

    let total = candidates.len() as f64;
    let mut safe = [0.0; CELL_COUNT];
    for (index, count) in bomb_counts.into_iter().enumerate() {
        safe[index] = 1.0 - count as f64 / total;
    }
    Ok(CellProbabilities { safe })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_bombs(bombs: &[Coord2]) -> Grid {
        let mut grid = Grid::default();
        for index in 0..CELL_COUNT {
            grid[cell_coords(index)] = Cell::One;
        }
        for &coords in bombs {
            grid[coords] = Cell::Bomb;
        }
        grid
    }

    #[test]
    fn empty_ensemble_is_an_unsatisfiable_clue_set() {
        let candidates = BTreeSet::new();
        assert_eq!(estimate(&candidates), Err(GameError::UnsatisfiableClues));
    }

    #[test]
    fn fractions_count_bomb_share_per_cell() {
        let mut candidates = BTreeSet::new();
        candidates.insert(grid_with_bombs(&[(0, 0), (1, 1)]));
        candidates.insert(grid_with_bombs(&[(0, 1), (1, 0)]));

        let probabilities = estimate(&candidates).unwrap();

        assert_eq!(probabilities.safe_probability((0, 0)), 0.5);
        assert_eq!(probabilities.safe_probability((0, 1)), 0.5);
        assert_eq!(probabilities.bomb_fraction((1, 0)), 0.5);
        assert_eq!(probabilities.safe_probability((2, 2)), 1.0);
    }

    #[test]
    fn probabilities_stay_within_bounds() {
        let mut candidates = BTreeSet::new();
        candidates.insert(grid_with_bombs(&[(0, 0)]));
        candidates.insert(grid_with_bombs(&[(0, 0), (4, 4)]));
        candidates.insert(grid_with_bombs(&[(2, 0), (3, 1)]));

        let probabilities = estimate(&candidates).unwrap();

        for p in probabilities.as_array() {
            assert!((0.0..=1.0).contains(p));
        }
    }

    #[test]
    fn certain_cells_hit_the_extremes() {
        let mut candidates = BTreeSet::new();
        candidates.insert(grid_with_bombs(&[(0, 0), (1, 1)]));
        candidates.insert(grid_with_bombs(&[(0, 0), (1, 2)]));

        let probabilities = estimate(&candidates).unwrap();

        // Bomb in every candidate, and bomb in none.
        assert_eq!(probabilities.safe_probability((0, 0)), 0.0);
        assert_eq!(probabilities.safe_probability((4, 4)), 1.0);
    }
}
