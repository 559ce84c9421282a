use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::*;

/// Produces every fully-resolved grid consistent with the board's clues
/// and revealed cells, deduplicated structurally.
///
/// Work-list search over cell indices in row-major order. At each
/// indeterminate cell the bomb branch is taken only while both the row and
/// the column still have bomb budget, and a deduction pass prunes the copy
/// before it is pushed. The non-bomb branch keeps the cell as is; point
/// values are pinned down by deduction, not guessed.
pub fn enumerate(board: &Board) -> BTreeSet<Grid> {
    let mut candidates = BTreeSet::new();
    let mut work: Vec<(Board, usize)> = Vec::with_capacity(2 * CELL_COUNT);
    work.push((*board, 0));
    let mut expanded = 0usize;

    while let Some((current, index)) = work.pop() {
        expanded += 1;

        if index == CELL_COUNT {
            if is_accepted(&current) {
                candidates.insert(*current.grid());
            }
            continue;
        }

        let coords = cell_coords(index);
        if current.cell(coords).is_revealed() {
            work.push((current, index + 1));
            continue;
        }

        let (row, column) = coords;
        let row_budget =
            current.known_bombs(Line::Row(row)) < current.line_clue(Line::Row(row)).bombs();
        let column_budget = current.known_bombs(Line::Column(column))
            < current.line_clue(Line::Column(column)).bombs();
        if row_budget && column_budget {
            let mut with_bomb = current;
            with_bomb.set_cell(coords, Cell::Bomb);
            propagate(&mut with_bomb);
            work.push((with_bomb, index + 1));
        }

        work.push((current, index + 1));
    }

    log::debug!(
        "enumeration expanded {expanded} states into {} candidates",
        candidates.len()
    );
    candidates
}

/// A finished assignment is kept only when nothing is left undecided and
/// every line holds exactly its declared bomb count.
fn is_accepted(board: &Board) -> bool {
    board.grid().is_fully_resolved()
        && Line::ALL
            .into_iter()
            .all(|line| board.known_bombs(line) == board.line_clue(line).bombs())
}
