use crate::*;

/// Applies one deduction pass: every row, then every column, each against
/// its own clue only. Returns whether any cell changed.
///
/// Revealed cells are never touched; deduced cells only move toward more
/// information (`Unknown` to `Safe`/`BombOrOne`, those to `One`/`Bomb`).
pub fn propagate(board: &mut Board) -> bool {
    let mut changed = false;
    for line in Line::ALL {
        changed |= propagate_line(board, line);
    }
    if changed {
        log::trace!("deduction pass tightened the board");
    }
    changed
}

/// Repeats passes until one deduces nothing new.
pub fn propagate_to_fixpoint(board: &mut Board) {
    while propagate(board) {}
}

pub fn propagate_with(board: &mut Board, mode: PropagationMode) {
    match mode {
        PropagationMode::SinglePass => {
            propagate(board);
        }
        PropagationMode::FixedPoint => propagate_to_fixpoint(board),
    }
}

fn propagate_line(board: &mut Board, line: Line) -> bool {
    let clue = board.line_clue(line);
    let mut changed = false;

    // Declared points already reached: all remaining capacity is bombs.
    if board.line_score(line, 0) == clue.points() {
        for coords in line.cells() {
            if matches!(board.cell(coords), Cell::Unknown | Cell::BombOrOne) {
                board.set_cell(coords, Cell::Bomb);
                changed = true;
            }
        }
    }

    // Every declared bomb located: the rest of the line cannot explode,
    // and a bomb-or-one must be the 1 branch.
    if board.known_bombs(line) == clue.bombs() {
        for coords in line.cells() {
            match board.cell(coords) {
                Cell::Unknown => {
                    board.set_cell(coords, Cell::Safe);
                    changed = true;
                }
                Cell::BombOrOne => {
                    board.set_cell(coords, Cell::One);
                    changed = true;
                }
                _ => {}
            }
        }
    }

    // Knowns plus one-per-undetermined-cell already exhaust the capacity:
    // nothing left can exceed 1.
    let accounted = board.line_score(line, 0) + board.known_bombs(line)
        + board.unknown_count(line, true);
    if accounted == clue.capacity() {
        for coords in line.cells() {
            if board.cell(coords) == Cell::Unknown {
                board.set_cell(coords, Cell::BombOrOne);
                changed = true;
            }
        }
    }

    // Slack is the capacity not yet accounted for when bombs and
    // bomb-or-ones are counted as 1.
    let slack = i32::from(clue.capacity()) - i32::from(board.line_score(line, 1));
    let undetermined = i32::from(board.unknown_count(line, false));
    if slack >= 3 * (undetermined - 1) + 2 {
        // Even if every other undetermined cell takes the maximum 3, each
        // one still has at least 2 left, so none of them is a bomb or a 1.
        for coords in line.cells() {
            if board.cell(coords) == Cell::Unknown {
                board.set_cell(coords, Cell::Safe);
                changed = true;
            }
        }
    } else if slack == undetermined {
        // Exact budget forces the minimum.
        for coords in line.cells() {
            if matches!(board.cell(coords), Cell::Unknown | Cell::Safe) {
                board.set_cell(coords, Cell::One);
                changed = true;
            }
        }
    }

    changed
}
