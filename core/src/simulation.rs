use alloc::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Session phase: clues are entered, the one-time line pass runs, then
/// solve cycles alternate with player reveals.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    LinesFinalized,
    Solving,
}

impl Phase {
    pub const fn is_setup(self) -> bool {
        matches!(self, Self::Setup)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Setup
    }
}

/// 1-based indices of lines with no bombs and more than five points. The
/// player should reveal them in bulk: there is no risk and every reveal
/// narrows the candidate ensemble.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SafeLines {
    pub rows: SmallVec<[Coord; 5]>,
    pub columns: SmallVec<[Coord; 5]>,
}

impl SafeLines {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }
}

/// A cell pick with its estimated safety.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Recommendation {
    pub row: Coord,
    pub column: Coord,
    pub safe_probability: f64,
}

/// Owns one board being deduced and runs the solve cycle on demand.
///
/// The simulation only ever reports state; whether the session is over
/// (a bomb was revealed, or no worthwhile cell remains) is the caller's
/// call to make.
#[derive(Clone, Debug, Default)]
pub struct Simulation {
    board: Board,
    phase: Phase,
    config: SolveConfig,
    candidates: BTreeSet<Grid>,
    probabilities: Option<CellProbabilities>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolveConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Drops all boards and clues for a fresh session, keeping the config.
    pub fn restart(&mut self) {
        *self = Self::with_config(self.config);
    }

    pub const fn board(&self) -> &Board {
        &self.board
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Candidate boards produced by the last [`solve`](Self::solve).
    pub const fn candidates(&self) -> &BTreeSet<Grid> {
        &self.candidates
    }

    /// Probability vector derived from the last [`solve`](Self::solve).
    pub const fn probabilities(&self) -> Option<&CellProbabilities> {
        self.probabilities.as_ref()
    }

    pub fn set_row_clue(&mut self, index: Coord, points: u8, bombs: u8) -> Result<()> {
        self.check_setup()?;
        self.board.set_row_clue(index, LineClue::new(points, bombs)?)
    }

    pub fn set_column_clue(&mut self, index: Coord, points: u8, bombs: u8) -> Result<()> {
        self.check_setup()?;
        self.board
            .set_column_clue(index, LineClue::new(points, bombs)?)
    }

    /// Records a player reveal, `0` (bomb) through `3`, and drops cached
    /// solve results so the next cycle starts from the new information.
    pub fn reveal(&mut self, row: Coord, column: Coord, value: u8) -> Result<RevealOutcome> {
        let outcome = self.board.reveal((row, column), value)?;
        if outcome.has_update() {
            self.candidates.clear();
            self.probabilities = None;
        }
        Ok(outcome)
    }

    /// One-time pass over the freshly entered clues.
    ///
    /// Lines whose capacity is exactly 5 hold nothing above 1, so their
    /// cells are forced to `Bomb` or `BombOrOne` outright. Lines with no
    /// bombs either resolve to all 1s (five points) or are worth revealing
    /// in bulk; the latter are returned as 1-based indices with their
    /// cells left untouched for the player to reveal.
    pub fn finalize_lines(&mut self) -> Result<SafeLines> {
        self.check_setup()?;

        for index in 0..GRID_SIZE {
            for line in [Line::Row(index), Line::Column(index)] {
                let clue = self.board.line_clue(line);
                if clue.capacity() != GRID_SIZE {
                    continue;
                }
                let forced = if clue.bombs() == GRID_SIZE {
                    Cell::Bomb
                } else {
                    Cell::BombOrOne
                };
                for coords in line.cells() {
                    if matches!(self.board.cell(coords), Cell::Unknown | Cell::BombOrOne) {
                        self.board.set_cell(coords, forced);
                    }
                }
            }
        }

        let mut safe = SafeLines::default();
        for index in 0..GRID_SIZE {
            for line in [Line::Row(index), Line::Column(index)] {
                let clue = self.board.line_clue(line);
                if clue.bombs() != 0 {
                    continue;
                }
                if clue.points() > GRID_SIZE {
                    match line {
                        Line::Row(_) => safe.rows.push(index + 1),
                        Line::Column(_) => safe.columns.push(index + 1),
                    }
                } else {
                    for coords in line.cells() {
                        if !self.board.cell(coords).is_revealed() {
                            self.board.set_cell(coords, Cell::One);
                        }
                    }
                }
            }
        }

        if !safe.is_empty() {
            log::debug!(
                "{} rows and {} columns are safe to reveal in bulk",
                safe.rows.len(),
                safe.columns.len()
            );
        }
        self.phase = Phase::LinesFinalized;
        Ok(safe)
    }

    /// Runs one solve cycle: deduction, enumeration, estimation.
    ///
    /// Repeated calls without an intervening reveal return the same board
    /// and the same probabilities.
    pub fn solve(&mut self) -> Result<()> {
        self.probabilities = None;
        propagate_with(&mut self.board, self.config.propagation_mode);
        self.candidates = enumerate(&self.board);
        self.probabilities = Some(estimate(&self.candidates)?);
        self.phase = Phase::Solving;
        Ok(())
    }

    /// The cell most worth revealing: among cells still `Unknown` or
    /// `Safe`, the one with the strictly highest safe probability, first
    /// in row-major order on ties. `None` before the first solve or when
    /// every cell is revealed or worthless.
    pub fn safest_unknown_cell(&self) -> Option<Recommendation> {
        let probabilities = self.probabilities.as_ref()?;
        let mut best: Option<Recommendation> = None;
        for index in 0..CELL_COUNT {
            let coords = cell_coords(index);
            if !matches!(self.board.cell(coords), Cell::Unknown | Cell::Safe) {
                continue;
            }
            let safe_probability = probabilities.safe_probability(coords);
            if best.is_none_or(|best| safe_probability > best.safe_probability) {
                best = Some(Recommendation {
                    row: coords.0,
                    column: coords.1,
                    safe_probability,
                });
            }
        }
        best
    }

    fn check_setup(&self) -> Result<()> {
        if self.phase.is_setup() {
            Ok(())
        } else {
            Err(GameError::CluesFinalized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation_with_clues(
        rows: [(u8, u8); GRID_SIZE as usize],
        columns: [(u8, u8); GRID_SIZE as usize],
    ) -> Simulation {
        let mut simulation = Simulation::new();
        for (index, (points, bombs)) in rows.into_iter().enumerate() {
            simulation
                .set_row_clue(index as Coord, points, bombs)
                .unwrap();
        }
        for (index, (points, bombs)) in columns.into_iter().enumerate() {
            simulation
                .set_column_clue(index as Coord, points, bombs)
                .unwrap();
        }
        simulation
    }

    #[test]
    fn all_plain_lines_resolve_to_the_single_all_ones_board() {
        let mut simulation = simulation_with_clues([(5, 0); 5], [(5, 0); 5]);

        let safe = simulation.finalize_lines().unwrap();
        assert!(safe.is_empty());
        for index in 0..CELL_COUNT {
            assert_eq!(simulation.board().cell(cell_coords(index)), Cell::One);
        }

        simulation.solve().unwrap();
        assert_eq!(simulation.candidates().len(), 1);
        let only = simulation.candidates().iter().next().unwrap();
        assert!(only.as_array().iter().all(|&cell| cell == Cell::One));
        assert_eq!(simulation.safest_unknown_cell(), None);
    }

    #[test]
    fn full_bomb_row_is_forced_and_incompatible_clues_are_reported() {
        let mut simulation = simulation_with_clues(
            [(0, 5), (3, 1), (3, 1), (3, 1), (3, 1)],
            [(3, 1); 5],
        );

        simulation.finalize_lines().unwrap();
        for column in 0..GRID_SIZE {
            assert_eq!(simulation.board().cell((0, column)), Cell::Bomb);
        }

        // The columns' bombs are all spent on row 0, leaving rows 1 to 4
        // without theirs: no candidate board exists.
        assert_eq!(simulation.solve(), Err(GameError::UnsatisfiableClues));
        assert!(simulation.candidates().is_empty());
    }

    #[test]
    fn rich_zero_bomb_line_is_reported_for_bulk_reveal() {
        let mut simulation = simulation_with_clues(
            [(7, 0), (5, 0), (5, 0), (5, 0), (4, 1)],
            [(6, 1), (5, 0), (5, 0), (5, 0), (5, 0)],
        );

        let safe = simulation.finalize_lines().unwrap();

        assert_eq!(safe.rows.as_slice(), &[1]);
        assert!(safe.columns.is_empty());
        // The bulk reveal is deferred to the player.
        assert_eq!(simulation.board().cell((0, 0)), Cell::Unknown);

        simulation.solve().unwrap();
        assert_eq!(simulation.board().cell((0, 0)), Cell::Safe);
        assert_eq!(simulation.board().cell((4, 0)), Cell::Bomb);
        assert_eq!(
            simulation.safest_unknown_cell(),
            Some(Recommendation {
                row: 0,
                column: 0,
                safe_probability: 1.0,
            })
        );
    }

    #[test]
    fn contradicting_reveal_is_rejected() {
        let mut simulation = simulation_with_clues([(4, 1); 5], [(4, 1); 5]);
        simulation.finalize_lines().unwrap();

        assert_eq!(
            simulation.reveal(2, 2, 0),
            Ok(RevealOutcome::HitBomb)
        );
        assert_eq!(
            simulation.reveal(2, 2, 1),
            Err(GameError::ContradictingReveal)
        );
    }

    #[test]
    fn clues_are_rejected_after_finalization() {
        let mut simulation = simulation_with_clues([(4, 1); 5], [(4, 1); 5]);
        simulation.finalize_lines().unwrap();

        assert_eq!(simulation.finalize_lines(), Err(GameError::CluesFinalized));
        assert_eq!(
            simulation.set_row_clue(0, 5, 0),
            Err(GameError::CluesFinalized)
        );
    }

    #[test]
    fn solving_twice_gives_identical_results() {
        let mut simulation = simulation_with_clues([(4, 1); 5], [(4, 1); 5]);
        simulation.finalize_lines().unwrap();

        simulation.solve().unwrap();
        let board = *simulation.board();
        let candidates = simulation.candidates().clone();
        let probabilities = *simulation.probabilities().unwrap();

        simulation.solve().unwrap();
        assert_eq!(*simulation.board(), board);
        assert_eq!(*simulation.candidates(), candidates);
        assert_eq!(*simulation.probabilities().unwrap(), probabilities);
    }

    #[test]
    fn worthless_cells_are_never_recommended() {
        // Every line holds one bomb and four 1s: nothing is worth picking.
        let mut simulation = simulation_with_clues([(4, 1); 5], [(4, 1); 5]);
        simulation.finalize_lines().unwrap();
        simulation.solve().unwrap();

        assert_eq!(simulation.candidates().len(), 120);
        assert_eq!(simulation.safest_unknown_cell(), None);
    }

    #[test]
    fn ties_keep_the_first_cell_in_row_major_order() {
        // Two bombs hide in the top-left 2x2 block, diagonal or
        // anti-diagonal: every block cell is safe with probability 1/2.
        let mut simulation = simulation_with_clues(
            [(5, 1), (5, 1), (5, 0), (5, 0), (5, 0)],
            [(5, 1), (5, 1), (5, 0), (5, 0), (5, 0)],
        );
        simulation.finalize_lines().unwrap();
        simulation.solve().unwrap();

        assert_eq!(simulation.candidates().len(), 2);
        assert_eq!(
            simulation.safest_unknown_cell(),
            Some(Recommendation {
                row: 0,
                column: 0,
                safe_probability: 0.5,
            })
        );

        // Revealing the 2 at (0, 0) pins both bombs and frees (1, 1).
        simulation.reveal(0, 0, 2).unwrap();
        simulation.solve().unwrap();
        assert_eq!(simulation.board().cell((0, 1)), Cell::Bomb);
        assert_eq!(simulation.board().cell((1, 0)), Cell::Bomb);
        assert_eq!(
            simulation.safest_unknown_cell(),
            Some(Recommendation {
                row: 1,
                column: 1,
                safe_probability: 1.0,
            })
        );
    }

    #[test]
    fn restart_clears_the_session_but_keeps_the_config() {
        let config = SolveConfig {
            propagation_mode: PropagationMode::FixedPoint,
        };
        let mut simulation = Simulation::with_config(config);
        simulation.set_row_clue(0, 7, 1).unwrap();
        simulation.finalize_lines().unwrap();

        simulation.restart();

        assert_eq!(simulation.phase(), Phase::Setup);
        assert_eq!(simulation.board().cell((0, 0)), Cell::Unknown);
        assert!(simulation.set_row_clue(0, 5, 0).is_ok());
    }
}
