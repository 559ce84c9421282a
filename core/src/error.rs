use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Clue is impossible for a five-cell line")]
    MalformedClue,
    #[error("Reveal has an out-of-range row, column or value")]
    MalformedReveal,
    #[error("Cell was already revealed to a different value")]
    ContradictingReveal,
    #[error("Clues admit no consistent board")]
    UnsatisfiableClues,
    #[error("Line clues were already finalized")]
    CluesFinalized,
}

pub type Result<T> = core::result::Result<T, GameError>;
