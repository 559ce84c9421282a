use serde::{Deserialize, Serialize};

pub use enumerate::*;
pub use probability::*;
pub use propagate::*;

mod enumerate;
mod probability;
mod propagate;

/// How much deduction work runs before each enumeration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropagationMode {
    /// One rule pass per solve request, matching the turn-based cadence
    /// of play.
    SinglePass,
    /// Repeat rule passes until no cell changes.
    FixedPoint,
}

impl Default for PropagationMode {
    fn default() -> Self {
        Self::SinglePass
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveConfig {
    pub propagation_mode: PropagationMode,
}
