#![no_std]

extern crate alloc;

pub use analysis::*;
pub use board::*;
pub use cell::*;
pub use clue::*;
pub use error::*;
pub use simulation::*;
pub use types::*;

mod analysis;
mod board;
mod cell;
mod clue;
mod error;
mod simulation;
mod types;
