//! Standings engine.
//!
//! Pure computations over match data, with no I/O and no state:
//! - Deciding whether a match is finished and who won it
//! - Turning a finished match into per-player statistic deltas
//! - Ordering season totals into a standings table
//! - Drawing the top-four playoff bracket

mod delta;
mod outcome;
mod playoffs;
mod ranking;

pub use delta::*;
pub use outcome::*;
pub use playoffs::*;
pub use ranking::*;

use thiserror::Error;

/// Contract violations detected by the engine. None of these are transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Invalid format input: {0}")]
    InvalidFormatInput(String),

    #[error("Cannot record statistics for an incomplete match ({sets_won_a}-{sets_won_b})")]
    IncompleteMatchMutation { sets_won_a: u32, sets_won_b: u32 },

    #[error("Statistic overflow while applying {0}")]
    StatOverflow(&'static str),

    #[error("Statistic underflow while reverting {0}")]
    StatUnderflow(&'static str),
}
