//! Match verdicts derived from set scores.

use serde::{Deserialize, Serialize};

/// One of the two participants. A is player 1, B is player 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Result of tallying a match's sets. Never persisted; recomputed from the
/// stored sets whenever they change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub sets_won_a: u32,
    pub sets_won_b: u32,
    pub winner: Option<Side>,
    pub is_complete: bool,
}

impl MatchOutcome {
    /// Sets won by the given side.
    pub fn sets_won(&self, side: Side) -> u32 {
        match side {
            Side::A => self.sets_won_a,
            Side::B => self.sets_won_b,
        }
    }

    /// Score line as "2-1" from side A's point of view.
    pub fn score_line(&self) -> String {
        format!("{}-{}", self.sets_won_a, self.sets_won_b)
    }
}
