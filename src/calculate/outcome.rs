use crate::models::{MatchFormat, MatchOutcome, SetScore, Side};

use super::EngineError;

/// Tally the sets and decide whether the match is over.
///
/// Tied sets count for neither player. If both sides somehow reach the
/// threshold, side A is reported as the winner.
pub fn decide_outcome(sets: &[SetScore], format: MatchFormat) -> MatchOutcome {
    let mut sets_won_a = 0;
    let mut sets_won_b = 0;

    for set in sets {
        if set.score_a > set.score_b {
            sets_won_a += 1;
        } else if set.score_b > set.score_a {
            sets_won_b += 1;
        }
    }

    let needed = format.sets_to_win();
    let winner = if sets_won_a >= needed {
        Some(Side::A)
    } else if sets_won_b >= needed {
        Some(Side::B)
    } else {
        None
    };

    MatchOutcome {
        sets_won_a,
        sets_won_b,
        winner,
        is_complete: winner.is_some(),
    }
}

/// Check set numbering and set count before scores are accepted.
///
/// Set numbers must run 1, 2, 3... in order, and a match may not carry more
/// sets than its format allows.
pub fn validate_sets(sets: &[SetScore], format: MatchFormat) -> Result<(), EngineError> {
    if sets.len() > format.max_sets() as usize {
        return Err(EngineError::InvalidFormatInput(format!(
            "{} sets supplied but a {} match has at most {}",
            sets.len(),
            format,
            format.max_sets()
        )));
    }

    for (expected, set) in (1u32..).zip(sets) {
        if set.set_number != expected {
            return Err(EngineError::InvalidFormatInput(format!(
                "set number {} found where set {} was expected",
                set.set_number, expected
            )));
        }
    }

    Ok(())
}
