use crate::models::{MatchOutcome, PlayerStatLine, Side};

use super::EngineError;

/// Points awarded for a match win. A loss earns nothing and there are no draws.
pub const POINTS_PER_WIN: u32 = 3;

/// Compute the statistic deltas a completed match produces for both sides.
///
/// The current totals are only used to check that applying the deltas will
/// not overflow; nothing is mutated here.
pub fn apply_result(
    outcome: &MatchOutcome,
    current_a: &PlayerStatLine,
    current_b: &PlayerStatLine,
) -> Result<(PlayerStatLine, PlayerStatLine), EngineError> {
    let winner = match (outcome.is_complete, outcome.winner) {
        (true, Some(winner)) => winner,
        _ => {
            return Err(EngineError::IncompleteMatchMutation {
                sets_won_a: outcome.sets_won_a,
                sets_won_b: outcome.sets_won_b,
            })
        }
    };

    let delta_a = side_delta(outcome, Side::A, winner);
    let delta_b = side_delta(outcome, Side::B, winner);

    current_a.apply(&delta_a)?;
    current_b.apply(&delta_b)?;

    Ok((delta_a, delta_b))
}

fn side_delta(outcome: &MatchOutcome, side: Side, winner: Side) -> PlayerStatLine {
    let won = side == winner;
    PlayerStatLine {
        matches_played: 1,
        matches_won: u32::from(won),
        matches_lost: u32::from(!won),
        sets_won: outcome.sets_won(side),
        sets_lost: outcome.sets_won(side.opponent()),
        points: if won { POINTS_PER_WIN } else { 0 },
    }
}

impl PlayerStatLine {
    /// Fold a delta into these totals.
    pub fn apply(&self, delta: &PlayerStatLine) -> Result<PlayerStatLine, EngineError> {
        let add = |a: u32, b: u32, field: &'static str| {
            a.checked_add(b).ok_or(EngineError::StatOverflow(field))
        };
        Ok(PlayerStatLine {
            matches_played: add(self.matches_played, delta.matches_played, "matches_played")?,
            matches_won: add(self.matches_won, delta.matches_won, "matches_won")?,
            matches_lost: add(self.matches_lost, delta.matches_lost, "matches_lost")?,
            sets_won: add(self.sets_won, delta.sets_won, "sets_won")?,
            sets_lost: add(self.sets_lost, delta.sets_lost, "sets_lost")?,
            points: add(self.points, delta.points, "points")?,
        })
    }

    /// Take a previously applied delta back out of these totals.
    pub fn revert(&self, delta: &PlayerStatLine) -> Result<PlayerStatLine, EngineError> {
        let sub = |a: u32, b: u32, field: &'static str| {
            a.checked_sub(b).ok_or(EngineError::StatUnderflow(field))
        };
        Ok(PlayerStatLine {
            matches_played: sub(self.matches_played, delta.matches_played, "matches_played")?,
            matches_won: sub(self.matches_won, delta.matches_won, "matches_won")?,
            matches_lost: sub(self.matches_lost, delta.matches_lost, "matches_lost")?,
            sets_won: sub(self.sets_won, delta.sets_won, "sets_won")?,
            sets_lost: sub(self.sets_lost, delta.sets_lost, "sets_lost")?,
            points: sub(self.points, delta.points, "points")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::decide_outcome;
    use crate::models::{MatchFormat, SetScore};
    use pretty_assertions::assert_eq;

    fn completed(a: u32, b: u32, winner: Side) -> MatchOutcome {
        MatchOutcome {
            sets_won_a: a,
            sets_won_b: b,
            winner: Some(winner),
            is_complete: true,
        }
    }

    #[test]
    fn test_deltas_for_three_set_win() {
        let sets = SetScore::numbered(&[(11, 5), (7, 11), (11, 9)]);
        let outcome = decide_outcome(&sets, MatchFormat::BestOf3);
        let zero = PlayerStatLine::default();

        let (delta_a, delta_b) = apply_result(&outcome, &zero, &zero).unwrap();

        assert_eq!(
            delta_a,
            PlayerStatLine {
                matches_played: 1,
                matches_won: 1,
                matches_lost: 0,
                sets_won: 2,
                sets_lost: 1,
                points: 3,
            }
        );
        assert_eq!(
            delta_b,
            PlayerStatLine {
                matches_played: 1,
                matches_won: 0,
                matches_lost: 1,
                sets_won: 1,
                sets_lost: 2,
                points: 0,
            }
        );
    }

    #[test]
    fn test_deltas_mirror_each_other() {
        let zero = PlayerStatLine::default();
        for outcome in [
            completed(3, 0, Side::A),
            completed(1, 3, Side::B),
            completed(2, 1, Side::A),
        ] {
            let (a, b) = apply_result(&outcome, &zero, &zero).unwrap();
            assert_eq!(a.sets_won, b.sets_lost);
            assert_eq!(a.sets_lost, b.sets_won);
            assert_eq!(a.matches_won + b.matches_won, 1);
            assert_eq!(a.matches_lost + b.matches_lost, 1);
            assert_eq!(a.points + b.points, POINTS_PER_WIN);
            assert_eq!(a.matches_won + a.matches_lost, a.matches_played);
        }
    }

    #[test]
    fn test_incomplete_outcome_is_rejected() {
        let sets = SetScore::numbered(&[(11, 5), (11, 7)]);
        let outcome = decide_outcome(&sets, MatchFormat::BestOf5);
        let zero = PlayerStatLine::default();

        assert_eq!(
            apply_result(&outcome, &zero, &zero),
            Err(EngineError::IncompleteMatchMutation {
                sets_won_a: 2,
                sets_won_b: 0,
            })
        );
    }

    #[test]
    fn test_inconsistent_outcome_is_rejected() {
        let outcome = MatchOutcome {
            sets_won_a: 2,
            sets_won_b: 0,
            winner: None,
            is_complete: true,
        };
        let zero = PlayerStatLine::default();
        assert!(matches!(
            apply_result(&outcome, &zero, &zero),
            Err(EngineError::IncompleteMatchMutation { .. })
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        let full = PlayerStatLine {
            points: u32::MAX,
            ..Default::default()
        };
        let zero = PlayerStatLine::default();
        assert_eq!(
            apply_result(&completed(2, 0, Side::A), &full, &zero),
            Err(EngineError::StatOverflow("points"))
        );
    }

    #[test]
    fn test_apply_then_revert_restores_totals() {
        let start = PlayerStatLine {
            matches_played: 4,
            matches_won: 3,
            matches_lost: 1,
            sets_won: 7,
            sets_lost: 3,
            points: 9,
        };
        let (delta, _) =
            apply_result(&completed(1, 2, Side::B), &start, &PlayerStatLine::default()).unwrap();

        let after = start.apply(&delta).unwrap();
        assert_eq!(after.matches_lost, 2);
        assert_eq!(after.points, 9);
        assert_eq!(after.revert(&delta).unwrap(), start);
    }

    #[test]
    fn test_revert_underflow() {
        let delta = PlayerStatLine {
            matches_played: 1,
            matches_won: 1,
            sets_won: 2,
            points: 3,
            ..Default::default()
        };
        assert_eq!(
            PlayerStatLine::default().revert(&delta),
            Err(EngineError::StatUnderflow("matches_played"))
        );
    }
}
