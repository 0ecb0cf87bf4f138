use crate::models::{PlayoffBracket, PlayoffStatus, Semifinal, Side, StandingsRow, PLAYOFF_SIZE};

/// Decide whether the playoffs can be drawn and, if so, draw them from the
/// first four rows of the standings that belong to players with a match.
///
/// At least four players must have played a match; otherwise the bracket is
/// reported as not yet available rather than drawn partially. A player who
/// has not played never takes a seed, even when a winless player ranks below
/// them on set differential.
pub fn playoff_status<T: Clone>(standings: &[StandingsRow<T>]) -> PlayoffStatus<T> {
    let players_with_matches = standings.iter().filter(|r| r.stats.has_played()).count();
    if players_with_matches < PLAYOFF_SIZE {
        return PlayoffStatus::NotYetAvailable {
            players_with_matches,
        };
    }

    let top: Vec<T> = standings
        .iter()
        .filter(|r| r.stats.has_played())
        .take(PLAYOFF_SIZE)
        .map(|r| r.player.clone())
        .collect();

    match <[T; PLAYOFF_SIZE]>::try_from(top) {
        Ok(top) => PlayoffStatus::Ready {
            bracket: bracket(top),
        },
        // Unreachable: at least PLAYOFF_SIZE rows passed the filter above.
        Err(_) => PlayoffStatus::NotYetAvailable {
            players_with_matches,
        },
    }
}

/// Seed 1 plays seed 4, seed 2 plays seed 3.
pub fn bracket<T>(top: [T; PLAYOFF_SIZE]) -> PlayoffBracket<T> {
    let [first, second, third, fourth] = top;
    PlayoffBracket {
        semifinal_1: Semifinal {
            high_seed: 1,
            high: first,
            low_seed: 4,
            low: fourth,
        },
        semifinal_2: Semifinal {
            high_seed: 2,
            high: second,
            low_seed: 3,
            low: third,
        },
    }
}

impl<T: Clone> PlayoffBracket<T> {
    /// The final: winner of semifinal 1 (as side A) against winner of semifinal 2.
    pub fn final_pairing(&self, semifinal_1_winner: Side, semifinal_2_winner: Side) -> (T, T) {
        (
            self.semifinal_1.player(semifinal_1_winner),
            self.semifinal_2.player(semifinal_2_winner),
        )
    }
}
