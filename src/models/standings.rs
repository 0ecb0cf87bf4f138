//! Standings table and playoff bracket shapes.

use serde::{Deserialize, Serialize};

use super::{PlayerStatLine, Side};

/// Number of players that qualify for the playoffs.
pub const PLAYOFF_SIZE: usize = 4;

/// One line of the standings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow<T> {
    /// 1-based position; every row gets a distinct rank
    pub rank: u32,
    pub player: T,
    pub stats: PlayerStatLine,
}

/// Two seeded players meeting in a semifinal. `high` is the better seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semifinal<T> {
    pub high_seed: u32,
    pub high: T,
    pub low_seed: u32,
    pub low: T,
}

impl<T: Clone> Semifinal<T> {
    /// The player on the given side; the high seed plays as side A.
    pub fn player(&self, side: Side) -> T {
        match side {
            Side::A => self.high.clone(),
            Side::B => self.low.clone(),
        }
    }
}

/// Fixed four-player single-elimination bracket: 1 v 4 and 2 v 3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffBracket<T> {
    pub semifinal_1: Semifinal<T>,
    pub semifinal_2: Semifinal<T>,
}

/// Whether the playoffs can be drawn from the current standings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlayoffStatus<T> {
    NotYetAvailable { players_with_matches: usize },
    Ready { bracket: PlayoffBracket<T> },
}
