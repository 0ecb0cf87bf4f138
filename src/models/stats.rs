//! Per-player season statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PlayerId, SeasonId};

/// Running totals for one player in one season.
///
/// The same shape doubles as a delta: the change one completed match makes
/// to a player's totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub matches_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub points: u32,
}

impl PlayerStatLine {
    pub fn set_differential(&self) -> i64 {
        i64::from(self.sets_won) - i64::from(self.sets_lost)
    }

    pub fn has_played(&self) -> bool {
        self.matches_played > 0
    }
}

/// Stored statistics row, keyed by (season, player).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonStats {
    pub season_id: SeasonId,
    pub player_id: PlayerId,
    #[serde(flatten)]
    pub stats: PlayerStatLine,
    pub updated_at: DateTime<Utc>,
}

impl SeasonStats {
    pub fn new(season_id: SeasonId, player_id: PlayerId) -> Self {
        Self {
            season_id,
            player_id,
            stats: PlayerStatLine::default(),
            updated_at: Utc::now(),
        }
    }
}
