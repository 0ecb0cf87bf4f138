//! Match records and the set scores they carry.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{MatchId, ModelError, PlayerId, SeasonId};

/// How many sets a match is played over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchFormat {
    #[default]
    #[serde(rename = "best-of-3")]
    BestOf3,
    #[serde(rename = "best-of-5")]
    BestOf5,
}

impl MatchFormat {
    /// Set wins needed to take the match.
    pub fn sets_to_win(&self) -> u32 {
        match self {
            MatchFormat::BestOf3 => 2,
            MatchFormat::BestOf5 => 3,
        }
    }

    /// Upper bound on the number of sets one match can contain.
    pub fn max_sets(&self) -> u32 {
        2 * self.sets_to_win() - 1
    }
}

impl std::fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchFormat::BestOf3 => write!(f, "best-of-3"),
            MatchFormat::BestOf5 => write!(f, "best-of-5"),
        }
    }
}

impl FromStr for MatchFormat {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best-of-3" | "bo3" | "3" => Ok(MatchFormat::BestOf3),
            "best-of-5" | "bo5" | "5" => Ok(MatchFormat::BestOf5),
            other => Err(ModelError::InvalidFormatInput(format!(
                "unknown match format '{}' (expected best-of-3 or best-of-5)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Scheduled => write!(f, "scheduled"),
            MatchStatus::InProgress => write!(f, "in-progress"),
            MatchStatus::Completed => write!(f, "completed"),
            MatchStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Stage of the season a match belongs to. Only championship matches
/// count toward the standings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    #[default]
    Championship,
    Semifinal,
    Final,
}

impl MatchPhase {
    pub fn counts_toward_standings(&self) -> bool {
        matches!(self, MatchPhase::Championship)
    }
}

impl std::fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchPhase::Championship => write!(f, "championship"),
            MatchPhase::Semifinal => write!(f, "semifinal"),
            MatchPhase::Final => write!(f, "final"),
        }
    }
}

impl FromStr for MatchPhase {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "championship" => Ok(MatchPhase::Championship),
            "semifinal" => Ok(MatchPhase::Semifinal),
            "final" => Ok(MatchPhase::Final),
            other => Err(ModelError::InvalidFormatInput(format!(
                "unknown match phase '{}'",
                other
            ))),
        }
    }
}

/// Score of one set. Side A is player 1 of the match, side B player 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub set_number: u32,
    #[serde(rename = "player1_score")]
    pub score_a: u32,
    #[serde(rename = "player2_score")]
    pub score_b: u32,
}

impl SetScore {
    pub fn new(set_number: u32, score_a: u32, score_b: u32) -> Self {
        Self {
            set_number,
            score_a,
            score_b,
        }
    }

    /// Number the given `(a, b)` scores 1, 2, 3... in order.
    pub fn numbered(scores: &[(u32, u32)]) -> Vec<SetScore> {
        scores
            .iter()
            .zip(1..)
            .map(|(&(a, b), n)| SetScore::new(n, a, b))
            .collect()
    }
}

/// A match between two players, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,

    pub season_id: SeasonId,

    pub player1_id: PlayerId,

    pub player2_id: PlayerId,

    pub match_date: NaiveDate,

    /// Local start time, "HH:MM"
    pub match_time: String,

    pub format: MatchFormat,

    pub status: MatchStatus,

    pub winner_id: Option<PlayerId>,

    #[serde(default)]
    pub phase: MatchPhase,

    #[serde(default)]
    pub sets: Vec<SetScore>,

    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    /// True if this match is between exactly these two players, in either order.
    pub fn is_between(&self, a: &PlayerId, b: &PlayerId) -> bool {
        (&self.player1_id == a && &self.player2_id == b)
            || (&self.player1_id == b && &self.player2_id == a)
    }
}
