//! League seasons. Statistics are kept per season.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, SeasonId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonStatus {
    Active,
    Completed,
    Paused,
}

impl std::fmt::Display for SeasonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeasonStatus::Active => write!(f, "active"),
            SeasonStatus::Completed => write!(f, "completed"),
            SeasonStatus::Paused => write!(f, "paused"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: SeasonStatus,
    pub created_at: DateTime<Utc>,
}

impl Season {
    /// Create an active season; the ID is derived from name and start date.
    pub fn new(name: String, start_date: NaiveDate) -> Self {
        let id = EntityId::generate(&["season", &name, &start_date.to_string()]);
        Self {
            id,
            name,
            start_date,
            end_date: None,
            status: SeasonStatus::Active,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SeasonStatus::Active
    }
}
