//! Registered club players.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ModelError, PlayerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Build a player from raw form input. The name is trimmed and must not
    /// be empty; a blank email is treated as absent.
    pub fn new(name: &str, email: Option<&str>) -> Result<Self, ModelError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelError::InvalidPlayer("name is required".to_string()));
        }

        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        Ok(Self {
            id: PlayerId::for_player(name),
            name: name.to_string(),
            email,
            avatar_url: None,
            created_at: Utc::now(),
        })
    }
}
