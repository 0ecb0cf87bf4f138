//! Filesystem persistence for league data.
//!
//! Every entity type lives in its own JSONL file under `<data_dir>/league/`.
//! [`LeagueStore`] is the only writer and owns the read-modify-write of
//! match results into season statistics.

mod jsonl;
mod league;

pub use jsonl::*;
pub use league::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::calculate::EngineError;
use crate::models::ModelError;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No active season; run `king-league init` first")]
    NoActiveSeason,
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn league_dir(&self) -> PathBuf {
        self.data_dir.join("league")
    }

    pub fn entity_path(&self, entity: EntityType) -> PathBuf {
        self.league_dir().join(entity.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
