//! # King League
//!
//! A local table tennis club tracker: championship standings and a top-four
//! playoff bracket.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, seasons, matches, stat lines)
//! - **calculate**: Standings engine (match outcome, stat deltas, ranking, bracket)
//! - **storage**: Filesystem data store (JSONL) and the league store
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
