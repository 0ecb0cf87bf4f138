//! Core data models for the league.

mod error;
mod ids;
mod match_record;
mod outcome;
mod player;
mod season;
mod standings;
mod stats;

pub use error::*;
pub use ids::*;
pub use match_record::*;
pub use outcome::*;
pub use player::*;
pub use season::*;
pub use standings::*;
pub use stats::*;
