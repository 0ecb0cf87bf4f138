//! League store: players, seasons, matches and season statistics.
//!
//! All mutating operations take `&mut self`. Whoever shares a store between
//! tasks must serialize writers (the API wraps it in an `RwLock`), so one
//! match submission's read-modify-write of the statistics rows never
//! interleaves with another's.

use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::{EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};
use crate::calculate::{apply_result, decide_outcome, playoff_status, rank, validate_sets};
use crate::models::{
    MatchFormat, MatchId, MatchOutcome, MatchPhase, MatchRecord, MatchStatus, Player, PlayerId,
    PlayerStatLine, PlayoffStatus, Season, SeasonId, SeasonStats, SetScore, Side, StandingsRow,
};

/// A match as submitted by a caller, before it has an ID or a verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMatch {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub match_date: NaiveDate,
    pub match_time: String,
    #[serde(default)]
    pub format: MatchFormat,
    #[serde(default)]
    pub phase: MatchPhase,
    #[serde(default)]
    pub sets: Vec<SetScore>,
}

/// The playoff picture for a season.
#[derive(Debug, Clone, Serialize)]
pub struct PlayoffView {
    #[serde(flatten)]
    pub status: PlayoffStatus<Player>,

    /// Set once both semifinals have been played.
    pub final_pairing: Option<(Player, Player)>,
}

pub struct LeagueStore {
    config: StorageConfig,
}

impl LeagueStore {
    pub fn open(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Create the storage directory and an active season if there is none.
    /// Safe to call on every start; a second call changes nothing.
    pub fn init(&mut self, default_season_name: &str) -> Result<Season, StorageError> {
        std::fs::create_dir_all(self.config.league_dir())?;

        if let Some(season) = self.active_season()? {
            debug!("Active season already present: {}", season.name);
            return Ok(season);
        }

        let season = Season::new(default_season_name.to_string(), Utc::now().date_naive());
        JsonlWriter::for_entity(&self.config, EntityType::Season).append(&season)?;

        let players = self.players()?;
        let mut stats = self.read_stats()?;
        for player in &players {
            stats_row(&mut stats, &season.id, &player.id);
        }
        self.write_stats(&stats)?;

        info!(
            "Initialized season '{}' with {} players",
            season.name,
            players.len()
        );
        Ok(season)
    }

    // ── Seasons ──────────────────────────────────────────────────

    pub fn seasons(&self) -> Result<Vec<Season>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Season).read_all()
    }

    /// The most recently created active season.
    pub fn active_season(&self) -> Result<Option<Season>, StorageError> {
        Ok(self
            .seasons()?
            .into_iter()
            .filter(Season::is_active)
            .max_by_key(|s| s.created_at))
    }

    fn require_active_season(&self) -> Result<Season, StorageError> {
        self.active_season()?.ok_or(StorageError::NoActiveSeason)
    }

    /// The given season (which must exist), or the active one when none is given.
    pub fn resolve_season(&self, season_id: Option<&SeasonId>) -> Result<SeasonId, StorageError> {
        match season_id {
            Some(id) => {
                if self.seasons()?.iter().any(|s| &s.id == id) {
                    Ok(id.clone())
                } else {
                    Err(StorageError::NotFound(format!("season {}", id)))
                }
            }
            None => Ok(self.require_active_season()?.id),
        }
    }

    // ── Players ──────────────────────────────────────────────────

    /// All players, ordered by name.
    pub fn players(&self) -> Result<Vec<Player>, StorageError> {
        let mut players: Vec<Player> =
            JsonlReader::for_entity(&self.config, EntityType::Player).read_all()?;
        players.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(players)
    }

    pub fn player(&self, id: &PlayerId) -> Result<Player, StorageError> {
        self.players()?
            .into_iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| StorageError::NotFound(format!("player {}", id)))
    }

    /// Register a player and give them a zeroed statistics row in the
    /// active season, if there is one.
    pub fn create_player(
        &mut self,
        name: &str,
        email: Option<&str>,
    ) -> Result<Player, StorageError> {
        let player = Player::new(name, email)?;

        if self.players()?.iter().any(|p| p.id == player.id) {
            return Err(StorageError::Conflict(format!(
                "a player named '{}' already exists",
                player.name
            )));
        }

        JsonlWriter::for_entity(&self.config, EntityType::Player).append(&player)?;

        if let Some(season) = self.active_season()? {
            let mut stats = self.read_stats()?;
            stats_row(&mut stats, &season.id, &player.id);
            self.write_stats(&stats)?;
        }

        info!("Registered player {} ({})", player.name, player.id);
        Ok(player)
    }

    // ── Matches ──────────────────────────────────────────────────

    /// Matches, most recent first.
    pub fn matches(&self, limit: Option<usize>) -> Result<Vec<MatchRecord>, StorageError> {
        let mut matches = self.read_matches()?;
        matches.sort_by(|a, b| {
            b.match_date
                .cmp(&a.match_date)
                .then_with(|| b.match_time.cmp(&a.match_time))
        });
        if let Some(limit) = limit {
            matches.truncate(limit);
        }
        Ok(matches)
    }

    pub fn match_by_id(&self, id: &MatchId) -> Result<MatchRecord, StorageError> {
        self.read_matches()?
            .into_iter()
            .find(|m| &m.id == id)
            .ok_or_else(|| StorageError::NotFound(format!("match {}", id)))
    }

    /// Record a new match in the active season.
    ///
    /// A finished championship match updates both players' statistics in the
    /// same operation. Unfinished matches are stored as scheduled or
    /// in-progress and leave statistics alone.
    pub fn create_match(&mut self, new: NewMatch) -> Result<MatchRecord, StorageError> {
        let season = self.require_active_season()?;

        if new.player1_id == new.player2_id {
            return Err(StorageError::Validation(
                "a player cannot play against themselves".to_string(),
            ));
        }
        self.player(&new.player1_id)?;
        self.player(&new.player2_id)?;
        let match_time = normalize_time(&new.match_time)?;
        validate_sets(&new.sets, new.format)?;

        let outcome = decide_outcome(&new.sets, new.format);
        let mut record = MatchRecord {
            id: MatchId::random(),
            season_id: season.id.clone(),
            player1_id: new.player1_id,
            player2_id: new.player2_id,
            match_date: new.match_date,
            match_time,
            format: new.format,
            status: MatchStatus::Scheduled,
            winner_id: None,
            phase: new.phase,
            sets: new.sets,
            created_at: Utc::now(),
        };
        settle(&mut record, &outcome);

        let previous = self.read_stats()?;
        let mut stats = previous.clone();
        let touches_stats = counts_toward_standings(&record);
        if touches_stats {
            fold_outcome(&mut stats, &record, &outcome)?;
        }

        self.commit(&previous, touches_stats.then_some(stats.as_slice()), || {
            JsonlWriter::for_entity(&self.config, EntityType::Match).append(&record)
        })?;

        info!(
            "Recorded {} match {}: {} ({})",
            record.phase,
            record.id,
            outcome.score_line(),
            record.status
        );
        Ok(record)
    }

    /// Replace a match's set scores.
    ///
    /// If the match had already been completed, its old contribution to the
    /// statistics is reverted before the new result is applied.
    pub fn update_match_scores(
        &mut self,
        id: &MatchId,
        sets: Vec<SetScore>,
    ) -> Result<MatchRecord, StorageError> {
        let mut matches = self.read_matches()?;
        let record = matches
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| StorageError::NotFound(format!("match {}", id)))?;

        if record.status == MatchStatus::Cancelled {
            return Err(StorageError::Conflict(format!(
                "match {} is cancelled and cannot be edited",
                id
            )));
        }
        validate_sets(&sets, record.format)?;

        let previous = self.read_stats()?;
        let mut stats = previous.clone();
        let touches_stats = counts_toward_standings(record);
        if touches_stats {
            unfold_recorded(&mut stats, record)?;
        }

        let outcome = decide_outcome(&sets, record.format);
        record.sets = sets;
        settle(record, &outcome);

        if touches_stats {
            fold_outcome(&mut stats, record, &outcome)?;
        }
        let updated = record.clone();

        self.commit(&previous, touches_stats.then_some(stats.as_slice()), || {
            JsonlWriter::for_entity(&self.config, EntityType::Match)
                .write_all(&matches)
                .map(|_| ())
        })?;

        info!(
            "Updated scores for match {}: {} ({})",
            updated.id,
            outcome.score_line(),
            updated.status
        );
        Ok(updated)
    }

    /// Mark a match as cancelled, taking back any statistics it produced.
    pub fn cancel_match(&mut self, id: &MatchId) -> Result<MatchRecord, StorageError> {
        let mut matches = self.read_matches()?;
        let record = matches
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| StorageError::NotFound(format!("match {}", id)))?;

        if record.status == MatchStatus::Cancelled {
            return Ok(record.clone());
        }

        let previous = self.read_stats()?;
        let mut stats = previous.clone();
        let touches_stats = counts_toward_standings(record);
        if touches_stats {
            unfold_recorded(&mut stats, record)?;
        }

        record.status = MatchStatus::Cancelled;
        record.winner_id = None;
        let cancelled = record.clone();

        self.commit(&previous, touches_stats.then_some(stats.as_slice()), || {
            JsonlWriter::for_entity(&self.config, EntityType::Match)
                .write_all(&matches)
                .map(|_| ())
        })?;

        info!("Cancelled match {}", cancelled.id);
        Ok(cancelled)
    }

    // ── Standings ────────────────────────────────────────────────

    /// Statistics rows for a season (default: the active one), with players,
    /// ordered by player name.
    pub fn stats(
        &self,
        season_id: Option<&SeasonId>,
    ) -> Result<Vec<(Player, SeasonStats)>, StorageError> {
        let season_id = self.resolve_season(season_id)?;
        let stats = self.read_stats()?;

        let rows = self
            .players()?
            .into_iter()
            .map(|player| {
                let row = stats
                    .iter()
                    .find(|s| s.season_id == season_id && s.player_id == player.id)
                    .cloned()
                    .unwrap_or_else(|| SeasonStats::new(season_id.clone(), player.id.clone()));
                (player, row)
            })
            .collect();
        Ok(rows)
    }

    /// The season's standings table. Players tied on every criterion stay in
    /// name order.
    pub fn standings(
        &self,
        season_id: Option<&SeasonId>,
    ) -> Result<Vec<StandingsRow<Player>>, StorageError> {
        let rows = self.stats(season_id)?;
        Ok(rank(rows.into_iter().map(|(p, s)| (p, s.stats))))
    }

    /// Playoff bracket for a season, plus the final pairing once both
    /// semifinals have a winner.
    pub fn playoffs(&self, season_id: Option<&SeasonId>) -> Result<PlayoffView, StorageError> {
        let season_id = self.resolve_season(season_id)?;
        let standings = self.standings(Some(&season_id))?;
        let status = playoff_status(&standings);

        let final_pairing = match &status {
            PlayoffStatus::Ready { bracket } => {
                let semifinals: Vec<MatchRecord> = self
                    .read_matches()?
                    .into_iter()
                    .filter(|m| {
                        m.season_id == season_id
                            && m.phase == MatchPhase::Semifinal
                            && m.status == MatchStatus::Completed
                    })
                    .collect();

                let sf1 = semifinal_winner(
                    &semifinals,
                    &bracket.semifinal_1.high,
                    &bracket.semifinal_1.low,
                );
                let sf2 = semifinal_winner(
                    &semifinals,
                    &bracket.semifinal_2.high,
                    &bracket.semifinal_2.low,
                );
                match (sf1, sf2) {
                    (Some(w1), Some(w2)) => Some(bracket.final_pairing(w1, w2)),
                    _ => None,
                }
            }
            PlayoffStatus::NotYetAvailable { .. } => None,
        };

        Ok(PlayoffView {
            status,
            final_pairing,
        })
    }

    // ── Raw file access ──────────────────────────────────────────

    fn read_matches(&self) -> Result<Vec<MatchRecord>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Match).read_all()
    }

    fn read_stats(&self) -> Result<Vec<SeasonStats>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::PlayerStats).read_all()
    }

    fn write_stats(&self, stats: &[SeasonStats]) -> Result<(), StorageError> {
        JsonlWriter::for_entity(&self.config, EntityType::PlayerStats).write_all(stats)?;
        Ok(())
    }

    /// Persist one match mutation. New statistics (if any) are written
    /// first; when the match write then fails, `previous` is written back so
    /// the stats file never counts a result the match file does not hold.
    fn commit<F>(
        &self,
        previous: &[SeasonStats],
        stats: Option<&[SeasonStats]>,
        write_match: F,
    ) -> Result<(), StorageError>
    where
        F: FnOnce() -> Result<(), StorageError>,
    {
        if let Some(stats) = stats {
            self.write_stats(stats)?;
        }

        if let Err(err) = write_match() {
            if stats.is_some() {
                if let Err(restore) = self.write_stats(previous) {
                    error!(
                        "Could not restore statistics after failed match write: {}",
                        restore
                    );
                }
            }
            return Err(err);
        }
        Ok(())
    }
}

fn counts_toward_standings(record: &MatchRecord) -> bool {
    record.phase.counts_toward_standings()
}

/// Set status and winner from a freshly computed outcome.
fn settle(record: &mut MatchRecord, outcome: &MatchOutcome) {
    record.winner_id = outcome.winner.map(|side| match side {
        Side::A => record.player1_id.clone(),
        Side::B => record.player2_id.clone(),
    });
    record.status = if outcome.is_complete {
        MatchStatus::Completed
    } else if record.sets.is_empty() {
        MatchStatus::Scheduled
    } else {
        MatchStatus::InProgress
    };
}

/// Statistics row for (season, player), created zeroed if missing.
fn stats_row<'a>(
    stats: &'a mut Vec<SeasonStats>,
    season_id: &SeasonId,
    player_id: &PlayerId,
) -> &'a mut SeasonStats {
    let idx = match stats
        .iter()
        .position(|s| &s.season_id == season_id && &s.player_id == player_id)
    {
        Some(idx) => idx,
        None => {
            stats.push(SeasonStats::new(season_id.clone(), player_id.clone()));
            stats.len() - 1
        }
    };
    &mut stats[idx]
}

fn current_line(
    stats: &mut Vec<SeasonStats>,
    season_id: &SeasonId,
    player_id: &PlayerId,
) -> PlayerStatLine {
    stats_row(stats, season_id, player_id).stats
}

/// Apply a completed outcome's deltas to both players. Incomplete outcomes
/// leave statistics untouched.
fn fold_outcome(
    stats: &mut Vec<SeasonStats>,
    record: &MatchRecord,
    outcome: &MatchOutcome,
) -> Result<(), StorageError> {
    if !outcome.is_complete {
        return Ok(());
    }

    let current_a = current_line(stats, &record.season_id, &record.player1_id);
    let current_b = current_line(stats, &record.season_id, &record.player2_id);
    let (delta_a, delta_b) = apply_result(outcome, &current_a, &current_b)?;

    for (player_id, current, delta) in [
        (&record.player1_id, current_a, delta_a),
        (&record.player2_id, current_b, delta_b),
    ] {
        let row = stats_row(stats, &record.season_id, player_id);
        row.stats = current.apply(&delta)?;
        row.updated_at = Utc::now();
    }
    Ok(())
}

/// Take back what a stored match contributed, if it was completed.
fn unfold_recorded(stats: &mut Vec<SeasonStats>, record: &MatchRecord) -> Result<(), StorageError> {
    if record.status != MatchStatus::Completed {
        return Ok(());
    }

    let outcome = decide_outcome(&record.sets, record.format);
    if !outcome.is_complete {
        warn!(
            "Match {} is marked completed but its sets do not decide it; nothing to revert",
            record.id
        );
        return Ok(());
    }

    let current_a = current_line(stats, &record.season_id, &record.player1_id);
    let current_b = current_line(stats, &record.season_id, &record.player2_id);
    let (delta_a, delta_b) = apply_result(&outcome, &current_a, &current_b)?;

    for (player_id, current, delta) in [
        (&record.player1_id, current_a, delta_a),
        (&record.player2_id, current_b, delta_b),
    ] {
        let row = stats_row(stats, &record.season_id, player_id);
        row.stats = current.revert(&delta)?;
        row.updated_at = Utc::now();
    }
    debug!("Reverted statistics of match {}", record.id);
    Ok(())
}

fn semifinal_winner(semifinals: &[MatchRecord], high: &Player, low: &Player) -> Option<Side> {
    let winner = semifinals
        .iter()
        .find(|m| m.is_between(&high.id, &low.id))?
        .winner_id
        .as_ref()?;
    if winner == &high.id {
        Some(Side::A)
    } else if winner == &low.id {
        Some(Side::B)
    } else {
        None
    }
}

/// Accept "H:MM" or "HH:MM" and store it as "HH:MM".
fn normalize_time(raw: &str) -> Result<String, StorageError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| {
            StorageError::Validation(format!("invalid match time '{}' (expected HH:MM)", raw))
        })
}
