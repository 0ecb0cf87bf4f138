use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Player, PlayerId, Season, SeasonId, StandingsRow};
use crate::storage::PlayoffView;

#[derive(Debug, Deserialize)]
pub struct SeasonParams {
    pub season: Option<String>,
}

impl SeasonParams {
    fn season_id(&self) -> Option<SeasonId> {
        self.season.as_deref().map(SeasonId::from)
    }
}

#[derive(Debug, Serialize)]
pub struct SeasonsResponse {
    pub seasons: Vec<Season>,
}

/// One standings line, flattened for table rendering.
#[derive(Debug, Serialize)]
pub struct StandingsLine {
    pub rank: u32,
    pub player_id: PlayerId,
    pub player_name: String,
    pub matches_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub set_differential: i64,
    pub points: u32,
}

impl From<StandingsRow<Player>> for StandingsLine {
    fn from(row: StandingsRow<Player>) -> Self {
        let stats = row.stats;
        Self {
            rank: row.rank,
            player_id: row.player.id,
            player_name: row.player.name,
            matches_played: stats.matches_played,
            matches_won: stats.matches_won,
            matches_lost: stats.matches_lost,
            sets_won: stats.sets_won,
            sets_lost: stats.sets_lost,
            set_differential: stats.set_differential(),
            points: stats.points,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub season_id: SeasonId,
    pub standings: Vec<StandingsLine>,
}

pub async fn list_seasons(State(state): State<AppState>) -> Result<Json<SeasonsResponse>, ApiError> {
    let store = state.store.read().await;
    let seasons = store.seasons()?;
    Ok(Json(SeasonsResponse { seasons }))
}

pub async fn get_standings(
    State(state): State<AppState>,
    Query(params): Query<SeasonParams>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let store = state.store.read().await;
    let season_id = store.resolve_season(params.season_id().as_ref())?;
    let standings = store
        .standings(Some(&season_id))?
        .into_iter()
        .map(StandingsLine::from)
        .collect();
    Ok(Json(StandingsResponse {
        season_id,
        standings,
    }))
}

pub async fn get_playoffs(
    State(state): State<AppState>,
    Query(params): Query<SeasonParams>,
) -> Result<Json<PlayoffView>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.playoffs(params.season_id().as_ref())?))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::api::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn add_player(state: &AppState, name: &str) -> String {
        let body = json!({ "name": name }).to_string();
        let (_, json) = send(
            build_router(state.clone()),
            "POST",
            "/api/players",
            Some(body.as_str()),
        )
        .await;
        json["id"].as_str().unwrap().to_string()
    }

    async fn play(state: &AppState, p1: &str, p2: &str, phase: &str, sets: &[(u32, u32)]) {
        let sets: Vec<_> = sets
            .iter()
            .enumerate()
            .map(|(i, (a, b))| {
                json!({"set_number": i + 1, "player1_score": a, "player2_score": b})
            })
            .collect();
        let body = json!({
            "player1_id": p1,
            "player2_id": p2,
            "match_date": "2025-11-08",
            "match_time": "19:00",
            "phase": phase,
            "sets": sets,
        })
        .to_string();
        let (status, _) = send(
            build_router(state.clone()),
            "POST",
            "/api/matches",
            Some(body.as_str()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_seasons_lists_default_season() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/seasons").await;
        assert_eq!(status, StatusCode::OK);
        let seasons = json["seasons"].as_array().unwrap();
        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0]["name"], "Season 1");
        assert_eq!(seasons[0]["status"], "active");
    }

    #[tokio::test]
    async fn test_standings_order() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());
        let ana = add_player(&state, "Ana").await;
        let ben = add_player(&state, "Ben").await;
        let cleo = add_player(&state, "Cleo").await;

        play(&state, &ana, &ben, "championship", &[(11, 3), (11, 4)]).await;
        play(&state, &cleo, &ben, "championship", &[(11, 9), (8, 11), (11, 7)]).await;

        let (status, json) = get_json(build_router(state), "/api/standings").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json["standings"].as_array().unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0]["player_name"], "Ana");
        assert_eq!(rows[0]["rank"], 1);
        assert_eq!(rows[0]["points"], 3);
        assert_eq!(rows[0]["set_differential"], 2);

        assert_eq!(rows[1]["player_name"], "Cleo");
        assert_eq!(rows[1]["set_differential"], 1);

        assert_eq!(rows[2]["player_name"], "Ben");
        assert_eq!(rows[2]["matches_played"], 2);
        assert_eq!(rows[2]["matches_lost"], 2);
        assert_eq!(rows[2]["set_differential"], -3);
        assert_eq!(rows[2]["points"], 0);
    }

    #[tokio::test]
    async fn test_standings_unknown_season() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, _) = get_json(app, "/api/standings?season=nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_playoffs_not_yet_available() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());
        let ana = add_player(&state, "Ana").await;
        let ben = add_player(&state, "Ben").await;
        add_player(&state, "Cleo").await;
        add_player(&state, "Dan").await;
        play(&state, &ana, &ben, "championship", &[(11, 3), (11, 4)]).await;

        let (status, json) = get_json(build_router(state), "/api/playoffs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "not_yet_available");
        assert_eq!(json["players_with_matches"], 2);
        assert!(json["final_pairing"].is_null());
    }

    #[tokio::test]
    async fn test_playoffs_bracket_and_final() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());
        let ana = add_player(&state, "Ana").await;
        let ben = add_player(&state, "Ben").await;
        let cleo = add_player(&state, "Cleo").await;
        let dan = add_player(&state, "Dan").await;

        // Ana +2, Cleo +1, Dan -1, Ben -2
        play(&state, &ana, &ben, "championship", &[(11, 3), (11, 4)]).await;
        play(&state, &cleo, &dan, "championship", &[(11, 9), (8, 11), (11, 7)]).await;

        let (_, json) = get_json(build_router(state.clone()), "/api/playoffs").await;
        assert_eq!(json["status"], "ready");
        let sf1 = &json["bracket"]["semifinal_1"];
        assert_eq!(sf1["high"]["name"], "Ana");
        assert_eq!(sf1["low_seed"], 4);
        assert_eq!(sf1["low"]["name"], "Ben");
        let sf2 = &json["bracket"]["semifinal_2"];
        assert_eq!(sf2["high"]["name"], "Cleo");
        assert_eq!(sf2["low"]["name"], "Dan");
        assert!(json["final_pairing"].is_null());

        // Upset in the first semifinal; playoff matches leave the table alone.
        play(&state, &ana, &ben, "semifinal", &[(5, 11), (9, 11)]).await;
        play(&state, &cleo, &dan, "semifinal", &[(11, 2), (11, 6)]).await;

        let (_, json) = get_json(build_router(state.clone()), "/api/playoffs").await;
        assert_eq!(json["status"], "ready");
        assert_eq!(json["final_pairing"][0]["name"], "Ben");
        assert_eq!(json["final_pairing"][1]["name"], "Cleo");

        let (_, json) = get_json(build_router(state), "/api/standings").await;
        assert_eq!(json["standings"][0]["player_name"], "Ana");
        assert_eq!(json["standings"][0]["matches_played"], 1);
    }
}
