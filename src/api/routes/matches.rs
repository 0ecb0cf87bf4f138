use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::decide_outcome;
use crate::models::{MatchId, MatchRecord, Player, PlayerId, SetScore};
use crate::storage::{LeagueStore, NewMatch};

#[derive(Debug, Deserialize)]
pub struct ListMatchesParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateScoresRequest {
    pub sets: Vec<SetScore>,
}

/// A stored match with player names and the set score resolved.
#[derive(Debug, Serialize)]
pub struct MatchSummary {
    #[serde(flatten)]
    pub record: MatchRecord,
    pub player1_name: Option<String>,
    pub player2_name: Option<String>,
    pub winner_name: Option<String>,
    /// Sets won, player 1 first, e.g. "2-1"
    pub score: String,
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub matches: Vec<MatchSummary>,
}

fn summarize(record: MatchRecord, names: &HashMap<PlayerId, String>) -> MatchSummary {
    let name_of = |id: &PlayerId| names.get(id).cloned();
    let score = decide_outcome(&record.sets, record.format).score_line();
    MatchSummary {
        player1_name: name_of(&record.player1_id),
        player2_name: name_of(&record.player2_id),
        winner_name: record.winner_id.as_ref().and_then(name_of),
        score,
        record,
    }
}

fn player_names(store: &LeagueStore) -> Result<HashMap<PlayerId, String>, ApiError> {
    Ok(store
        .players()?
        .into_iter()
        .map(|p: Player| (p.id, p.name))
        .collect())
}

pub async fn list_matches(
    State(state): State<AppState>,
    Query(params): Query<ListMatchesParams>,
) -> Result<Json<MatchListResponse>, ApiError> {
    let store = state.store.read().await;
    let names = player_names(&store)?;
    let matches = store
        .matches(params.limit)?
        .into_iter()
        .map(|m| summarize(m, &names))
        .collect();
    Ok(Json(MatchListResponse { matches }))
}

pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MatchSummary>, ApiError> {
    let store = state.store.read().await;
    let record = store.match_by_id(&MatchId::from(id))?;
    Ok(Json(summarize(record, &player_names(&store)?)))
}

pub async fn create_match(
    State(state): State<AppState>,
    Json(req): Json<NewMatch>,
) -> Result<(StatusCode, Json<MatchSummary>), ApiError> {
    let mut store = state.store.write().await;
    let record = store.create_match(req)?;
    let summary = summarize(record, &player_names(&store)?);
    Ok((StatusCode::CREATED, Json(summary)))
}

pub async fn update_scores(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateScoresRequest>,
) -> Result<Json<MatchSummary>, ApiError> {
    let mut store = state.store.write().await;
    let record = store.update_match_scores(&MatchId::from(id), req.sets)?;
    Ok(Json(summarize(record, &player_names(&store)?)))
}

pub async fn cancel_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MatchSummary>, ApiError> {
    let mut store = state.store.write().await;
    let record = store.cancel_match(&MatchId::from(id))?;
    Ok(Json(summarize(record, &player_names(&store)?)))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::api::test_support::*;
    use axum::http::StatusCode;
    use serde_json::{json, Value};

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

    fn match_body(p1: &str, p2: &str, format: &str, sets: &[(u32, u32)]) -> String {
        let sets: Vec<Value> = sets
            .iter()
            .enumerate()
            .map(|(i, (a, b))| {
                json!({"set_number": i + 1, "player1_score": a, "player2_score": b})
            })
            .collect();
        json!({
            "player1_id": p1,
            "player2_id": p2,
            "match_date": "2025-10-04",
            "match_time": "18:30",
            "format": format,
            "sets": sets,
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_create_completed_match() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());
        let alice = add_player(&state, "Alice").await;
        let bob = add_player(&state, "Bob").await;

        let body = match_body(&alice, &bob, "best-of-3", &[(11, 5), (7, 11), (11, 9)]);
        let (status, json) = send(
            build_router(state.clone()),
            "POST",
            "/api/matches",
            Some(body.as_str()),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["status"], "completed");
        assert_eq!(json["phase"], "championship");
        assert_eq!(json["winner_id"], alice.as_str());
        assert_eq!(json["winner_name"], "Alice");
        assert_eq!(json["score"], "2-1");
        assert_eq!(json["sets"].as_array().unwrap().len(), 3);

        let (status, json) = get_json(build_router(state), "/api/matches?limit=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["matches"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_scores_and_cancel() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());
        let alice = add_player(&state, "Alice").await;
        let bob = add_player(&state, "Bob").await;

        let body = match_body(&alice, &bob, "best-of-5", &[]);
        let (_, json) = send(
            build_router(state.clone()),
            "POST",
            "/api/matches",
            Some(body.as_str()),
        )
        .await;
        assert_eq!(json["status"], "scheduled");
        let id = json["id"].as_str().unwrap().to_string();

        let sets = json!({"sets": [
            {"set_number": 1, "player1_score": 4, "player2_score": 11},
            {"set_number": 2, "player1_score": 6, "player2_score": 11},
            {"set_number": 3, "player1_score": 9, "player2_score": 11},
        ]})
        .to_string();
        let (status, json) = send(
            build_router(state.clone()),
            "PUT",
            &format!("/api/matches/{}/sets", id),
            Some(sets.as_str()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "completed");
        assert_eq!(json["winner_name"], "Bob");

        let (status, json) = send(
            build_router(state.clone()),
            "POST",
            &format!("/api/matches/{}/cancel", id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "cancelled");

        let (status, _) = send(
            build_router(state),
            "PUT",
            &format!("/api/matches/{}/sets", id),
            Some(sets.as_str()),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_invalid_matches_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());
        let alice = add_player(&state, "Alice").await;
        let bob = add_player(&state, "Bob").await;

        let too_many = match_body(
            &alice,
            &bob,
            "best-of-3",
            &[(11, 1), (1, 11), (11, 1), (11, 1)],
        );
        let (status, _) = send(
            build_router(state.clone()),
            "POST",
            "/api/matches",
            Some(too_many.as_str()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let self_match = match_body(&alice, &alice, "best-of-3", &[]);
        let (status, _) = send(
            build_router(state.clone()),
            "POST",
            "/api/matches",
            Some(self_match.as_str()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let unknown = match_body(&alice, "ghost", "best-of-3", &[]);
        let (status, _) = send(
            build_router(state.clone()),
            "POST",
            "/api/matches",
            Some(unknown.as_str()),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json(build_router(state), "/api/matches/ghost").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
