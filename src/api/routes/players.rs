use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Player, PlayerId};

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub players: Vec<Player>,
}

pub async fn list_players(State(state): State<AppState>) -> Result<Json<PlayersResponse>, ApiError> {
    let store = state.store.read().await;
    let players = store.players()?;
    Ok(Json(PlayersResponse { players }))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.player(&PlayerId::from(id))?))
}

pub async fn create_player(
    State(state): State<AppState>,
    Json(req): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let mut store = state.store.write().await;
    let player = store.create_player(&req.name, req.email.as_deref())?;
    Ok((StatusCode::CREATED, Json(player)))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_create_and_list_players() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = send(
            build_router(state.clone()),
            "POST",
            "/api/players",
            Some(r#"{"name": "  Zoe ", "email": "zoe@club.fr"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["name"], "Zoe");
        let zoe_id = json["id"].as_str().unwrap().to_string();

        send(
            build_router(state.clone()),
            "POST",
            "/api/players",
            Some(r#"{"name": "Adam"}"#),
        )
        .await;

        let (status, json) = get_json(build_router(state.clone()), "/api/players").await;
        assert_eq!(status, StatusCode::OK);
        let players = json["players"].as_array().unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0]["name"], "Adam");

        let (status, json) =
            get_json(build_router(state), &format!("/api/players/{}", zoe_id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["email"], "zoe@club.fr");
    }

    #[tokio::test]
    async fn test_create_player_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_test_state(tmp.path());

        let (status, json) = send(
            build_router(state.clone()),
            "POST",
            "/api/players",
            Some(r#"{"name": " "}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");

        send(
            build_router(state.clone()),
            "POST",
            "/api/players",
            Some(r#"{"name": "Alice"}"#),
        )
        .await;
        let (status, _) = send(
            build_router(state),
            "POST",
            "/api/players",
            Some(r#"{"name": "ALICE"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
