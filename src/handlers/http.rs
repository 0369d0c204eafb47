//! Read-only HTTP inspection endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::protocol::RosterEntry;
use crate::service::LobbyService;
use crate::state::{Lobby, LobbyPhase};

/// App state shared by the HTTP and WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LobbyService>,
    pub config: Arc<Config>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LobbySummary {
    pub id: String,
    pub phase: String,
    pub player_count: usize,
    pub capacity: usize,
    pub players: Vec<RosterEntry>,
}

pub async fn list_lobbies(State(app): State<AppState>) -> Json<Vec<LobbySummary>> {
    let mut lobbies = Vec::new();
    for (_, lobby) in app.service.registry().snapshot() {
        let guard = lobby.read().await;
        lobbies.push(summarize(&guard));
    }
    Json(lobbies)
}

pub async fn get_lobby(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LobbySummary>, StatusCode> {
    let lobby = app
        .service
        .registry()
        .get(&id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let guard = lobby.read().await;
    Ok(Json(summarize(&guard)))
}

fn summarize(lobby: &Lobby) -> LobbySummary {
    let phase = match lobby.phase() {
        LobbyPhase::Waiting => "waiting",
        LobbyPhase::Running => "running",
    };
    LobbySummary {
        id: lobby.id().to_string(),
        phase: phase.to_string(),
        player_count: lobby.len(),
        capacity: lobby.capacity(),
        players: lobby.roster(),
    }
}
