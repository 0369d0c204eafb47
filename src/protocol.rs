//! Message vocabulary exchanged between the lobby core and connected clients.
//!
//! Everything on the wire is a JSON object tagged by `type`, with the same
//! event names and camelCase field spellings the browser client speaks.

use serde::{Deserialize, Serialize};

/// 2D position reported by a client and relayed to the lobby
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// One participant as it appears in a roster broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: u32,
    pub name: String,
    pub position: Position,
}

/// Messages a client sends to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    CreateLobby { display_name: String },
    #[serde(rename_all = "camelCase")]
    JoinLobby { lobby_id: String, display_name: String },
    #[serde(rename_all = "camelCase")]
    StartGame { lobby_id: String },
    #[serde(rename_all = "camelCase")]
    Move { lobby_id: String, position: Position },
}

/// Events the server sends to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// To the creator only, after a successful create
    #[serde(rename_all = "camelCase")]
    LobbyCreated { lobby_id: String },
    /// To the joiner only, after a successful join
    #[serde(rename_all = "camelCase")]
    JoinedLobby { lobby_id: String },
    /// Full roster snapshot, to every member of the lobby
    PlayersUpdate { players: Vec<RosterEntry> },
    /// To every member when the host starts the game
    GameStarted,
    /// To a rejected joiner only
    JoinError { reason: String },
}
