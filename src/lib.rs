//! Real-time multiplayer session coordinator.
//!
//! Clients form a lobby, agree on a roster, and once the host starts the
//! game every position update is relayed to all members as a full roster
//! snapshot. The state machine lives behind [`service::LobbyService`] and
//! is transport-agnostic; `handlers::ws` adapts it to WebSocket clients.

pub mod config;
pub mod connection;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod service;
pub mod state;

pub use config::Config;
pub use connection::{ConnectionHandle, ConnectionId};
pub use error::{LobbyError, Result};
pub use protocol::{ClientMessage, Position, RosterEntry, ServerEvent};
pub use service::LobbyService;
pub use state::{Lobby, LobbyId, LobbyPhase, LobbyRegistry, Participant};
