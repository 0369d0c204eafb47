//! Dispatch of inbound client messages to the lobby state machine, and the
//! disconnect handler that repairs lobby invariants when a channel drops.
//!
//! Each operation validates, mutates, and fans out under a single write
//! lock on the target lobby; different lobbies proceed in parallel.

use std::sync::Arc;

use crate::config::Config;
use crate::connection::{ConnectionHandle, ConnectionId};
use crate::error::{LobbyError, Result};
use crate::protocol::{ClientMessage, Position, ServerEvent};
use crate::state::{LobbyId, LobbyRegistry, Participant};

pub struct LobbyService {
    registry: LobbyRegistry,
}

impl LobbyService {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            registry: LobbyRegistry::new(config),
        }
    }

    pub fn registry(&self) -> &LobbyRegistry {
        &self.registry
    }

    /// Route one inbound message. The returned error is the observable
    /// outcome for failures the protocol keeps silent (stale start/move).
    pub async fn dispatch(&self, conn: &ConnectionHandle, message: ClientMessage) -> Result<()> {
        match message {
            ClientMessage::CreateLobby { display_name } => {
                self.create_lobby(conn, display_name).await.map(|_| ())
            }
            ClientMessage::JoinLobby {
                lobby_id,
                display_name,
            } => self.join_lobby(conn, &lobby_id, display_name).await,
            ClientMessage::StartGame { lobby_id } => self.start_game(conn, &lobby_id).await,
            ClientMessage::Move { lobby_id, position } => {
                self.update_position(conn, &lobby_id, position).await
            }
        }
    }

    /// Create a lobby with the requester as host and announce its id back.
    pub async fn create_lobby(
        &self,
        conn: &ConnectionHandle,
        display_name: String,
    ) -> Result<LobbyId> {
        let name = validated_name(display_name)?;
        let host = Participant::new(conn.clone(), name);
        let (lobby_id, _lobby) = self.registry.create_lobby(host)?;

        log::info!("lobby {} created by connection {}", lobby_id, conn.id());
        conn.send(ServerEvent::LobbyCreated {
            lobby_id: lobby_id.clone(),
        });
        Ok(lobby_id)
    }

    /// Join an existing lobby. Any rejection goes back to the requester
    /// alone as a `join-error`; nothing is broadcast.
    pub async fn join_lobby(
        &self,
        conn: &ConnectionHandle,
        lobby_id: &str,
        display_name: String,
    ) -> Result<()> {
        match self.try_join(conn, lobby_id, display_name).await {
            Ok(()) => Ok(()),
            Err(err) => {
                log::info!(
                    "connection {} failed to join lobby {}: {}",
                    conn.id(),
                    lobby_id,
                    err
                );
                conn.send(ServerEvent::JoinError {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn try_join(
        &self,
        conn: &ConnectionHandle,
        lobby_id: &str,
        display_name: String,
    ) -> Result<()> {
        let name = validated_name(display_name)?;
        let lobby = self.registry.get(lobby_id).ok_or(LobbyError::NotFound)?;

        let mut guard = lobby.write().await;
        guard.join(Participant::new(conn.clone(), name))?;

        // Confirmation to the joiner, then the roster to every member,
        // inside the same critical section as the membership change.
        conn.send(ServerEvent::JoinedLobby {
            lobby_id: guard.id().to_string(),
        });
        guard.broadcast(&ServerEvent::PlayersUpdate {
            players: guard.roster(),
        });
        log::info!("connection {} joined lobby {}", conn.id(), lobby_id);
        Ok(())
    }

    /// Host-only transition to `Running`, announced to all members.
    pub async fn start_game(&self, conn: &ConnectionHandle, lobby_id: &str) -> Result<()> {
        let lobby = self.registry.get(lobby_id).ok_or(LobbyError::NotFound)?;

        let mut guard = lobby.write().await;
        guard.start(conn.id())?;
        guard.broadcast(&ServerEvent::GameStarted);
        log::info!("game started in lobby {}", lobby_id);
        Ok(())
    }

    /// Overwrite the mover's position and relay the full roster.
    pub async fn update_position(
        &self,
        conn: &ConnectionHandle,
        lobby_id: &str,
        position: Position,
    ) -> Result<()> {
        let lobby = self.registry.get(lobby_id).ok_or(LobbyError::NotFound)?;

        let mut guard = lobby.write().await;
        guard.update_position(conn.id(), position)?;
        guard.broadcast(&ServerEvent::PlayersUpdate {
            players: guard.roster(),
        });
        Ok(())
    }

    /// Remove a dropped connection from every lobby where it is present.
    ///
    /// Invoked by the transport once per connection termination; a repeat
    /// invocation finds no membership and does nothing.
    pub async fn handle_disconnect(&self, conn_id: ConnectionId) {
        for (lobby_id, lobby) in self.registry.snapshot() {
            let mut guard = lobby.write().await;
            let Some(departure) = guard.remove(conn_id) else {
                continue;
            };

            if guard.is_empty() {
                // Close under the lock so a handle fetched concurrently
                // cannot join a lobby that is about to be unregistered.
                guard.close();
                drop(guard);
                self.registry.remove(&lobby_id);
                log::info!("lobby {} deleted, no players remaining", lobby_id);
            } else {
                if let Some(new_host) = departure.new_host {
                    log::info!("connection {} is the new host of lobby {}", new_host, lobby_id);
                }
                guard.broadcast(&ServerEvent::PlayersUpdate {
                    players: guard.roster(),
                });
                log::info!("connection {} left lobby {}", conn_id, lobby_id);
            }
        }
    }
}

fn validated_name(name: String) -> Result<String> {
    if name.trim().is_empty() {
        return Err(LobbyError::InvalidName);
    }
    Ok(name)
}
