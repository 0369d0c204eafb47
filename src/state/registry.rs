//! Process-wide lobby registry, partitioned by lobby id.
//!
//! Uses DashMap so unrelated lobbies never contend; connection ids come
//! from a lock-free counter. Lobby ids are short random codes checked for
//! uniqueness against the live registry, with a bounded retry budget.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::Rng;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::connection::ConnectionId;
use crate::error::{LobbyError, Result};
use crate::state::lobby::{Lobby, LobbyId, Participant};

const LOBBY_ID_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub struct LobbyRegistry {
    lobbies: DashMap<LobbyId, Arc<RwLock<Lobby>>>,
    next_connection_id: AtomicU32,
    config: Arc<Config>,
}

impl LobbyRegistry {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            lobbies: DashMap::new(),
            next_connection_id: AtomicU32::new(1),
            config,
        }
    }

    /// Generate next connection ID (lock-free)
    pub fn next_connection_id(&self) -> ConnectionId {
        self.next_connection_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Create a lobby in `Waiting` phase with `host` as its only member.
    ///
    /// The entry API keeps generate-and-insert atomic with respect to
    /// concurrent creators: two calls can never claim the same id.
    pub fn create_lobby(&self, host: Participant) -> Result<(LobbyId, Arc<RwLock<Lobby>>)> {
        for _ in 0..self.config.lobby_id_attempts {
            let id = self.generate_id();
            match self.lobbies.entry(id.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(vacant) => {
                    let lobby = Arc::new(RwLock::new(Lobby::new(
                        id.clone(),
                        host.clone(),
                        self.config.lobby_capacity,
                    )));
                    vacant.insert(lobby.clone());
                    return Ok((id, lobby));
                }
            }
        }
        Err(LobbyError::IdExhausted)
    }

    fn generate_id(&self) -> LobbyId {
        let mut rng = rand::thread_rng();
        (0..self.config.lobby_id_length)
            .map(|_| LOBBY_ID_CHARSET[rng.gen_range(0..LOBBY_ID_CHARSET.len())] as char)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<Arc<RwLock<Lobby>>> {
        self.lobbies.get(id).map(|entry| entry.value().clone())
    }

    /// Delete a lobby; idempotent.
    pub fn remove(&self, id: &str) {
        self.lobbies.remove(id);
    }

    /// Clone out all live lobbies. Callers iterate this instead of the map
    /// itself so no shard guard is ever held across an await point.
    pub fn snapshot(&self) -> Vec<(LobbyId, Arc<RwLock<Lobby>>)> {
        self.lobbies
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lobbies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lobbies.is_empty()
    }
}
