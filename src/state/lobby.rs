//! Per-lobby state: membership, host role, lifecycle phase, positions.
//!
//! All mutation happens through the methods here, behind the lobby's write
//! lock. Validation always precedes mutation, so a roster broadcast can
//! never observe a half-applied transition.

use std::collections::BTreeMap;

use crate::connection::{ConnectionHandle, ConnectionId};
use crate::error::{LobbyError, Result};
use crate::protocol::{Position, RosterEntry, ServerEvent};

pub type LobbyId = String;

/// Where every participant spawns, matching the client's canvas start point
pub const SPAWN_POSITION: Position = Position { x: 100.0, y: 100.0 };

/// Lobby lifecycle. Monotonic: once `Running`, never back to `Waiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyPhase {
    Waiting,
    Running,
}

/// One connected player inside a lobby
#[derive(Debug, Clone)]
pub struct Participant {
    connection: ConnectionHandle,
    name: String,
    position: Position,
}

impl Participant {
    pub fn new(connection: ConnectionHandle, name: String) -> Self {
        Self {
            connection,
            name,
            position: SPAWN_POSITION,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.connection.id()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    fn roster_entry(&self) -> RosterEntry {
        RosterEntry {
            id: self.id(),
            name: self.name.clone(),
            position: self.position,
        }
    }
}

/// What happened when a participant was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    pub was_host: bool,
    /// Set when the departing host's role moved to a remaining member
    pub new_host: Option<ConnectionId>,
}

/// A named group of participants sharing one game session
#[derive(Debug)]
pub struct Lobby {
    id: LobbyId,
    host: ConnectionId,
    phase: LobbyPhase,
    members: BTreeMap<ConnectionId, Participant>,
    capacity: usize,
    closed: bool,
}

impl Lobby {
    /// A lobby is born `Waiting` with its creator as host and sole member.
    pub fn new(id: LobbyId, host: Participant, capacity: usize) -> Self {
        let host_id = host.id();
        let mut members = BTreeMap::new();
        members.insert(host_id, host);
        Self {
            id,
            host: host_id,
            phase: LobbyPhase::Waiting,
            members,
            capacity,
            closed: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn host(&self) -> ConnectionId {
        self.host
    }

    pub fn phase(&self) -> LobbyPhase {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.members.contains_key(&id)
    }

    /// A closed lobby has been emptied and unregistered; a handle that was
    /// cloned out of the registry before that must not admit new members.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Add a participant. Only allowed while `Waiting` and under capacity.
    pub fn join(&mut self, participant: Participant) -> Result<()> {
        if self.closed {
            return Err(LobbyError::NotFound);
        }
        if self.phase == LobbyPhase::Running {
            return Err(LobbyError::AlreadyRunning);
        }
        if self.members.contains_key(&participant.id()) {
            // Re-join of a present member is a no-op
            return Ok(());
        }
        if self.members.len() >= self.capacity {
            return Err(LobbyError::Full);
        }
        self.members.insert(participant.id(), participant);
        Ok(())
    }

    /// Transition to `Running`. Host-only; repeating it is harmless and the
    /// phase never reverts.
    pub fn start(&mut self, requester: ConnectionId) -> Result<()> {
        if self.closed {
            return Err(LobbyError::NotFound);
        }
        if requester != self.host {
            return Err(LobbyError::Forbidden);
        }
        self.phase = LobbyPhase::Running;
        Ok(())
    }

    /// Overwrite a member's position. Only allowed while `Running`.
    pub fn update_position(&mut self, id: ConnectionId, position: Position) -> Result<()> {
        if self.closed {
            return Err(LobbyError::NotFound);
        }
        if self.phase != LobbyPhase::Running {
            return Err(LobbyError::NotRunning);
        }
        let participant = self.members.get_mut(&id).ok_or(LobbyError::NotFound)?;
        participant.position = position;
        Ok(())
    }

    /// Remove a participant, repairing the host invariant: if the host left
    /// and members remain, the remaining member with the lowest connection
    /// id becomes host.
    pub fn remove(&mut self, id: ConnectionId) -> Option<Departure> {
        self.members.remove(&id)?;

        let was_host = self.host == id;
        let mut new_host = None;
        if was_host {
            if let Some(&next) = self.members.keys().next() {
                self.host = next;
                new_host = Some(next);
            }
        }
        Some(Departure { was_host, new_host })
    }

    /// Full roster snapshot in ascending connection-id order
    pub fn roster(&self) -> Vec<RosterEntry> {
        self.members.values().map(Participant::roster_entry).collect()
    }

    /// Send an event to exactly the current members
    pub fn broadcast(&self, event: &ServerEvent) {
        for participant in self.members.values() {
            participant.connection.send(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn participant(id: ConnectionId, name: &str) -> (Participant, UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = ConnectionHandle::new(id, tx);
        (Participant::new(conn, name.to_string()), rx)
    }

    fn lobby_with(host_id: ConnectionId, capacity: usize) -> Lobby {
        let (host, _rx) = participant(host_id, "Host");
        Lobby::new("abc123".to_string(), host, capacity)
    }

    #[test]
    fn test_new_lobby_is_waiting_with_host() {
        let lobby = lobby_with(1, 5);
        assert_eq!(lobby.phase(), LobbyPhase::Waiting);
        assert_eq!(lobby.host(), 1);
        assert_eq!(lobby.len(), 1);
        assert!(lobby.contains(1));
    }

    #[test]
    fn test_join_adds_participant_at_spawn() {
        let mut lobby = lobby_with(1, 5);
        let (p, _rx) = participant(2, "Bob");
        lobby.join(p).unwrap();

        assert_eq!(lobby.len(), 2);
        let roster = lobby.roster();
        assert_eq!(roster[1].name, "Bob");
        assert_eq!(roster[1].position, SPAWN_POSITION);
    }

    #[test]
    fn test_join_full_lobby_rejected() {
        let mut lobby = lobby_with(1, 2);
        let (p2, _rx2) = participant(2, "Bob");
        lobby.join(p2).unwrap();

        let (p3, _rx3) = participant(3, "Carol");
        assert_eq!(lobby.join(p3), Err(LobbyError::Full));
        assert_eq!(lobby.len(), 2);
    }

    #[test]
    fn test_join_running_lobby_rejected() {
        let mut lobby = lobby_with(1, 5);
        lobby.start(1).unwrap();

        let (p, _rx) = participant(2, "Bob");
        assert_eq!(lobby.join(p), Err(LobbyError::AlreadyRunning));
    }

    #[test]
    fn test_start_by_non_host_is_forbidden() {
        let mut lobby = lobby_with(1, 5);
        let (p, _rx) = participant(2, "Bob");
        lobby.join(p).unwrap();

        assert_eq!(lobby.start(2), Err(LobbyError::Forbidden));
        assert_eq!(lobby.phase(), LobbyPhase::Waiting);
    }

    #[test]
    fn test_phase_never_reverts() {
        let mut lobby = lobby_with(1, 5);
        lobby.start(1).unwrap();
        assert_eq!(lobby.phase(), LobbyPhase::Running);
        lobby.start(1).unwrap();
        assert_eq!(lobby.phase(), LobbyPhase::Running);
    }

    #[test]
    fn test_move_before_start_rejected() {
        let mut lobby = lobby_with(1, 5);
        let pos = Position { x: 10.0, y: 20.0 };
        assert_eq!(lobby.update_position(1, pos), Err(LobbyError::NotRunning));
    }

    #[test]
    fn test_move_overwrites_position_of_mover_only() {
        let mut lobby = lobby_with(1, 5);
        let (p, _rx) = participant(2, "Bob");
        lobby.join(p).unwrap();
        lobby.start(1).unwrap();

        lobby
            .update_position(2, Position { x: 10.0, y: 20.0 })
            .unwrap();

        let roster = lobby.roster();
        assert_eq!(roster[0].position, SPAWN_POSITION);
        assert_eq!(roster[1].position, Position { x: 10.0, y: 20.0 });
    }

    #[test]
    fn test_move_by_non_member_rejected() {
        let mut lobby = lobby_with(1, 5);
        lobby.start(1).unwrap();
        let pos = Position { x: 1.0, y: 1.0 };
        assert_eq!(lobby.update_position(9, pos), Err(LobbyError::NotFound));
    }

    #[test]
    fn test_remove_host_promotes_lowest_connection_id() {
        let mut lobby = lobby_with(2, 5);
        let (p5, _rx5) = participant(5, "Bob");
        let (p3, _rx3) = participant(3, "Carol");
        lobby.join(p5).unwrap();
        lobby.join(p3).unwrap();

        let departure = lobby.remove(2).unwrap();
        assert!(departure.was_host);
        assert_eq!(departure.new_host, Some(3));
        assert_eq!(lobby.host(), 3);
    }

    #[test]
    fn test_remove_non_host_keeps_host() {
        let mut lobby = lobby_with(1, 5);
        let (p, _rx) = participant(2, "Bob");
        lobby.join(p).unwrap();

        let departure = lobby.remove(2).unwrap();
        assert!(!departure.was_host);
        assert_eq!(departure.new_host, None);
        assert_eq!(lobby.host(), 1);
    }

    #[test]
    fn test_remove_unknown_member_is_none() {
        let mut lobby = lobby_with(1, 5);
        assert_eq!(lobby.remove(42), None);
        assert_eq!(lobby.len(), 1);
    }

    #[test]
    fn test_roster_is_sorted_by_connection_id() {
        let mut lobby = lobby_with(4, 5);
        let (p2, _rx2) = participant(2, "Bob");
        let (p9, _rx9) = participant(9, "Carol");
        lobby.join(p9).unwrap();
        lobby.join(p2).unwrap();

        let ids: Vec<u32> = lobby.roster().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 4, 9]);
    }

    #[test]
    fn test_broadcast_reaches_every_member() {
        let (host, mut host_rx) = participant(1, "Alice");
        let mut lobby = Lobby::new("abc123".to_string(), host, 5);
        let (p, mut member_rx) = participant(2, "Bob");
        lobby.join(p).unwrap();

        lobby.broadcast(&ServerEvent::GameStarted);

        assert_eq!(host_rx.try_recv().unwrap(), ServerEvent::GameStarted);
        assert_eq!(member_rx.try_recv().unwrap(), ServerEvent::GameStarted);
    }

    #[test]
    fn test_closed_lobby_rejects_joins() {
        let mut lobby = lobby_with(1, 5);
        lobby.remove(1);
        lobby.close();

        let (p, _rx) = participant(2, "Bob");
        assert_eq!(lobby.join(p), Err(LobbyError::NotFound));
    }
}
