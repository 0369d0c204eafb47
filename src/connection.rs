//! One client's channel into and out of the lobby core.
//!
//! The transport (WebSocket today) owns the socket; the core only ever sees
//! a [`ConnectionHandle`] - a stable id plus a non-blocking event sender.

use tokio::sync::mpsc;

use crate::protocol::ServerEvent;

pub type ConnectionId = u32;

/// Handle the core uses to address a single connected client
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    events_tx: mpsc::UnboundedSender<ServerEvent>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, events_tx: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self { id, events_tx }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Fire-and-forget send. A closed receiver means the client is gone and
    /// its disconnect is already in flight, so the event is just dropped.
    pub fn send(&self, event: ServerEvent) {
        if self.events_tx.send(event).is_err() {
            log::debug!("connection {} gone, dropping outbound event", self.id);
        }
    }
}
