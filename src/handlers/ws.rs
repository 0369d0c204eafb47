//! WebSocket transport adapter.
//!
//! Owns the socket lifecycle: assigns the connection id, pumps outbound
//! events through a per-connection writer task, parses inbound JSON into
//! protocol messages, and fires the disconnect handler exactly once when
//! the stream ends.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::connection::ConnectionHandle;
use crate::handlers::http::AppState;
use crate::protocol::ClientMessage;

pub async fn ws_handler(State(app): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, app))
}

async fn handle_socket(socket: WebSocket, app: AppState) {
    let conn_id = app.service.registry().next_connection_id();
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let conn = ConnectionHandle::new(conn_id, events_tx);
    log::info!("connection {} established", conn_id);

    let (mut sender, mut receiver) = socket.split();

    // Writer task drains this connection's event queue, so a slow socket
    // backs up here and never stalls a lobby or another member.
    let writer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(err) => log::error!("failed to encode event: {}", err),
            }
        }
    });

    while let Some(Ok(message)) = receiver.next().await {
        match message {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) => {
                    if let Err(err) = app.service.dispatch(&conn, msg).await {
                        log::debug!("connection {}: message rejected: {}", conn_id, err);
                    }
                }
                Err(err) => {
                    log::debug!("connection {}: malformed message: {}", conn_id, err);
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    app.service.handle_disconnect(conn_id).await;
    writer.abort();
    log::info!("connection {} closed", conn_id);
}
