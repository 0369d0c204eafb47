//! Router construction and listener wiring.

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::handlers::http::{get_lobby, list_lobbies, AppState};
use crate::handlers::ws::ws_handler;
use crate::service::LobbyService;

pub fn router(service: Arc<LobbyService>, config: Arc<Config>) -> Router {
    let app_state = AppState { service, config };

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/lobbies", get(list_lobbies))
        .route("/lobbies/:id", get(get_lobby))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// Bind and serve until the process is stopped.
pub async fn run(
    service: Arc<LobbyService>,
    config: Arc<Config>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = TcpListener::bind(&addr).await?;
    log::info!("server listening on {}", addr);

    let app = router(service, config);
    axum::serve(listener, app).await?;
    Ok(())
}
