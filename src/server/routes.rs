//! HTTP routes
//!
//! One path accepts the WebSocket upgrade; everything else is a 404.
//! Requests to that path that are not valid upgrades get axum's 4xx
//! rejection response before any registry state exists.

use axum::Router;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::{ConnectInfo, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use log::warn;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::client::{Registry, handle_client};
use crate::server::config::ServerConfig;

/// State shared by every request: the registry and the configuration.
#[derive(Clone)]
pub struct RelayState {
    pub registry: Arc<Registry>,
    pub config: Arc<ServerConfig>,
}

pub fn build_router(state: RelayState) -> Router {
    let ws_path = state.config.ws_path.clone();
    Router::new()
        .route(&ws_path, get(ws_upgrade))
        .with_state(state)
}

/// GET on the configured path. Any origin is accepted.
async fn ws_upgrade(
    State(state): State<RelayState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let upgrade = match upgrade {
        Ok(upgrade) => upgrade,
        Err(rejection) => {
            warn!("Rejected upgrade from {}: {}", peer, rejection);
            return rejection.into_response();
        }
    };

    upgrade
        .on_failed_upgrade(move |e| warn!("Upgrade from {} failed: {}", peer, e))
        .on_upgrade(move |socket| handle_client(socket, peer, state.registry, state.config))
}
