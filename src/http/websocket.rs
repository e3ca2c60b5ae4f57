//! WebSocket endpoint handling.
//!
//! # Responsibilities
//! - Complete the upgrade handshake with the client
//! - Enforce the connection limit before upgrading
//! - Hand the socket to a bridge instance
//! - Track connection lifetime for the limit and metrics
//!
//! # Data Flow
//! ```text
//! Client ──── request values ────→ Bridge ──── stream opens ────→ Feed
//! Client ←──── JSON records ────── Bridge ←──── transactions ──── Feed
//! ```
//!
//! # Design Decisions
//! - The admission guard is taken before the upgrade, so rejection is a
//!   plain 503 and concurrent handshakes cannot overshoot the limit
//! - Ping/pong handled transparently by the protocol layer

use std::net::SocketAddr;

use axum::extract::connect_info::ConnectInfo;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::bridge;
use crate::http::server::AppState;
use crate::net::connection::ConnectionGuard;
use crate::observability::metrics;

/// Upgrade handler for the bridge endpoint.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Response {
    let guard = match state.tracker.try_track(state.max_connections) {
        Some(guard) => guard,
        None => {
            tracing::warn!(
                peer_addr = %peer,
                active = state.tracker.active_count(),
                limit = state.max_connections,
                "Connection limit reached, rejecting upgrade"
            );
            return (StatusCode::SERVICE_UNAVAILABLE, "Connection limit reached").into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, guard, peer))
}

/// Drive one upgraded connection for its whole lifetime.
///
/// The admission guard rides along so the slot frees when this future
/// completes or is dropped.
async fn handle_socket(socket: WebSocket, state: AppState, guard: ConnectionGuard, peer: SocketAddr) {
    let connection_id = guard.id();

    metrics::connection_opened();
    tracing::info!(connection_id = %connection_id, peer_addr = %peer, "Client connected");

    bridge::run_bridge(
        socket,
        state.backend.clone(),
        connection_id,
        state.shutdown.subscribe(),
    )
    .await;

    tracing::info!(connection_id = %connection_id, "Client disconnected");
    metrics::connection_closed();
}
