use axum::extract::connect_info::ConnectInfo;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::IntoResponse;
use std::net::SocketAddr;
use std::sync::Arc;

use super::connection::handle_socket;
use crate::server::GameServer;

/// Upgrade an HTTP request to a WebSocket session.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(server): State<Arc<GameServer>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, server, addr))
}
