use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::handler;
use crate::server::GameServer;

/// Build the application router: WebSocket endpoint plus liveness and
/// metrics probes.
pub fn create_router(cors_origins: &str) -> Router<Arc<GameServer>> {
    let cors = if cors_origins == "*" {
        CorsLayer::permissive()
    } else {
        let origins: Vec<_> = cors_origins
            .split(',')
            .filter_map(|origin| origin.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();
        if origins.is_empty() {
            tracing::warn!("No valid CORS origins configured, using permissive CORS");
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    Router::new()
        .route("/ws", get(handler::ws_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(cors)
}

/// Liveness probe.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// JSON snapshot of the server counters.
pub async fn metrics_handler(State(server): State<Arc<GameServer>>) -> Json<serde_json::Value> {
    let snapshot = server.metrics().snapshot();
    Json(serde_json::json!({
        "metrics": snapshot,
        "active_rooms": server.rooms().len(),
    }))
}
