//! WebSocket transport: axum routes, the upgrade handler and the
//! per-connection read/write loops.

pub mod connection;
pub mod handler;
pub mod routes;

pub use routes::{create_router, health_handler, metrics_handler};
