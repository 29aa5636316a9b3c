#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_excessive_bools,
    clippy::too_many_arguments,
    clippy::too_many_lines,
    clippy::similar_names
)]

//! # Chess Arbiter Server
//!
//! An authoritative, in-memory WebSocket server for real-time multiplayer
//! chess. The server is the single source of truth for every game: it
//! validates moves against the full rules, pairs players through private
//! rooms or FIFO matchmaking, mediates chat and draw negotiation, applies
//! ELO updates, and tolerates transient disconnections through a bounded
//! reconnection window.

/// Chess rule engine and move validator
pub mod chess;

/// Server configuration and environment variables
pub mod config;

/// ELO rating calculation
pub mod elo;

/// Friends relation management
pub mod friends;

/// Structured logging configuration
pub mod logging;

/// Metrics collection and reporting
pub mod metrics;

/// WebSocket message protocol definitions
pub mod protocol;

/// Session orchestration, rooms, matchmaking and connection tracking
pub mod server;

/// User store abstraction (in-memory implementation)
pub mod users;

/// WebSocket connection handling
pub mod websocket;
