//! Server metrics collection. Plain atomic counters, snapshotted as JSON
//! for the `/metrics` endpoint.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for everything the server does. Cheap to bump from any task.
#[derive(Debug, Default)]
pub struct ServerMetrics {
    connections_opened: AtomicU64,
    connections_closed: AtomicU64,
    rooms_created: AtomicU64,
    rooms_joined: AtomicU64,
    matches_formed: AtomicU64,
    moves_applied: AtomicU64,
    moves_rejected: AtomicU64,
    chat_messages_relayed: AtomicU64,
    draws_agreed: AtomicU64,
    resignations: AtomicU64,
    forfeits: AtomicU64,
    games_completed: AtomicU64,
    disconnections_registered: AtomicU64,
    reconnections_completed: AtomicU64,
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub connections_opened: u64,
    pub connections_closed: u64,
    pub rooms_created: u64,
    pub rooms_joined: u64,
    pub matches_formed: u64,
    pub moves_applied: u64,
    pub moves_rejected: u64,
    pub chat_messages_relayed: u64,
    pub draws_agreed: u64,
    pub resignations: u64,
    pub forfeits: u64,
    pub games_completed: u64,
    pub disconnections_registered: u64,
    pub reconnections_completed: u64,
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_connections_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_connections_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rooms_created(&self) {
        self.rooms_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rooms_joined(&self) {
        self.rooms_joined.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_matches_formed(&self) {
        self.matches_formed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_moves_applied(&self) {
        self.moves_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_moves_rejected(&self) {
        self.moves_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_chat_messages_relayed(&self) {
        self.chat_messages_relayed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_draws_agreed(&self) {
        self.draws_agreed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_resignations(&self) {
        self.resignations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_forfeits(&self) {
        self.forfeits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_games_completed(&self) {
        self.games_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_disconnections_registered(&self) {
        self.disconnections_registered
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reconnections_completed(&self) {
        self.reconnections_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
            connections_closed: self.connections_closed.load(Ordering::Relaxed),
            rooms_created: self.rooms_created.load(Ordering::Relaxed),
            rooms_joined: self.rooms_joined.load(Ordering::Relaxed),
            matches_formed: self.matches_formed.load(Ordering::Relaxed),
            moves_applied: self.moves_applied.load(Ordering::Relaxed),
            moves_rejected: self.moves_rejected.load(Ordering::Relaxed),
            chat_messages_relayed: self.chat_messages_relayed.load(Ordering::Relaxed),
            draws_agreed: self.draws_agreed.load(Ordering::Relaxed),
            resignations: self.resignations.load(Ordering::Relaxed),
            forfeits: self.forfeits.load(Ordering::Relaxed),
            games_completed: self.games_completed.load(Ordering::Relaxed),
            disconnections_registered: self.disconnections_registered.load(Ordering::Relaxed),
            reconnections_completed: self.reconnections_completed.load(Ordering::Relaxed),
        }
    }
}
