use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::chess::Color;
use crate::metrics::ServerMetrics;
use crate::protocol::{PlayerId, ServerMessage};

/// Transport handle identity. One per WebSocket connection.
pub type ConnectionId = Uuid;

/// A seated player whose transport dropped. Owns the single-shot forfeit
/// timer; dropping the record aborts it, which makes cancellation
/// idempotent (aborting a finished task is a no-op).
#[derive(Debug)]
pub struct DisconnectionRecord {
    pub room_code: String,
    pub color: Color,
    pub disconnected_at: DateTime<Utc>,
    timer: Option<JoinHandle<()>>,
}

impl DisconnectionRecord {
    pub fn new(room_code: String, color: Color, timer: JoinHandle<()>) -> Self {
        Self {
            room_code,
            color,
            disconnected_at: Utc::now(),
            timer: Some(timer),
        }
    }

    /// Detach the timer so dropping the record no longer aborts it. The
    /// timer task itself must call this on the record it claims, or it
    /// would cancel its own in-flight forfeit handling.
    pub fn disarm(&mut self) {
        self.timer.take();
    }
}

impl Drop for DisconnectionRecord {
    fn drop(&mut self) {
        if let Some(timer) = &self.timer {
            timer.abort();
        }
    }
}

#[derive(Debug)]
struct PlayerAssociation {
    conn_id: Option<ConnectionId>,
    username: String,
}

/// Bidirectional association between transports and player identities,
/// plus the disconnection records awaiting reconnection or forfeit.
pub struct ConnectionManager {
    connections: DashMap<ConnectionId, mpsc::Sender<Arc<ServerMessage>>>,
    conn_to_player: DashMap<ConnectionId, PlayerId>,
    players: DashMap<PlayerId, PlayerAssociation>,
    by_username: DashMap<String, PlayerId>,
    disconnected: DashMap<PlayerId, DisconnectionRecord>,
    metrics: Arc<ServerMetrics>,
}

impl ConnectionManager {
    pub fn new(metrics: Arc<ServerMetrics>) -> Self {
        Self {
            connections: DashMap::new(),
            conn_to_player: DashMap::new(),
            players: DashMap::new(),
            by_username: DashMap::new(),
            disconnected: DashMap::new(),
            metrics,
        }
    }

    /// Register a fresh transport and hand back its id.
    pub fn register(&self, sender: mpsc::Sender<Arc<ServerMessage>>) -> ConnectionId {
        let conn_id = Uuid::new_v4();
        self.connections.insert(conn_id, sender);
        self.metrics.increment_connections_opened();
        conn_id
    }

    /// Drop a transport. Returns the bound player id when this transport
    /// was still the player's live handle; a player who already rebound
    /// to a newer connection is not reported.
    pub fn unregister(&self, conn_id: ConnectionId) -> Option<PlayerId> {
        self.connections.remove(&conn_id);
        self.metrics.increment_connections_closed();
        let (_, player_id) = self.conn_to_player.remove(&conn_id)?;
        let mut assoc = self.players.get_mut(&player_id)?;
        if assoc.conn_id == Some(conn_id) {
            assoc.conn_id = None;
            Some(player_id)
        } else {
            None
        }
    }

    /// Associate a transport with a player identity. Exactly one live
    /// handle per player: a new association evicts the previous one.
    pub fn bind_player(&self, conn_id: ConnectionId, player_id: PlayerId, username: String) {
        let evicted = match self.players.entry(player_id) {
            dashmap::mapref::entry::Entry::Occupied(mut entry) => {
                let assoc = entry.get_mut();
                assoc.username = username.clone();
                assoc.conn_id.replace(conn_id)
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(PlayerAssociation {
                    conn_id: Some(conn_id),
                    username: username.clone(),
                });
                None
            }
        };
        if let Some(old_conn) = evicted {
            if old_conn != conn_id {
                self.conn_to_player.remove(&old_conn);
            }
        }
        self.conn_to_player.insert(conn_id, player_id);
        self.by_username.insert(username, player_id);
    }

    pub fn player_for_conn(&self, conn_id: ConnectionId) -> Option<PlayerId> {
        self.conn_to_player.get(&conn_id).map(|entry| *entry)
    }

    pub fn username_of(&self, player_id: PlayerId) -> Option<String> {
        self.players
            .get(&player_id)
            .map(|assoc| assoc.username.clone())
    }

    pub fn player_by_username(&self, username: &str) -> Option<PlayerId> {
        self.by_username.get(username).map(|entry| *entry)
    }

    pub fn is_player_connected(&self, player_id: PlayerId) -> bool {
        self.players
            .get(&player_id)
            .is_some_and(|assoc| assoc.conn_id.is_some())
    }

    pub fn sender_for_conn(
        &self,
        conn_id: ConnectionId,
    ) -> Option<mpsc::Sender<Arc<ServerMessage>>> {
        self.connections
            .get(&conn_id)
            .map(|entry| entry.value().clone())
    }

    pub fn sender_for_player(
        &self,
        player_id: PlayerId,
    ) -> Option<mpsc::Sender<Arc<ServerMessage>>> {
        let conn_id = self.players.get(&player_id)?.conn_id?;
        self.sender_for_conn(conn_id)
    }

    /// Store a forfeit record, replacing (and thereby aborting) any
    /// previous one for the same player.
    pub fn register_disconnection(&self, player_id: PlayerId, record: DisconnectionRecord) {
        self.disconnected.insert(player_id, record);
        self.metrics.increment_disconnections_registered();
    }

    /// Remove the record and abort its timer. Idempotent.
    pub fn cancel_disconnection(&self, player_id: PlayerId) -> Option<DisconnectionRecord> {
        self.disconnected.remove(&player_id).map(|(_, record)| record)
    }

    /// Atomically claim the record for forfeit processing. Returns None
    /// when a racing reconnection already removed it; callers must treat
    /// that as "do nothing".
    pub fn claim_disconnection(&self, player_id: PlayerId) -> Option<DisconnectionRecord> {
        self.disconnected.remove(&player_id).map(|(_, record)| record)
    }

    pub fn pending_disconnection(&self, player_id: PlayerId) -> Option<(String, Color)> {
        self.disconnected
            .get(&player_id)
            .map(|record| (record.room_code.clone(), record.color))
    }

    pub fn has_pending_disconnection_for_room(&self, code: &str) -> bool {
        self.disconnected
            .iter()
            .any(|entry| entry.room_code == code)
    }
}
