//! Server orchestration: the event dispatcher, room and matchmaking
//! services, connection tracking and the forfeit clock.

pub mod connection_manager;
pub mod friend_service;
pub mod game_service;
pub mod matchmaking;
pub mod message_router;
pub mod reconnection_service;
pub mod registry;
pub mod room_service;

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::{ProtocolConfig, ServerConfig};
use crate::metrics::ServerMetrics;
use crate::protocol::{ErrorCode, PlayerId, ServerMessage};
use crate::users::UserStore;
use crate::friends::FriendsRegistry;

pub use connection_manager::{ConnectionId, ConnectionManager, DisconnectionRecord};
pub use matchmaking::{MatchmakingEntry, MatchmakingQueue};
pub use registry::{Room, RoomRegistry, Seat};

/// The authoritative chess server. One instance per process; shared
/// across connection tasks behind an `Arc`.
pub struct GameServer {
    server_config: ServerConfig,
    protocol_config: ProtocolConfig,
    rooms: RoomRegistry,
    matchmaking: MatchmakingQueue,
    connections: ConnectionManager,
    users: Arc<dyn UserStore>,
    friends: FriendsRegistry,
    metrics: Arc<ServerMetrics>,
    /// Back-reference for handing owned handles to spawned timer tasks.
    weak_self: Weak<GameServer>,
}

impl GameServer {
    pub fn new(
        server_config: ServerConfig,
        protocol_config: ProtocolConfig,
        users: Arc<dyn UserStore>,
    ) -> Arc<Self> {
        let metrics = Arc::new(ServerMetrics::new());
        Arc::new_cyclic(|weak_self| Self {
            server_config,
            protocol_config: protocol_config.clone(),
            rooms: RoomRegistry::new(protocol_config),
            matchmaking: MatchmakingQueue::new(),
            connections: ConnectionManager::new(Arc::clone(&metrics)),
            users,
            friends: FriendsRegistry::new(),
            metrics,
            weak_self: weak_self.clone(),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.server_config
    }

    pub fn protocol_config(&self) -> &ProtocolConfig {
        &self.protocol_config
    }

    pub fn metrics(&self) -> &ServerMetrics {
        &self.metrics
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    pub fn matchmaking(&self) -> &MatchmakingQueue {
        &self.matchmaking
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    pub(crate) fn user_store(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    pub(crate) fn friends(&self) -> &FriendsRegistry {
        &self.friends
    }

    /// Enqueue a frame on one transport. Bounded queue; a slow consumer
    /// drops frames rather than stalling a room.
    pub(crate) fn send_to_conn(&self, conn_id: ConnectionId, message: ServerMessage) {
        if let Some(sender) = self.connections.sender_for_conn(conn_id) {
            if let Err(err) = sender.try_send(Arc::new(message)) {
                warn!(%conn_id, error = %err, "Failed to enqueue outbound frame");
            }
        }
    }

    /// Enqueue a frame for a player's live transport, if any.
    pub(crate) fn send_to_player(&self, player_id: PlayerId, message: ServerMessage) {
        if let Some(sender) = self.connections.sender_for_player(player_id) {
            if let Err(err) = sender.try_send(Arc::new(message)) {
                warn!(%player_id, error = %err, "Failed to enqueue outbound frame");
            }
        }
    }

    pub(crate) fn send_error_to_conn(&self, conn_id: ConnectionId, code: ErrorCode) {
        self.send_to_conn(conn_id, ServerMessage::error(code));
    }

    /// Transport dropped. Queued players are removed from matchmaking;
    /// seated players get a disconnection record and the forfeit clock
    /// starts. Reconnection within the window cancels it.
    pub async fn handle_disconnect(&self, conn_id: ConnectionId) {
        let Some(player_id) = self.connections.unregister(conn_id) else {
            return;
        };
        self.matchmaking.remove(player_id).await;

        let Some(code) = self.rooms.room_of_player(player_id) else {
            return;
        };
        let Some(room) = self.rooms.get(&code) else {
            return;
        };
        let guard = room.lock().await;
        if guard.finished {
            return;
        }
        let Some(color) = guard.seat_color(player_id) else {
            return;
        };

        let window = Duration::from_secs(self.server_config.forfeit_window_secs);
        let Some(server) = self.weak_self.upgrade() else {
            return;
        };
        let timer = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            server.forfeit_expired(player_id).await;
        });
        self.connections.register_disconnection(
            player_id,
            DisconnectionRecord::new(code.clone(), color, timer),
        );

        if let Some(opponent) = guard.opponent(color) {
            self.send_to_player(opponent.player_id, ServerMessage::OpponentDisconnected);
        }

        info!(
            %player_id,
            room_code = %code,
            %color,
            window_secs = self.server_config.forfeit_window_secs,
            "Seated player disconnected; forfeit clock started"
        );
    }

    /// Forfeit timer fired. The record is re-checked under the room lock:
    /// a reconnection may have raced the timer and already claimed it,
    /// in which case this is a no-op.
    pub(crate) async fn forfeit_expired(&self, player_id: PlayerId) {
        let Some((code, color)) = self.connections.pending_disconnection(player_id) else {
            return;
        };
        let Some(room) = self.rooms.get(&code) else {
            self.connections.cancel_disconnection(player_id);
            return;
        };
        let mut guard = room.lock().await;
        match self.connections.claim_disconnection(player_id) {
            // Detach the timer handle: this very task is the timer, and
            // dropping an armed record would abort it mid-forfeit.
            Some(mut record) => record.disarm(),
            None => return,
        }
        if guard.finished {
            return;
        }

        info!(%player_id, room_code = %code, "Forfeit window expired");

        if guard.black.is_none() {
            // Creator abandoned an unpaired room; nothing to score.
            self.teardown_room_locked(&mut guard);
            return;
        }
        self.metrics.increment_forfeits();
        self.finish_game_locked(
            &mut guard,
            crate::protocol::GameEndReason::Timeout,
            Some(color.opposite()),
        )
        .await;
    }

    /// Remove a room and every index pointing at it. Call with the room
    /// lock held.
    pub(crate) fn teardown_room_locked(&self, room: &mut Room) {
        room.finished = true;
        self.connections.cancel_disconnection(room.white.player_id);
        self.rooms.clear_membership(room.white.player_id);
        if let Some(black) = &room.black {
            self.connections.cancel_disconnection(black.player_id);
            self.rooms.clear_membership(black.player_id);
        }
        self.rooms.remove(&room.code);
    }

    /// Periodic sweep deleting rooms with no connected seat, no pending
    /// reconnection and no activity past the idle timeout.
    pub async fn room_sweeper_task(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(Duration::from_secs(
            self.server_config.room_sweep_interval_secs.max(1),
        ));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.sweep_idle_rooms().await;
        }
    }

    pub async fn sweep_idle_rooms(&self) -> usize {
        let idle = chrono::Duration::seconds(self.server_config.idle_room_timeout_secs as i64);
        let now = Utc::now();
        let mut removed = 0usize;
        for code in self.rooms.codes() {
            let Some(room) = self.rooms.get(&code) else {
                continue;
            };
            let mut guard = room.lock().await;
            if guard.finished {
                continue;
            }
            let white_online = self.connections.is_player_connected(guard.white.player_id);
            let black_online = guard
                .black
                .as_ref()
                .is_some_and(|seat| self.connections.is_player_connected(seat.player_id));
            let reconnecting = self.connections.has_pending_disconnection_for_room(&code);
            if !white_online && !black_online && !reconnecting && now - guard.last_activity > idle
            {
                self.teardown_room_locked(&mut guard);
                removed += 1;
            }
        }
        if removed > 0 {
            info!(count = removed, "Swept abandoned rooms");
        }
        removed
    }
}
