use tracing::info;
use uuid::Uuid;

use super::{ConnectionId, GameServer, Seat};
use crate::chess::Color;
use crate::protocol::validation;
use crate::protocol::{
    ClientPlayerInfo, ErrorCode, GameStartedPayload, GameStateView, SeatInfo, ServerMessage,
};

impl GameServer {
    /// Resolve the caller's identity against the user store and bind the
    /// transport to a player id. Every room-entry event goes through
    /// here, so a transport is identified from its first seat onward.
    async fn resolve_seat(
        &self,
        conn_id: ConnectionId,
        info: &ClientPlayerInfo,
    ) -> Result<Seat, ErrorCode> {
        validation::validate_username(&info.username, self.protocol_config())?;

        let player_id = self
            .connections()
            .player_for_conn(conn_id)
            .unwrap_or_else(Uuid::new_v4);
        if self.rooms().room_of_player(player_id).is_some() {
            return Err(ErrorCode::AlreadyInRoom);
        }

        let record = self
            .user_store()
            .get_or_create_user(&info.username, self.config().default_elo)
            .await
            .map_err(|err| {
                tracing::error!(username = %info.username, error = %err, "User store lookup failed");
                ErrorCode::InternalError
            })?;

        self.connections()
            .bind_player(conn_id, player_id, record.username.clone());
        Ok(Seat {
            player_id,
            username: record.username,
            elo: record.elo,
        })
    }

    /// `create-room`: seat the caller as white in a fresh code-shared room.
    pub async fn handle_create_room(&self, conn_id: ConnectionId, info: ClientPlayerInfo) {
        let seat = match self.resolve_seat(conn_id, &info).await {
            Ok(seat) => seat,
            Err(code) => return self.send_error_to_conn(conn_id, code),
        };
        let player_id = seat.player_id;
        let (code, _room) = self.rooms().create(seat);
        self.metrics().increment_rooms_created();

        info!(%player_id, room_code = %code, username = %info.username, "Room created");
        self.send_to_conn(conn_id, ServerMessage::RoomCreated { code, player_id });
    }

    /// `join-room`: seat the caller as black and start the game.
    pub async fn handle_join_room(
        &self,
        conn_id: ConnectionId,
        code: String,
        info: ClientPlayerInfo,
    ) {
        let code = validation::normalize_room_code(&code);
        let seat = match self.resolve_seat(conn_id, &info).await {
            Ok(seat) => seat,
            Err(err) => return self.send_error_to_conn(conn_id, err),
        };

        let Some(room) = self.rooms().get(&code) else {
            return self.send_error_to_conn(conn_id, ErrorCode::RoomNotFound);
        };
        let mut guard = room.lock().await;
        if guard.is_full() {
            return self.send_error_to_conn(conn_id, ErrorCode::RoomFull);
        }
        if guard.white.player_id == seat.player_id || guard.white.username == seat.username {
            return self.send_error_to_conn(conn_id, ErrorCode::CannotJoinOwnRoom);
        }

        let black_id = seat.player_id;
        guard.start(seat);
        self.rooms().record_membership(black_id, code.clone());
        self.metrics().increment_rooms_joined();

        info!(
            room_code = %code,
            white = %guard.white.username,
            black = %info.username,
            "Room is full; game starting"
        );
        self.announce_game_start(&mut guard, false);
    }

    /// `find-match`: enqueue the caller; pair the two oldest entries when
    /// the queue allows it.
    pub async fn handle_find_match(&self, conn_id: ConnectionId, info: ClientPlayerInfo) {
        let seat = match self.resolve_seat(conn_id, &info).await {
            Ok(seat) => seat,
            Err(err) => return self.send_error_to_conn(conn_id, err),
        };
        self.matchmaking().enqueue(seat).await;

        while let Some((white_entry, black_entry)) = self.matchmaking().find_match().await {
            let black_seat = black_entry.seat;
            let black_id = black_seat.player_id;
            let (code, room) = self.rooms().create(white_entry.seat);
            let mut guard = room.lock().await;
            guard.start(black_seat);
            self.rooms().record_membership(black_id, code.clone());
            self.metrics().increment_matches_formed();

            info!(
                room_code = %code,
                white = %guard.white.username,
                black = ?guard.black.as_ref().map(|seat| seat.username.clone()),
                "Matchmaking paired a game"
            );
            self.announce_game_start(&mut guard, true);
        }
    }

    /// Send `game-started` (or `match-found`) to both seats under the
    /// room lock, each with its own color and player id.
    fn announce_game_start(&self, room: &mut super::Room, via_matchmaking: bool) {
        let Some(board) = room.board.as_mut() else {
            return;
        };
        let view = GameStateView::from_board(board);
        let Some(black) = room.black.clone() else {
            return;
        };
        let white_info = SeatInfo {
            username: room.white.username.clone(),
            elo: room.white.elo,
        };
        let black_info = SeatInfo {
            username: black.username.clone(),
            elo: black.elo,
        };

        for (seat, color) in [(&room.white, Color::White), (&black, Color::Black)] {
            let payload = Box::new(GameStartedPayload {
                code: room.code.clone(),
                player_id: seat.player_id,
                player_color: color,
                white_player: white_info.clone(),
                black_player: black_info.clone(),
                game_state: view.clone(),
            });
            let message = if via_matchmaking {
                ServerMessage::MatchFound(payload)
            } else {
                ServerMessage::GameStarted(payload)
            };
            self.send_to_player(seat.player_id, message);
        }
    }
}
