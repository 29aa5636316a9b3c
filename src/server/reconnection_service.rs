use tracing::info;

use super::{ConnectionId, GameServer};
use crate::protocol::{
    ErrorCode, GameRestoredPayload, GameStateView, PlayerId, ServerMessage,
};

impl GameServer {
    /// `reconnect-player`: a returning transport claims an interrupted
    /// seat. Cancelling the record aborts the forfeit timer; the timer
    /// racing us is harmless because it re-checks record presence before
    /// acting.
    pub async fn handle_reconnect(&self, conn_id: ConnectionId, player_id: PlayerId) {
        let Some(record) = self.connections().cancel_disconnection(player_id) else {
            return self.send_error_to_conn(conn_id, ErrorCode::NoActiveSession);
        };
        let room_code = record.room_code.clone();
        let color = record.color;
        drop(record);

        let Some(room) = self.rooms().get(&room_code) else {
            return self.send_error_to_conn(conn_id, ErrorCode::NoActiveSession);
        };
        let mut guard = room.lock().await;
        if guard.finished {
            return self.send_error_to_conn(conn_id, ErrorCode::NoActiveSession);
        }
        let Some(username) = guard.seat(color).map(|seat| seat.username.clone()) else {
            return self.send_error_to_conn(conn_id, ErrorCode::NoActiveSession);
        };

        self.connections().bind_player(conn_id, player_id, username);
        guard.touch();

        let game_state = guard.board.as_mut().map(GameStateView::from_board);
        self.send_to_conn(
            conn_id,
            ServerMessage::GameRestored(Box::new(GameRestoredPayload {
                code: room_code.clone(),
                player_color: color,
                game_state,
            })),
        );
        if let Some(opponent) = guard.opponent(color) {
            self.send_to_player(opponent.player_id, ServerMessage::OpponentReconnected);
        }
        self.metrics().increment_reconnections_completed();

        info!(%player_id, room_code = %room_code, %color, "Player reconnected");
    }
}
