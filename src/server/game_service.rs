use chrono::Utc;
use tracing::{error, info, warn};

use super::{ConnectionId, GameServer, Room};
use crate::chess::{validate_move, Color, GameStatus, PromotionPiece, Square};
use crate::elo::{calculate_elo_change, Score};
use crate::protocol::validation;
use crate::protocol::{
    EloPair, ErrorCode, GameEndReason, GameEndedPayload, GameStateView, MoveView, PlayerId,
    ServerMessage,
};
use crate::users::GameOutcome;

impl GameServer {
    fn identified_player(&self, conn_id: ConnectionId) -> Result<PlayerId, ErrorCode> {
        self.connections()
            .player_for_conn(conn_id)
            .ok_or(ErrorCode::PlayerNotIdentified)
    }

    /// `make-move`: validate, apply, broadcast, and settle the game when
    /// the move is terminal. Rejections go to the sender only.
    pub async fn handle_make_move(
        &self,
        conn_id: ConnectionId,
        code: String,
        from: Square,
        to: Square,
        promotion: Option<PromotionPiece>,
    ) {
        let player_id = match self.identified_player(conn_id) {
            Ok(player_id) => player_id,
            Err(err) => return self.send_error_to_conn(conn_id, err),
        };
        let code = validation::normalize_room_code(&code);
        let Some(room) = self.rooms().get(&code) else {
            return self.send_error_to_conn(conn_id, ErrorCode::RoomNotFound);
        };
        let mut guard = room.lock().await;
        if guard.finished {
            return;
        }
        let Some(color) = guard.seat_color(player_id) else {
            return self.send_error_to_conn(conn_id, ErrorCode::NotInRoom);
        };
        let Some(board) = guard.board.as_mut() else {
            return self.send_error_to_conn(conn_id, ErrorCode::GameNotStarted);
        };

        if let Err(rejection) = validate_move(board, from, to, promotion, color) {
            self.metrics().increment_moves_rejected();
            self.send_to_conn(
                conn_id,
                ServerMessage::MoveInvalid {
                    reason: rejection.into(),
                    message: rejection.to_string(),
                },
            );
            return;
        }

        let Some(record) = board.make(from, to, promotion) else {
            // Unreachable after successful validation; nothing was mutated.
            error!(room_code = %code, "Validated move failed to apply");
            return;
        };
        let kings_intact = board.king_square(Color::White).is_some()
            && board.king_square(Color::Black).is_some();
        let view = GameStateView::from_board(board);
        let move_view = MoveView::from(record);

        if !kings_intact {
            self.fail_room_locked(&mut guard);
            return;
        }

        guard.draw_offer = None;
        guard.touch();
        self.metrics().increment_moves_applied();

        let status = view.status;
        let broadcast = ServerMessage::MoveMade {
            mv: move_view,
            game_state: view,
        };
        self.send_to_player(guard.white.player_id, broadcast.clone());
        if let Some(black) = &guard.black {
            self.send_to_player(black.player_id, broadcast);
        }

        match status {
            GameStatus::Playing => {}
            GameStatus::Checkmate { winner } => {
                self.finish_game_locked(&mut guard, GameEndReason::Checkmate, Some(winner))
                    .await;
            }
            GameStatus::Stalemate => {
                self.finish_game_locked(&mut guard, GameEndReason::Stalemate, None)
                    .await;
            }
            GameStatus::Draw { .. } => {
                self.finish_game_locked(&mut guard, GameEndReason::Draw, None)
                    .await;
            }
        }
    }

    /// `chat-message`: echo to the sender and deliver to the opponent,
    /// stamped with the server clock.
    pub async fn handle_chat_message(&self, conn_id: ConnectionId, code: String, message: String) {
        let player_id = match self.identified_player(conn_id) {
            Ok(player_id) => player_id,
            Err(err) => return self.send_error_to_conn(conn_id, err),
        };
        let code = validation::normalize_room_code(&code);
        let Some(room) = self.rooms().get(&code) else {
            return self.send_error_to_conn(conn_id, ErrorCode::RoomNotFound);
        };
        let mut guard = room.lock().await;
        let Some(color) = guard.seat_color(player_id) else {
            return self.send_error_to_conn(conn_id, ErrorCode::NotInRoom);
        };
        if let Err(err) = validation::validate_chat_message(&message, self.protocol_config()) {
            return self.send_error_to_conn(conn_id, err);
        }
        let Some(sender_seat) = guard.seat(color) else {
            return;
        };

        let frame = ServerMessage::ChatMessage {
            sender: sender_seat.username.clone(),
            message,
            timestamp: Utc::now(),
        };
        self.send_to_player(guard.white.player_id, frame.clone());
        if let Some(black) = &guard.black {
            self.send_to_player(black.player_id, frame);
        }
        self.metrics().increment_chat_messages_relayed();
        guard.touch();
    }

    /// `offer-draw`: record the pending offer and forward it.
    pub async fn handle_offer_draw(&self, conn_id: ConnectionId, code: String) {
        let player_id = match self.identified_player(conn_id) {
            Ok(player_id) => player_id,
            Err(err) => return self.send_error_to_conn(conn_id, err),
        };
        let code = validation::normalize_room_code(&code);
        let Some(room) = self.rooms().get(&code) else {
            return self.send_error_to_conn(conn_id, ErrorCode::RoomNotFound);
        };
        let mut guard = room.lock().await;
        if guard.finished {
            return;
        }
        let Some(color) = guard.seat_color(player_id) else {
            return self.send_error_to_conn(conn_id, ErrorCode::NotInRoom);
        };
        if guard.board.is_none() {
            return self.send_error_to_conn(conn_id, ErrorCode::GameNotStarted);
        }

        guard.draw_offer = Some(color);
        guard.touch();
        if let Some(opponent) = guard.opponent(color) {
            self.send_to_player(opponent.player_id, ServerMessage::DrawOffered);
        }
        info!(room_code = %code, %color, "Draw offered");
    }

    /// `respond-draw`: requires a pending offer from the opponent.
    pub async fn handle_respond_draw(&self, conn_id: ConnectionId, code: String, accept: bool) {
        let player_id = match self.identified_player(conn_id) {
            Ok(player_id) => player_id,
            Err(err) => return self.send_error_to_conn(conn_id, err),
        };
        let code = validation::normalize_room_code(&code);
        let Some(room) = self.rooms().get(&code) else {
            return self.send_error_to_conn(conn_id, ErrorCode::RoomNotFound);
        };
        let mut guard = room.lock().await;
        if guard.finished {
            return;
        }
        let Some(color) = guard.seat_color(player_id) else {
            return self.send_error_to_conn(conn_id, ErrorCode::NotInRoom);
        };
        if guard.draw_offer != Some(color.opposite()) {
            return self.send_error_to_conn(conn_id, ErrorCode::NoPendingDrawOffer);
        }

        if accept {
            info!(room_code = %code, "Draw accepted");
            self.metrics().increment_draws_agreed();
            self.finish_game_locked(&mut guard, GameEndReason::Draw, None)
                .await;
        } else {
            guard.draw_offer = None;
            guard.touch();
            if let Some(offerer) = guard.opponent(color) {
                self.send_to_player(offerer.player_id, ServerMessage::DrawDeclined);
            }
            info!(room_code = %code, "Draw declined");
        }
    }

    /// `resign`: the opposing color wins immediately.
    pub async fn handle_resign(&self, conn_id: ConnectionId, code: String) {
        let player_id = match self.identified_player(conn_id) {
            Ok(player_id) => player_id,
            Err(err) => return self.send_error_to_conn(conn_id, err),
        };
        let code = validation::normalize_room_code(&code);
        let Some(room) = self.rooms().get(&code) else {
            return self.send_error_to_conn(conn_id, ErrorCode::RoomNotFound);
        };
        let mut guard = room.lock().await;
        if guard.finished {
            return;
        }
        let Some(color) = guard.seat_color(player_id) else {
            return self.send_error_to_conn(conn_id, ErrorCode::NotInRoom);
        };
        if guard.black.is_none() {
            // Resigning an unpaired room just abandons it.
            self.teardown_room_locked(&mut guard);
            return;
        }

        info!(room_code = %code, %color, "Player resigned");
        self.metrics().increment_resignations();
        self.finish_game_locked(
            &mut guard,
            GameEndReason::Resignation,
            Some(color.opposite()),
        )
        .await;
    }

    /// End-of-game procedure: score both seats, apply ELO deltas, persist
    /// through the user store (once per seat), emit `game-ended` to both,
    /// and dismantle the room. Idempotent via `Room::finished`.
    pub(crate) async fn finish_game_locked(
        &self,
        room: &mut Room,
        reason: GameEndReason,
        winner: Option<Color>,
    ) {
        if room.finished {
            return;
        }
        room.finished = true;

        let white = room.white.clone();
        let Some(black) = room.black.clone() else {
            self.teardown_room_locked(room);
            return;
        };

        let (white_score, black_score, white_outcome, black_outcome) = match winner {
            Some(Color::White) => (Score::Win, Score::Loss, GameOutcome::Win, GameOutcome::Loss),
            Some(Color::Black) => (Score::Loss, Score::Win, GameOutcome::Loss, GameOutcome::Win),
            None => (Score::Draw, Score::Draw, GameOutcome::Draw, GameOutcome::Draw),
        };

        let white_delta = calculate_elo_change(white.elo, black.elo, white_score);
        let black_delta = calculate_elo_change(black.elo, white.elo, black_score);
        let new_white_elo = white.elo + white_delta;
        let new_black_elo = black.elo + black_delta;

        if let Err(err) = self
            .user_store()
            .update_stats(&white.username, white_outcome, new_white_elo)
            .await
        {
            warn!(username = %white.username, error = %err, "Failed to persist game result");
        }
        if let Err(err) = self
            .user_store()
            .update_stats(&black.username, black_outcome, new_black_elo)
            .await
        {
            warn!(username = %black.username, error = %err, "Failed to persist game result");
        }

        let payload = GameEndedPayload {
            reason,
            winner,
            elo_changes: EloPair {
                white: white_delta,
                black: black_delta,
            },
            new_elos: EloPair {
                white: new_white_elo,
                black: new_black_elo,
            },
        };
        self.send_to_player(white.player_id, ServerMessage::GameEnded(payload.clone()));
        self.send_to_player(black.player_id, ServerMessage::GameEnded(payload));
        self.metrics().increment_games_completed();

        info!(
            room_code = %room.code,
            ?reason,
            winner = ?winner,
            white_delta,
            black_delta,
            "Game ended"
        );

        self.teardown_room_locked(room);
    }

    /// Internal invariant violation: tell both seats and discard the room.
    pub(crate) fn fail_room_locked(&self, room: &mut Room) {
        error!(room_code = %room.code, "Internal invariant violated; discarding room");
        let frame = ServerMessage::error(ErrorCode::InternalError);
        self.send_to_player(room.white.player_id, frame.clone());
        if let Some(black) = &room.black {
            self.send_to_player(black.player_id, frame);
        }
        self.teardown_room_locked(room);
    }
}
