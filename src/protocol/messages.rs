use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error_codes::ErrorCode;
use super::types::{ClientPlayerInfo, GameStateView, MoveView, PlayerId, SeatInfo};
use crate::chess::{Color, PromotionPiece, Square};

/// Message types sent from client to server. Frames are JSON envelopes
/// `{"event": ..., "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Create a private room; the caller is seated as white.
    CreateRoom { player_info: ClientPlayerInfo },
    /// Join a private room by its 6-character code (case-insensitive).
    JoinRoom {
        code: String,
        player_info: ClientPlayerInfo,
    },
    /// Enter the FIFO matchmaking queue.
    FindMatch { player_info: ClientPlayerInfo },
    /// Submit a move. Promotion is required when a pawn reaches the last
    /// rank; the server never picks a piece silently.
    MakeMove {
        code: String,
        from: Square,
        to: Square,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        promotion: Option<PromotionPiece>,
    },
    /// Send a chat line to the opponent (1..=500 characters).
    ChatMessage { code: String, message: String },
    /// Offer a draw to the opponent.
    OfferDraw { code: String },
    /// Accept or decline a pending draw offer.
    RespondDraw { code: String, accept: bool },
    /// Resign the game.
    Resign { code: String },
    /// Re-attach to an interrupted game within the forfeit window.
    ReconnectPlayer { player_id: PlayerId },
    /// Send a friend request to another user.
    FriendRequest { username: String },
    /// Accept a pending friend request.
    FriendAccept { username: String },
    /// Decline a pending friend request.
    FriendDecline { username: String },
    /// Remove an existing friend (mutual).
    FriendRemove { username: String },
    /// Fetch the current friend and request lists.
    FriendList,
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameEndReason {
    Checkmate,
    Stalemate,
    Draw,
    Resignation,
    Timeout,
}

/// Per-color value pair used for ELO deltas and new ratings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EloPair {
    pub white: i32,
    pub black: i32,
}

/// Payload for GameStarted / MatchFound. Boxed in the enum to keep the
/// variant small.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStartedPayload {
    pub code: String,
    /// The recipient's server-assigned identity; needed for reconnection.
    pub player_id: PlayerId,
    pub player_color: Color,
    pub white_player: SeatInfo,
    pub black_player: SeatInfo,
    pub game_state: GameStateView,
}

/// Payload for GameEnded, sent identically to both seats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEndedPayload {
    pub reason: GameEndReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Color>,
    pub elo_changes: EloPair,
    pub new_elos: EloPair,
}

/// Payload for GameRestored after a successful reconnection. The game
/// state is absent only when the room was still waiting for an opponent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRestoredPayload {
    pub code: String,
    pub player_color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_state: Option<GameStateView>,
}

/// Message types sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Room created; share the code with the intended opponent.
    RoomCreated { code: String, player_id: PlayerId },
    /// Both seats are filled and the board is live (private room path).
    GameStarted(Box<GameStartedPayload>),
    /// Both seats are filled via matchmaking. Same shape as GameStarted.
    MatchFound(Box<GameStartedPayload>),
    /// A validated move was applied. Broadcast to both seats.
    MoveMade {
        #[serde(rename = "move")]
        mv: MoveView,
        game_state: GameStateView,
    },
    /// The sender's move was rejected. Sent to the offender only.
    MoveInvalid { reason: ErrorCode, message: String },
    /// Chat line, echoed to the sender and delivered to the opponent.
    ChatMessage {
        sender: String,
        message: String,
        timestamp: DateTime<Utc>,
    },
    /// The opponent offered a draw.
    DrawOffered,
    /// The opponent declined the pending draw offer.
    DrawDeclined,
    /// Terminal outcome with rating changes.
    GameEnded(GameEndedPayload),
    /// The opponent's transport dropped; the forfeit clock is running.
    OpponentDisconnected,
    /// The opponent re-attached within the window.
    OpponentReconnected,
    /// Session restored after reconnection.
    GameRestored(Box<GameRestoredPayload>),
    /// A friend request arrived.
    FriendRequestReceived { from: String },
    /// Current friends and pending incoming requests.
    FriendList {
        friends: Vec<String>,
        incoming_requests: Vec<String>,
    },
    /// Generic error frame.
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error_code: Option<ErrorCode>,
    },
}

impl ServerMessage {
    /// Error frame carrying the code's canonical description.
    pub fn error(code: ErrorCode) -> Self {
        Self::Error {
            message: code.description().to_string(),
            error_code: Some(code),
        }
    }
}
