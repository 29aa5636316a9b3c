use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chess::MoveRejection;

/// Error kind tags for structured error handling. Serialized in
/// kebab-case, matching the event names on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    // Room lifecycle
    RoomNotFound,
    RoomFull,
    CannotJoinOwnRoom,
    NotInRoom,
    AlreadyInRoom,
    GameNotStarted,

    // Move validation
    NotYourTurn,
    NoPieceAtSource,
    NotYourPiece,
    MoveNotLegal,
    WouldLeaveKingInCheck,
    PromotionRequired,
    PromotionInvalid,
    InvalidCoordinates,

    // Reconnection
    NoActiveSession,

    // Chat
    MessageEmpty,
    MessageTooLong,

    // Identity
    PlayerNotIdentified,
    InvalidUsername,

    // Draw negotiation
    NoPendingDrawOffer,

    // Server
    InternalError,
}

impl ErrorCode {
    /// Human-readable description sent alongside the code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::RoomNotFound => "No room exists with that code.",
            Self::RoomFull => "That room already has two players.",
            Self::CannotJoinOwnRoom => "You cannot join a room you created.",
            Self::NotInRoom => "You are not seated in that room.",
            Self::AlreadyInRoom => "You are already seated in a room.",
            Self::GameNotStarted => "The game has not started; the room is waiting for an opponent.",
            Self::NotYourTurn => "It is not your turn to move.",
            Self::NoPieceAtSource => "There is no piece on the source square.",
            Self::NotYourPiece => "That piece does not belong to you.",
            Self::MoveNotLegal => "That piece cannot move to the target square.",
            Self::WouldLeaveKingInCheck => "That move would leave your king in check.",
            Self::PromotionRequired => {
                "A promotion piece (q, r, b or n) is required for that move."
            }
            Self::PromotionInvalid => "A promotion piece was supplied for a non-promoting move.",
            Self::InvalidCoordinates => "Square coordinates must be between 0 and 7.",
            Self::NoActiveSession => "No interrupted game session was found for that player.",
            Self::MessageEmpty => "Chat messages must not be empty.",
            Self::MessageTooLong => "Chat messages are limited to 500 characters.",
            Self::PlayerNotIdentified => "This connection is not associated with a player.",
            Self::InvalidUsername => {
                "Usernames must be 1-32 characters: letters, digits, '-' or '_'."
            }
            Self::NoPendingDrawOffer => "Your opponent has not offered a draw.",
            Self::InternalError => "An internal server error occurred.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl From<MoveRejection> for ErrorCode {
    fn from(rejection: MoveRejection) -> Self {
        match rejection {
            MoveRejection::InvalidCoordinates => Self::InvalidCoordinates,
            MoveRejection::NoPieceAtSource => Self::NoPieceAtSource,
            MoveRejection::NotYourPiece => Self::NotYourPiece,
            MoveRejection::NotYourTurn => Self::NotYourTurn,
            MoveRejection::MoveNotLegal => Self::MoveNotLegal,
            MoveRejection::WouldLeaveKingInCheck => Self::WouldLeaveKingInCheck,
            MoveRejection::PromotionRequired => Self::PromotionRequired,
            MoveRejection::PromotionInvalid => Self::PromotionInvalid,
        }
    }
}
