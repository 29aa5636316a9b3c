//! WebSocket message protocol: envelopes, payload types, error taxonomy,
//! room-code generation and input validation.

pub mod error_codes;
pub mod messages;
pub mod room_codes;
pub mod types;
pub mod validation;

pub use error_codes::ErrorCode;
pub use messages::{
    ClientMessage, EloPair, GameEndReason, GameEndedPayload, GameRestoredPayload,
    GameStartedPayload, ServerMessage,
};
pub use room_codes::generate_room_code_with_config;
pub use types::{ClientPlayerInfo, GameStateView, MoveView, PlayerId, SeatInfo};
