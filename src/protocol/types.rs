use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chess::{Board, Color, GameStatus, MoveKind, MoveRecord, Piece, PromotionPiece, Square};

/// Stable player identity assigned by the server on first seat binding.
pub type PlayerId = Uuid;

/// Identity a client presents when entering a room or the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientPlayerInfo {
    pub username: String,
}

/// One seat as seen by the clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatInfo {
    pub username: String,
    pub elo: i32,
}

/// A single applied move in wire form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveView {
    pub from: Square,
    pub to: Square,
    /// Moved piece as a character, uppercase = white.
    pub piece: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured: Option<char>,
    pub kind: MoveKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PromotionPiece>,
}

impl From<MoveRecord> for MoveView {
    fn from(record: MoveRecord) -> Self {
        Self {
            from: record.from,
            to: record.to,
            piece: record.piece.to_char(),
            captured: record.captured.map(Piece::to_char),
            kind: record.kind,
            promotion: record.promotion,
        }
    }
}

/// Full board snapshot broadcast with every move and on restore. Both
/// seats receive the same snapshot under the room lock, so the pair
/// always observes a consistent view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateView {
    /// 8x8 matrix of piece characters; row 0 is black's back rank.
    pub board: [[Option<char>; 8]; 8],
    pub side_to_move: Color,
    pub captured_by_white: Vec<char>,
    pub captured_by_black: Vec<char>,
    pub in_check: bool,
    pub status: GameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_move: Option<MoveView>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl GameStateView {
    /// Snapshot the position. Mutable access is only for the status
    /// probe's make/unmake; the board is returned unchanged.
    pub fn from_board(board: &mut Board) -> Self {
        let status = board.status();
        Self {
            board: board.char_matrix(),
            side_to_move: board.side_to_move,
            captured_by_white: board.captured_by_white.iter().copied().map(Piece::to_char).collect(),
            captured_by_black: board.captured_by_black.iter().copied().map(Piece::to_char).collect(),
            in_check: board.in_check(board.side_to_move),
            status,
            last_move: board.history.last().copied().map(MoveView::from),
            halfmove_clock: board.halfmove_clock,
            fullmove_number: board.fullmove_number,
        }
    }
}
