use serde::{Deserialize, Serialize};

use super::board::Board;
use super::types::{Color, PieceKind, Square};

/// Why a game ended in a draw by rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrawReason {
    FiftyMoveRule,
    InsufficientMaterial,
}

/// Status of the position with respect to the side to move.
///
/// Threefold repetition is intentionally not detected; see DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GameStatus {
    Playing,
    Checkmate { winner: Color },
    Stalemate,
    Draw { reason: DrawReason },
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

impl Board {
    /// Terminal status for the side to move. Called after every applied
    /// move, once the side to move has flipped.
    pub fn status(&mut self) -> GameStatus {
        let side = self.side_to_move;
        if !self.has_any_legal_move() {
            return if self.in_check(side) {
                GameStatus::Checkmate {
                    winner: side.opposite(),
                }
            } else {
                GameStatus::Stalemate
            };
        }
        if self.halfmove_clock >= 100 {
            return GameStatus::Draw {
                reason: DrawReason::FiftyMoveRule,
            };
        }
        if self.insufficient_material() {
            return GameStatus::Draw {
                reason: DrawReason::InsufficientMaterial,
            };
        }
        GameStatus::Playing
    }

    /// K vs K, K+B vs K and K+N vs K are dead positions.
    pub fn insufficient_material(&self) -> bool {
        let mut minor_count = 0usize;
        for row in 0..8u8 {
            for col in 0..8u8 {
                let Some(piece) = self.piece_at(Square::new(row, col)) else {
                    continue;
                };
                match piece.kind {
                    PieceKind::King => {}
                    PieceKind::Bishop | PieceKind::Knight => {
                        minor_count += 1;
                        if minor_count > 1 {
                            return false;
                        }
                    }
                    _ => return false,
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::Piece;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col)
    }

    #[test]
    fn fresh_game_is_playing() {
        let mut board = Board::new();
        assert_eq!(board.status(), GameStatus::Playing);
    }

    #[test]
    fn back_rank_mate_is_checkmate() {
        let mut board = Board::empty();
        board.place(sq(7, 6), Piece::new(PieceKind::King, Color::White));
        board.place(sq(6, 5), Piece::new(PieceKind::Pawn, Color::White));
        board.place(sq(6, 6), Piece::new(PieceKind::Pawn, Color::White));
        board.place(sq(6, 7), Piece::new(PieceKind::Pawn, Color::White));
        board.place(sq(7, 0), Piece::new(PieceKind::Rook, Color::Black));
        board.place(sq(0, 0), Piece::new(PieceKind::King, Color::Black));
        assert_eq!(
            board.status(),
            GameStatus::Checkmate {
                winner: Color::Black
            }
        );
    }

    #[test]
    fn cornered_king_with_no_moves_is_stalemate() {
        // Black king a8, white queen c7, white king a6: black to move.
        let mut board = Board::empty();
        board.place(sq(0, 0), Piece::new(PieceKind::King, Color::Black));
        board.place(sq(1, 2), Piece::new(PieceKind::Queen, Color::White));
        board.place(sq(2, 0), Piece::new(PieceKind::King, Color::White));
        board.side_to_move = Color::Black;
        assert_eq!(board.status(), GameStatus::Stalemate);
    }

    #[test]
    fn halfmove_clock_at_hundred_is_a_draw() {
        let mut board = Board::new();
        board.halfmove_clock = 100;
        assert_eq!(
            board.status(),
            GameStatus::Draw {
                reason: DrawReason::FiftyMoveRule
            }
        );
    }

    #[test]
    fn bare_kings_are_insufficient_material() {
        let mut board = Board::empty();
        board.place(sq(0, 4), Piece::new(PieceKind::King, Color::Black));
        board.place(sq(7, 4), Piece::new(PieceKind::King, Color::White));
        assert!(board.insufficient_material());
        assert_eq!(
            board.status(),
            GameStatus::Draw {
                reason: DrawReason::InsufficientMaterial
            }
        );
    }

    #[test]
    fn king_and_knight_versus_king_is_insufficient() {
        let mut board = Board::empty();
        board.place(sq(0, 4), Piece::new(PieceKind::King, Color::Black));
        board.place(sq(7, 4), Piece::new(PieceKind::King, Color::White));
        board.place(sq(4, 4), Piece::new(PieceKind::Knight, Color::White));
        assert!(board.insufficient_material());
    }

    #[test]
    fn king_and_pawn_is_sufficient_material() {
        let mut board = Board::empty();
        board.place(sq(0, 4), Piece::new(PieceKind::King, Color::Black));
        board.place(sq(7, 4), Piece::new(PieceKind::King, Color::White));
        board.place(sq(4, 4), Piece::new(PieceKind::Pawn, Color::White));
        assert!(!board.insufficient_material());
    }

    #[test]
    fn two_minors_are_sufficient_material() {
        let mut board = Board::empty();
        board.place(sq(0, 4), Piece::new(PieceKind::King, Color::Black));
        board.place(sq(0, 0), Piece::new(PieceKind::Bishop, Color::Black));
        board.place(sq(7, 4), Piece::new(PieceKind::King, Color::White));
        board.place(sq(4, 4), Piece::new(PieceKind::Knight, Color::White));
        assert!(!board.insufficient_material());
    }
}
