use thiserror::Error;

use super::board::Board;
use super::types::{Color, PieceKind, PromotionPiece, Square};

/// Reasons a `make-move` request is rejected. Wire kind tags live in
/// [`crate::protocol::ErrorCode`]; this enum carries the validation
/// outcome inside the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("coordinates are off the board")]
    InvalidCoordinates,
    #[error("no piece at the source square")]
    NoPieceAtSource,
    #[error("that piece is not yours")]
    NotYourPiece,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("that piece cannot move there")]
    MoveNotLegal,
    #[error("the move would leave your king in check")]
    WouldLeaveKingInCheck,
    #[error("a promotion piece is required")]
    PromotionRequired,
    #[error("a promotion piece was supplied for a non-promoting move")]
    PromotionInvalid,
}

/// Stateless validation of a move request against the current position.
///
/// `claimed_color` is the seat color of the requesting player; turn
/// ownership is enforced here, legality is delegated to the move
/// generator. The board is only borrowed mutably for make/unmake and is
/// returned unchanged.
pub fn validate_move(
    board: &mut Board,
    from: Square,
    to: Square,
    promotion: Option<PromotionPiece>,
    claimed_color: Color,
) -> Result<(), MoveRejection> {
    if !from.in_bounds() || !to.in_bounds() {
        return Err(MoveRejection::InvalidCoordinates);
    }

    let piece = board.piece_at(from).ok_or(MoveRejection::NoPieceAtSource)?;
    if piece.color != claimed_color {
        return Err(MoveRejection::NotYourPiece);
    }
    if board.side_to_move != claimed_color {
        return Err(MoveRejection::NotYourTurn);
    }

    if !board.pseudo_legal_from(from).contains(&to) {
        return Err(MoveRejection::MoveNotLegal);
    }
    if !board.legal_moves_from(from).contains(&to) {
        return Err(MoveRejection::WouldLeaveKingInCheck);
    }

    let promotes = piece.kind == PieceKind::Pawn && to.row == piece.color.promotion_row();
    if promotes && promotion.is_none() {
        return Err(MoveRejection::PromotionRequired);
    }
    if !promotes && promotion.is_some() {
        return Err(MoveRejection::PromotionInvalid);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::Piece;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col)
    }

    #[test]
    fn accepts_a_simple_opening_move() {
        let mut board = Board::new();
        assert_eq!(
            validate_move(&mut board, sq(6, 4), sq(4, 4), None, Color::White),
            Ok(())
        );
        // Validation must not mutate the position.
        assert_eq!(board, Board::new());
    }

    #[test]
    fn rejects_out_of_turn_and_wrong_owner() {
        let mut board = Board::new();
        assert_eq!(
            validate_move(&mut board, sq(1, 4), sq(3, 4), None, Color::Black),
            Err(MoveRejection::NotYourTurn)
        );
        assert_eq!(
            validate_move(&mut board, sq(1, 4), sq(3, 4), None, Color::White),
            Err(MoveRejection::NotYourPiece)
        );
    }

    #[test]
    fn rejects_empty_source_square() {
        let mut board = Board::new();
        assert_eq!(
            validate_move(&mut board, sq(4, 4), sq(3, 4), None, Color::White),
            Err(MoveRejection::NoPieceAtSource)
        );
    }

    #[test]
    fn rejects_geometry_violations() {
        let mut board = Board::new();
        assert_eq!(
            validate_move(&mut board, sq(7, 0), sq(4, 0), None, Color::White),
            Err(MoveRejection::MoveNotLegal)
        );
    }

    #[test]
    fn rejects_moves_that_expose_the_king() {
        let mut board = Board::empty();
        board.place(sq(7, 4), Piece::new(PieceKind::King, Color::White));
        board.place(sq(5, 4), Piece::new(PieceKind::Knight, Color::White));
        board.place(sq(0, 4), Piece::new(PieceKind::Rook, Color::Black));
        board.place(sq(0, 0), Piece::new(PieceKind::King, Color::Black));
        assert_eq!(
            validate_move(&mut board, sq(5, 4), sq(3, 3), None, Color::White),
            Err(MoveRejection::WouldLeaveKingInCheck)
        );
    }

    #[test]
    fn promotion_requires_an_explicit_choice() {
        let mut board = Board::empty();
        board.place(sq(1, 0), Piece::new(PieceKind::Pawn, Color::White));
        board.place(sq(7, 4), Piece::new(PieceKind::King, Color::White));
        board.place(sq(0, 4), Piece::new(PieceKind::King, Color::Black));

        assert_eq!(
            validate_move(&mut board, sq(1, 0), sq(0, 0), None, Color::White),
            Err(MoveRejection::PromotionRequired)
        );
        assert_eq!(
            validate_move(
                &mut board,
                sq(1, 0),
                sq(0, 0),
                Some(PromotionPiece::Queen),
                Color::White
            ),
            Ok(())
        );
    }

    #[test]
    fn promotion_choice_on_ordinary_move_is_invalid() {
        let mut board = Board::new();
        assert_eq!(
            validate_move(
                &mut board,
                sq(6, 4),
                sq(4, 4),
                Some(PromotionPiece::Queen),
                Color::White
            ),
            Err(MoveRejection::PromotionInvalid)
        );
    }
}
