//! End-to-end rule engine scenarios, driven through the same validator
//! and board the orchestrator uses.

use chess_arbiter_server::chess::{
    validate_move, Board, Color, GameStatus, MoveKind, MoveRejection, Piece, PieceKind,
    PromotionPiece, Square,
};
use proptest::prelude::*;

fn sq(row: u8, col: u8) -> Square {
    Square::new(row, col)
}

fn play(board: &mut Board, from: Square, to: Square) {
    let color = board.side_to_move;
    validate_move(board, from, to, None, color).expect("scripted move should be legal");
    board.make(from, to, None).expect("apply");
}

#[test]
fn fools_mate_is_checkmate_for_black() {
    let mut board = Board::new();
    play(&mut board, sq(6, 5), sq(5, 5)); // f3
    play(&mut board, sq(1, 4), sq(3, 4)); // e5
    play(&mut board, sq(6, 6), sq(4, 6)); // g4
    play(&mut board, sq(0, 3), sq(4, 7)); // Qh4#

    assert_eq!(board.side_to_move, Color::White);
    assert!(board.in_check(Color::White));
    assert_eq!(
        board.status(),
        GameStatus::Checkmate {
            winner: Color::Black
        }
    );
}

#[test]
fn en_passant_window_opens_and_closes() {
    let mut board = Board::new();
    play(&mut board, sq(6, 4), sq(4, 4)); // e4
    play(&mut board, sq(1, 0), sq(2, 0)); // a6
    play(&mut board, sq(4, 4), sq(3, 4)); // e5
    play(&mut board, sq(1, 3), sq(3, 3)); // d5

    assert_eq!(board.en_passant_target, Some(sq(2, 3)));
    let moves = board.legal_moves_from(sq(3, 4));
    assert!(moves.contains(&sq(2, 3)));

    let record = board.make(sq(3, 4), sq(2, 3), None).unwrap();
    assert_eq!(record.kind, MoveKind::EnPassant);
    assert_eq!(board.piece_at(sq(3, 3)), None);
    assert_eq!(
        board.piece_at(sq(2, 3)),
        Some(Piece::new(PieceKind::Pawn, Color::White))
    );
}

#[test]
fn en_passant_expires_after_one_move() {
    let mut board = Board::new();
    play(&mut board, sq(6, 4), sq(4, 4)); // e4
    play(&mut board, sq(1, 0), sq(2, 0)); // a6
    play(&mut board, sq(4, 4), sq(3, 4)); // e5
    play(&mut board, sq(1, 3), sq(3, 3)); // d5
    play(&mut board, sq(6, 0), sq(5, 0)); // a3 (declines the capture)
    play(&mut board, sq(2, 0), sq(3, 0)); // a5

    assert_eq!(board.en_passant_target, None);
    assert!(!board.legal_moves_from(sq(3, 4)).contains(&sq(2, 3)));
}

#[test]
fn castling_out_of_check_is_rejected() {
    let mut board = Board::empty();
    board.place(sq(7, 4), Piece::new(PieceKind::King, Color::White));
    board.place(sq(7, 7), Piece::new(PieceKind::Rook, Color::White));
    board.place(sq(0, 4), Piece::new(PieceKind::Rook, Color::Black));
    board.place(sq(0, 0), Piece::new(PieceKind::King, Color::Black));

    assert!(board.in_check(Color::White));
    assert_eq!(
        validate_move(&mut board, sq(7, 4), sq(7, 6), None, Color::White),
        Err(MoveRejection::MoveNotLegal)
    );
}

#[test]
fn castling_through_an_attacked_square_is_rejected() {
    let mut board = Board::empty();
    board.place(sq(7, 4), Piece::new(PieceKind::King, Color::White));
    board.place(sq(7, 7), Piece::new(PieceKind::Rook, Color::White));
    board.place(sq(0, 5), Piece::new(PieceKind::Rook, Color::Black));
    board.place(sq(0, 0), Piece::new(PieceKind::King, Color::Black));

    assert!(!board.in_check(Color::White));
    assert_eq!(
        validate_move(&mut board, sq(7, 4), sq(7, 6), None, Color::White),
        Err(MoveRejection::MoveNotLegal)
    );
}

#[test]
fn promotion_needs_a_choice_and_honors_it() {
    let mut board = Board::empty();
    board.place(sq(1, 0), Piece::new(PieceKind::Pawn, Color::White));
    board.place(sq(7, 4), Piece::new(PieceKind::King, Color::White));
    board.place(sq(0, 4), Piece::new(PieceKind::King, Color::Black));

    assert_eq!(
        validate_move(&mut board, sq(1, 0), sq(0, 0), None, Color::White),
        Err(MoveRejection::PromotionRequired)
    );

    validate_move(
        &mut board,
        sq(1, 0),
        sq(0, 0),
        Some(PromotionPiece::Queen),
        Color::White,
    )
    .unwrap();
    board
        .make(sq(1, 0), sq(0, 0), Some(PromotionPiece::Queen))
        .unwrap();
    assert_eq!(
        board.piece_at(sq(0, 0)),
        Some(Piece::new(PieceKind::Queen, Color::White))
    );
}

#[test]
fn legal_moves_equal_pseudo_legal_minus_self_check() {
    // Position with a pin: every pseudo-legal move either stays legal or
    // leaves the king attacked, never anything else.
    let mut board = Board::new();
    play(&mut board, sq(6, 4), sq(4, 4)); // e4
    play(&mut board, sq(1, 4), sq(3, 4)); // e5
    play(&mut board, sq(7, 6), sq(5, 5)); // Nf3
    play(&mut board, sq(0, 3), sq(4, 7)); // Qh4 (eyes f2/e1)

    let side = board.side_to_move;
    for row in 0..8u8 {
        for col in 0..8u8 {
            let from = sq(row, col);
            if board.piece_at(from).map(|p| p.color) != Some(side) {
                continue;
            }
            let legal = board.legal_moves_from(from);
            for to in board.pseudo_legal_from(from) {
                let stays_safe = {
                    board.make(from, to, None).unwrap();
                    let safe = !board.in_check(side);
                    board.unmake().unwrap();
                    safe
                };
                assert_eq!(
                    legal.contains(&to),
                    stays_safe,
                    "{from}->{to} legality mismatch"
                );
            }
        }
    }
}

/// Play a pseudo-random legal game of up to `selectors.len()` plies,
/// asserting after every ply that unmaking restores the previous
/// position bit-identically, and that castling rights never come back.
fn random_playout(selectors: &[u16]) {
    let mut board = Board::new();
    let mut snapshots = Vec::new();

    for &selector in selectors {
        if board.status() != GameStatus::Playing {
            break;
        }
        let side = board.side_to_move;
        let mut moves = Vec::new();
        for row in 0..8u8 {
            for col in 0..8u8 {
                let from = sq(row, col);
                if board.piece_at(from).map(|p| p.color) == Some(side) {
                    for to in board.legal_moves_from(from) {
                        moves.push((from, to));
                    }
                }
            }
        }
        if moves.is_empty() {
            break;
        }
        let (from, to) = moves[selector as usize % moves.len()];
        let rights_before = board.castling;
        snapshots.push(board.clone());
        board.make(from, to, None).unwrap();

        // Monotonicity: no lost right is ever regained.
        let rights_after = board.castling;
        assert!(!rights_after.white_kingside || rights_before.white_kingside);
        assert!(!rights_after.white_queenside || rights_before.white_queenside);
        assert!(!rights_after.black_kingside || rights_before.black_kingside);
        assert!(!rights_after.black_queenside || rights_before.black_queenside);
    }

    // Unwind the whole game; every intermediate position must match.
    while let Some(expected) = snapshots.pop() {
        board.unmake().unwrap();
        assert_eq!(board, expected);
    }
    assert_eq!(board, Board::new());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn make_unmake_round_trips_random_games(selectors in proptest::collection::vec(any::<u16>(), 1..40)) {
        random_playout(&selectors);
    }
}
