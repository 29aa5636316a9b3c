//! Move generation and attack detection.
//!
//! Pseudo-legal moves follow piece geometry and occupancy only; the
//! legality filter applies each candidate with [`Board::make`], checks the
//! mover's king, and reverses with [`Board::unmake`] so no position is ever
//! cloned on the hot path.

use smallvec::SmallVec;

use super::board::Board;
use super::types::{Color, Piece, PieceKind, Square};

/// Destination list for a single piece. 27 is a queen's maximum on an
/// open board; one extra slot keeps the common case inline.
pub type MoveList = SmallVec<[Square; 28]>;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ROOK_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

impl Board {
    /// Whether `sq` is attacked by any piece of color `by`.
    ///
    /// Pawn attacks are the two forward diagonals only; pushes are not
    /// attacks. Sliders stop at the first occupied square but count it.
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        let d = by.pawn_direction();
        for dc in [-1i8, 1] {
            if let Some(origin) = sq.offset(-d, dc) {
                if self.piece_at(origin) == Some(Piece::new(PieceKind::Pawn, by)) {
                    return true;
                }
            }
        }

        for (dr, dc) in KNIGHT_OFFSETS {
            if let Some(origin) = sq.offset(dr, dc) {
                if self.piece_at(origin) == Some(Piece::new(PieceKind::Knight, by)) {
                    return true;
                }
            }
        }

        for (dr, dc) in KING_OFFSETS {
            if let Some(origin) = sq.offset(dr, dc) {
                if self.piece_at(origin) == Some(Piece::new(PieceKind::King, by)) {
                    return true;
                }
            }
        }

        for (dr, dc) in ROOK_DIRS {
            if let Some(piece) = self.first_piece_along(sq, dr, dc) {
                if piece.color == by
                    && matches!(piece.kind, PieceKind::Rook | PieceKind::Queen)
                {
                    return true;
                }
            }
        }

        for (dr, dc) in BISHOP_DIRS {
            if let Some(piece) = self.first_piece_along(sq, dr, dc) {
                if piece.color == by
                    && matches!(piece.kind, PieceKind::Bishop | PieceKind::Queen)
                {
                    return true;
                }
            }
        }

        false
    }

    /// Whether `color`'s king currently stands in check.
    pub fn in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|sq| self.is_attacked(sq, color.opposite()))
    }

    /// Pseudo-legal destinations for the piece on `from`. Empty when the
    /// square is vacant. Castling candidates already carry their full set
    /// of conditions (rights, clearance, no attacked transit square).
    pub fn pseudo_legal_from(&self, from: Square) -> MoveList {
        let mut out = MoveList::new();
        let Some(piece) = self.piece_at(from) else {
            return out;
        };
        match piece.kind {
            PieceKind::Pawn => self.pawn_moves(from, piece.color, &mut out),
            PieceKind::Knight => self.step_moves(from, piece.color, &KNIGHT_OFFSETS, &mut out),
            PieceKind::Bishop => self.ray_moves(from, piece.color, &BISHOP_DIRS, &mut out),
            PieceKind::Rook => self.ray_moves(from, piece.color, &ROOK_DIRS, &mut out),
            PieceKind::Queen => {
                self.ray_moves(from, piece.color, &ROOK_DIRS, &mut out);
                self.ray_moves(from, piece.color, &BISHOP_DIRS, &mut out);
            }
            PieceKind::King => {
                self.step_moves(from, piece.color, &KING_OFFSETS, &mut out);
                self.castle_moves(from, piece.color, &mut out);
            }
        }
        out
    }

    /// Legal destinations for the piece on `from`: pseudo-legal moves that
    /// do not leave the mover's own king attacked.
    pub fn legal_moves_from(&mut self, from: Square) -> MoveList {
        let Some(piece) = self.piece_at(from) else {
            return MoveList::new();
        };
        let mut out = MoveList::new();
        for to in self.pseudo_legal_from(from) {
            if self.make(from, to, None).is_some() {
                if !self.in_check(piece.color) {
                    out.push(to);
                }
                self.unmake();
            }
        }
        out
    }

    /// Whether the side to move has at least one legal move.
    pub fn has_any_legal_move(&mut self) -> bool {
        let side = self.side_to_move;
        for row in 0..8u8 {
            for col in 0..8u8 {
                let from = Square::new(row, col);
                if self.piece_at(from).map(|p| p.color) != Some(side) {
                    continue;
                }
                if !self.legal_moves_from(from).is_empty() {
                    return true;
                }
            }
        }
        false
    }

    /// Leaf-node count of the legal move tree to `depth` plies. Used by the
    /// movegen bench and the rules test suite as a correctness oracle.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let side = self.side_to_move;
        let mut nodes = 0;
        for row in 0..8u8 {
            for col in 0..8u8 {
                let from = Square::new(row, col);
                if self.piece_at(from).map(|p| p.color) != Some(side) {
                    continue;
                }
                for to in self.legal_moves_from(from) {
                    if self.make(from, to, None).is_some() {
                        nodes += self.perft(depth - 1);
                        self.unmake();
                    }
                }
            }
        }
        nodes
    }

    fn first_piece_along(&self, from: Square, dr: i8, dc: i8) -> Option<Piece> {
        let mut cur = from;
        while let Some(next) = cur.offset(dr, dc) {
            if let Some(piece) = self.piece_at(next) {
                return Some(piece);
            }
            cur = next;
        }
        None
    }

    fn step_moves(&self, from: Square, color: Color, offsets: &[(i8, i8)], out: &mut MoveList) {
        for &(dr, dc) in offsets {
            if let Some(to) = from.offset(dr, dc) {
                match self.piece_at(to) {
                    Some(piece) if piece.color == color => {}
                    _ => out.push(to),
                }
            }
        }
    }

    fn ray_moves(&self, from: Square, color: Color, dirs: &[(i8, i8)], out: &mut MoveList) {
        for &(dr, dc) in dirs {
            let mut cur = from;
            while let Some(next) = cur.offset(dr, dc) {
                match self.piece_at(next) {
                    None => {
                        out.push(next);
                        cur = next;
                    }
                    Some(piece) => {
                        if piece.color != color {
                            out.push(next);
                        }
                        break;
                    }
                }
            }
        }
    }

    fn pawn_moves(&self, from: Square, color: Color, out: &mut MoveList) {
        let d = color.pawn_direction();

        if let Some(one) = from.offset(d, 0) {
            if self.piece_at(one).is_none() {
                out.push(one);
                if from.row == color.pawn_start_row() {
                    if let Some(two) = from.offset(2 * d, 0) {
                        if self.piece_at(two).is_none() {
                            out.push(two);
                        }
                    }
                }
            }
        }

        for dc in [-1i8, 1] {
            if let Some(diag) = from.offset(d, dc) {
                match self.piece_at(diag) {
                    Some(piece) if piece.color != color => out.push(diag),
                    None if self.en_passant_target == Some(diag) => out.push(diag),
                    _ => {}
                }
            }
        }
    }

    fn castle_moves(&self, from: Square, color: Color, out: &mut MoveList) {
        let row = color.back_row();
        if from != Square::new(row, 4) {
            return;
        }
        let opponent = color.opposite();
        // A king in check may not castle out of it.
        if self.is_attacked(from, opponent) {
            return;
        }

        if self.castling.kingside(color)
            && self.piece_at(Square::new(row, 5)).is_none()
            && self.piece_at(Square::new(row, 6)).is_none()
            && self.piece_at(Square::new(row, 7)) == Some(Piece::new(PieceKind::Rook, color))
            && !self.is_attacked(Square::new(row, 5), opponent)
            && !self.is_attacked(Square::new(row, 6), opponent)
        {
            out.push(Square::new(row, 6));
        }

        if self.castling.queenside(color)
            && self.piece_at(Square::new(row, 1)).is_none()
            && self.piece_at(Square::new(row, 2)).is_none()
            && self.piece_at(Square::new(row, 3)).is_none()
            && self.piece_at(Square::new(row, 0)) == Some(Piece::new(PieceKind::Rook, color))
            && !self.is_attacked(Square::new(row, 3), opponent)
            && !self.is_attacked(Square::new(row, 2), opponent)
        {
            out.push(Square::new(row, 2));
        }
    }
}
