//! Mutable board state with reversible make/unmake.
//!
//! [`Board`] keeps the piece array, per-color occupancy bitboards, per-piece
//! square lists, king squares and the incrementally-maintained Zobrist key
//! all in sync through three primitives (`put_piece`, `remove_piece`,
//! `move_piece`). Every [`Board::make_move`] pushes a snapshot of the
//! irreversible state onto a bounded history stack, so
//! [`Board::unmake_move`] restores the previous position in O(1).

use std::fmt;

use chess_core::{Color, Fen, FenError, Move, MoveKind, Piece, PieceType, Rank, Square};

use crate::movegen;
use crate::zobrist::ZOBRIST;
use crate::Bitboard;

/// Upper bound on the make/unmake history depth.
pub const MAX_PLIES: usize = 2048;

/// Castling rights flags, one bit per right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;

    /// Creates castling rights from raw flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Returns true if the given side may still castle kingside.
    #[inline]
    pub const fn kingside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Returns true if the given side may still castle queenside.
    #[inline]
    pub const fn queenside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Returns the raw 4-bit mask.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }
        for (flag, c) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.0 & flag != 0 {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

// Castling rights surviving a move touching each square: moving the king or
// a rook away from (or capturing a rook on) its home square strips the
// corresponding rights, every other square keeps all four bits.
#[rustfmt::skip]
const CASTLE_PERM: [u8; 64] = [
    13, 15, 15, 15, 12, 15, 15, 14,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
     7, 15, 15, 15,  3, 15, 15, 11,
];

// Most squares of one piece type that can coexist: the two original rooks
// plus eight underpromotions.
const MAX_PER_PIECE: usize = 10;

/// Snapshot of the irreversible state, pushed before every move.
#[derive(Debug, Clone, Copy)]
struct StateInfo {
    mv: Move,
    key: u64,
    rule50: u32,
    ep_square: Option<Square>,
    castling: CastlingRights,
    captured: Piece,
}

/// A chess position plus the history needed to take moves back.
#[derive(Clone)]
pub struct Board {
    pieces: [Piece; 64],
    by_color: [Bitboard; 2],
    piece_list: [[Square; MAX_PER_PIECE]; Piece::COUNT],
    piece_count: [usize; Piece::COUNT],
    king_square: [Square; 2],
    side_to_move: Color,
    ep_square: Option<Square>,
    castling: CastlingRights,
    rule50: u32,
    game_ply: usize,
    key: u64,
    history: Vec<StateInfo>,
}

impl Board {
    /// Creates an empty board. Use [`Board::set_fen`] to give it a position.
    pub fn new() -> Self {
        Board {
            pieces: [Piece::NONE; 64],
            by_color: [Bitboard::EMPTY; 2],
            piece_list: [[Square::A1; MAX_PER_PIECE]; Piece::COUNT],
            piece_count: [0; Piece::COUNT],
            // placeholders until a king is placed
            king_square: [Square::E1, Square::E8],
            side_to_move: Color::White,
            ep_square: None,
            castling: CastlingRights::NONE,
            rule50: 0,
            game_ply: 0,
            key: 0,
            history: Vec::with_capacity(MAX_PLIES),
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(Fen::STARTPOS).expect("startpos FEN is valid")
    }

    /// Creates a board from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::new();
        board.set_fen(fen)?;
        Ok(board)
    }

    /// Resets the board and loads the given FEN position.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let fen = Fen::parse(fen)?;
        *self = Board::new();

        for (i, rank_str) in fen.placement.split('/').enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(d) = c.to_digit(10) {
                    file += d as u8;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    // SAFETY: the FEN reader validated eight squares per rank
                    let sq = unsafe { Square::from_index_unchecked(rank * 8 + file) };
                    self.pieces[sq.index() as usize] = piece;
                    file += 1;
                }
            }
        }

        self.side_to_move = if fen.white_to_move {
            Color::White
        } else {
            Color::Black
        };

        let mut rights = 0u8;
        for c in fen.castling.chars() {
            match c {
                'K' => rights |= CastlingRights::WHITE_KINGSIDE,
                'Q' => rights |= CastlingRights::WHITE_QUEENSIDE,
                'k' => rights |= CastlingRights::BLACK_KINGSIDE,
                'q' => rights |= CastlingRights::BLACK_QUEENSIDE,
                _ => {}
            }
        }
        self.castling = CastlingRights::new(rights);

        // A target square is only meaningful on the rank a double push of
        // the previous mover could have produced; anything else is ignored.
        let ep_rank = match self.side_to_move {
            Color::White => Rank::R6,
            Color::Black => Rank::R3,
        };
        self.ep_square = fen.en_passant.filter(|sq| sq.rank() == ep_rank);

        self.rule50 = fen.halfmove_clock;
        self.game_ply = 2 * fen.fullmove_number.saturating_sub(1) as usize
            + (self.side_to_move == Color::Black) as usize;

        self.rebuild_lists();
        self.key = self.compute_key();
        Ok(())
    }

    /// Serializes the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let sq = unsafe { Square::from_index_unchecked(rank * 8 + file) };
                let piece = self.piece_on(sq);
                if piece.is_some() {
                    if empty > 0 {
                        fen.push_str(&empty.to_string());
                        empty = 0;
                    }
                    fen.push(piece.to_fen_char());
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let ep = match self.ep_square {
            Some(sq) => sq.to_algebraic(),
            None => "-".to_string(),
        };
        let fullmove = self.game_ply / 2 + 1;
        fen.push_str(&format!(
            " {} {} {} {} {}",
            side, self.castling, ep, self.rule50, fullmove
        ));
        fen
    }

    // --- accessors ---

    /// Returns the piece on the given square.
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Piece {
        self.pieces[sq.index() as usize]
    }

    /// Returns the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the en-passant target square, if a capture is available.
    #[inline]
    pub fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    /// Returns the current castling rights.
    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the halfmove clock of the 50-move rule.
    #[inline]
    pub fn rule50(&self) -> u32 {
        self.rule50
    }

    /// Returns the number of plies since the start of the game.
    #[inline]
    pub fn game_ply(&self) -> usize {
        self.game_ply
    }

    /// Returns the Zobrist key of the current position.
    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    /// Returns the occupancy of one color.
    #[inline]
    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.by_color[color.index()]
    }

    /// Returns the occupancy of both colors.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.by_color[0] | self.by_color[1]
    }

    /// Returns the king square of the given color.
    ///
    /// Meaningful only while that king is on the board.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_square[color.index()]
    }

    /// Returns the squares currently holding the given piece, in no
    /// particular order.
    #[inline]
    pub fn piece_squares(&self, piece: Piece) -> &[Square] {
        &self.piece_list[piece.raw()][..self.piece_count[piece.raw()]]
    }

    /// Returns true if the given color's king is attacked.
    #[inline]
    pub fn in_check(&self, color: Color) -> bool {
        movegen::is_square_attacked(self, self.king_square(color), color.opposite())
    }

    /// Returns true if the current position occurred before within the
    /// 50-move window.
    pub fn is_repetition(&self) -> bool {
        self.history
            .iter()
            .rev()
            .take(self.rule50 as usize)
            .skip(1)
            .any(|st| st.key == self.key)
    }

    // --- state machine ---

    /// Applies a pseudo-legal move.
    ///
    /// Returns false if the move would leave the mover's king in check; the
    /// board is then restored to exactly its prior state, key included.
    pub fn make_move(&mut self, m: Move) -> bool {
        let from = m.from();
        let to = m.to();
        let us = self.side_to_move;

        debug_assert!(self.piece_on(from).is_some());
        debug_assert!(self.history.len() < MAX_PLIES);

        self.history.push(StateInfo {
            mv: m,
            key: self.key,
            rule50: self.rule50,
            ep_square: self.ep_square,
            castling: self.castling,
            // empty for quiet moves, castling and en passant
            captured: self.piece_on(to),
        });

        if let Some(ep) = self.ep_square {
            self.key ^= ZOBRIST.en_passant(ep);
        }
        self.key ^= ZOBRIST.castling(self.castling.raw());

        match m.kind() {
            MoveKind::EnPassant => {
                // the captured pawn stands behind the target square
                self.remove_piece(to.offset(-us.pawn_push()));
                self.rule50 = 0;
            }
            MoveKind::Castling => {
                let (rook_from, rook_to) = match to {
                    Square::G1 => (Square::H1, Square::F1),
                    Square::C1 => (Square::A1, Square::D1),
                    Square::G8 => (Square::H8, Square::F8),
                    Square::C8 => (Square::A8, Square::D8),
                    _ => unreachable!("bad castling destination"),
                };
                self.move_piece(rook_from, rook_to);
            }
            _ => {}
        }

        if self.piece_on(to).is_some() {
            self.remove_piece(to);
            self.rule50 = 0;
        } else if m.kind() != MoveKind::EnPassant {
            self.rule50 += 1;
        }

        self.move_piece(from, to);

        if m.kind() == MoveKind::Promotion {
            self.remove_piece(to);
            self.put_piece(Piece::new(us, m.promotion_type()), to);
        }

        let moved = self.piece_on(to);
        if moved.piece_type() == PieceType::King {
            self.king_square[us.index()] = to;
        }

        self.ep_square = None;
        if moved.piece_type() == PieceType::Pawn
            && (to.rank().index() as i8 - from.rank().index() as i8).abs() == 2
        {
            let ep = from.offset(us.pawn_push());
            self.ep_square = Some(ep);
            self.key ^= ZOBRIST.en_passant(ep);
        }

        self.castling = CastlingRights::new(
            self.castling.raw()
                & CASTLE_PERM[from.index() as usize]
                & CASTLE_PERM[to.index() as usize],
        );
        self.key ^= ZOBRIST.castling(self.castling.raw());

        self.side_to_move = us.opposite();
        self.key ^= ZOBRIST.side();
        self.game_ply += 1;

        if movegen::is_square_attacked(self, self.king_square(us), self.side_to_move) {
            self.unmake_move();
            return false;
        }
        true
    }

    /// Takes back the last move made with [`Board::make_move`].
    pub fn unmake_move(&mut self) {
        let st = self.history.pop().expect("unmake without a prior make");
        self.game_ply -= 1;
        self.side_to_move = self.side_to_move.opposite();

        let us = self.side_to_move;
        let from = st.mv.from();
        let to = st.mv.to();

        match st.mv.kind() {
            MoveKind::EnPassant => {
                self.put_piece(
                    Piece::new(us.opposite(), PieceType::Pawn),
                    to.offset(-us.pawn_push()),
                );
            }
            MoveKind::Castling => {
                let (rook_from, rook_to) = match to {
                    Square::G1 => (Square::F1, Square::H1),
                    Square::C1 => (Square::D1, Square::A1),
                    Square::G8 => (Square::F8, Square::H8),
                    Square::C8 => (Square::D8, Square::A8),
                    _ => unreachable!("bad castling destination"),
                };
                self.move_piece(rook_from, rook_to);
            }
            _ => {}
        }

        self.move_piece(to, from);

        if st.mv.kind() == MoveKind::Promotion {
            self.remove_piece(from);
            self.put_piece(Piece::new(us, PieceType::Pawn), from);
        }

        if st.captured.is_some() {
            self.put_piece(st.captured, to);
        }

        if self.piece_on(from).piece_type() == PieceType::King {
            self.king_square[us.index()] = from;
        }

        self.ep_square = st.ep_square;
        self.rule50 = st.rule50;
        self.castling = st.castling;
        // restored verbatim; no hash arithmetic on the way back
        self.key = st.key;
    }

    // --- piece primitives ---
    // These keep the piece array, the occupancy bitboards, the square lists
    // and the Zobrist key synchronized; everything above is built on them.

    fn put_piece(&mut self, piece: Piece, sq: Square) {
        debug_assert!(piece.is_some());
        debug_assert!(!self.piece_on(sq).is_some());

        self.pieces[sq.index() as usize] = piece;
        self.key ^= ZOBRIST.piece_square(piece, sq);
        self.by_color[piece.color().index()].set(sq);

        let p = piece.raw();
        self.piece_list[p][self.piece_count[p]] = sq;
        self.piece_count[p] += 1;
    }

    fn remove_piece(&mut self, sq: Square) {
        let piece = self.piece_on(sq);
        debug_assert!(piece.is_some());

        self.key ^= ZOBRIST.piece_square(piece, sq);
        self.pieces[sq.index() as usize] = Piece::NONE;
        self.by_color[piece.color().index()].clear(sq);

        let p = piece.raw();
        let count = self.piece_count[p];
        let idx = self.piece_list[p][..count]
            .iter()
            .position(|&s| s == sq)
            .expect("piece list out of sync");
        self.piece_count[p] -= 1;
        self.piece_list[p][idx] = self.piece_list[p][count - 1];
    }

    fn move_piece(&mut self, from: Square, to: Square) {
        let piece = self.piece_on(from);
        debug_assert!(piece.is_some());
        debug_assert!(!self.piece_on(to).is_some());

        self.key ^= ZOBRIST.piece_square(piece, from) ^ ZOBRIST.piece_square(piece, to);
        self.pieces[from.index() as usize] = Piece::NONE;
        self.pieces[to.index() as usize] = piece;
        let color = piece.color().index();
        self.by_color[color].clear(from);
        self.by_color[color].set(to);

        let p = piece.raw();
        let count = self.piece_count[p];
        let entry = self.piece_list[p][..count]
            .iter_mut()
            .find(|s| **s == from)
            .expect("piece list out of sync");
        *entry = to;
    }

    // --- reconstruction ---

    /// Rebuilds occupancy, square lists and king squares from the piece
    /// array.
    fn rebuild_lists(&mut self) {
        for index in 0..64u8 {
            let sq = unsafe { Square::from_index_unchecked(index) };
            let piece = self.piece_on(sq);
            if !piece.is_some() {
                continue;
            }

            self.by_color[piece.color().index()].set(sq);
            let p = piece.raw();
            self.piece_list[p][self.piece_count[p]] = sq;
            self.piece_count[p] += 1;

            if piece.piece_type() == PieceType::King {
                self.king_square[piece.color().index()] = sq;
            }
        }
    }

    /// Computes the position key from scratch. The incremental key must
    /// always equal this.
    fn compute_key(&self) -> u64 {
        let mut key = 0;
        for index in 0..64u8 {
            let sq = unsafe { Square::from_index_unchecked(index) };
            let piece = self.piece_on(sq);
            if piece.is_some() {
                key ^= ZOBRIST.piece_square(piece, sq);
            }
        }
        if self.side_to_move == Color::White {
            key ^= ZOBRIST.side();
        }
        if let Some(ep) = self.ep_square {
            key ^= ZOBRIST.en_passant(ep);
        }
        key ^ ZOBRIST.castling(self.castling.raw())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+---+---+---+---+---+---+---+---+")?;
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let sq = unsafe { Square::from_index_unchecked(rank * 8 + file) };
                write!(f, "| {} ", self.piece_on(sq).to_fen_char())?;
            }
            writeln!(f, "| {}", rank + 1)?;
            writeln!(f, "+---+---+---+---+---+---+---+---+")?;
        }
        writeln!(f, "  a   b   c   d   e   f   g   h")?;
        writeln!(
            f,
            "Side to move: {}",
            if self.side_to_move == Color::White {
                "w"
            } else {
                "b"
            }
        )?;
        match self.ep_square {
            Some(sq) => writeln!(f, "En passant square: {}", sq)?,
            None => writeln!(f, "En passant square: none")?,
        }
        writeln!(f, "Castling rights: {}", self.castling)?;
        write!(f, "Position key: {:016x}", self.key)
    }
}
