//! FEN (Forsyth-Edwards Notation) reading.
//!
//! This module splits and validates the six FEN fields; the engine converts
//! the validated fields into its internal board representation.

use crate::Square;
use thiserror::Error;

/// Errors that can occur when reading a FEN string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 6 fields, got {0}")]
    FieldCount(usize),

    #[error("bad piece placement: {0}")]
    Placement(String),

    #[error("bad side to move: '{0}'")]
    SideToMove(String),

    #[error("bad castling field: '{0}'")]
    Castling(String),

    #[error("bad en passant square: '{0}'")]
    EnPassant(String),

    #[error("bad halfmove clock: '{0}'")]
    HalfmoveClock(String),

    #[error("bad fullmove number: '{0}'")]
    FullmoveNumber(String),
}

/// The six validated fields of a FEN record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Piece placement, ranks 8 down to 1, '/'-separated.
    pub placement: String,
    /// `true` when White is to move.
    pub white_to_move: bool,
    /// Castling availability, a subset of "KQkq", or "-".
    pub castling: String,
    /// En passant target square, if the field was not "-".
    pub en_passant: Option<Square>,
    /// Halfmove clock for the 50-move rule.
    pub halfmove_clock: u32,
    /// Fullmove number, starting at 1.
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Splits and validates a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        validate_placement(fields[0])?;

        let white_to_move = match fields[1] {
            "w" => true,
            "b" => false,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        let castling = fields[2];
        if castling != "-" && !castling.chars().all(|c| "KQkq".contains(c)) {
            return Err(FenError::Castling(castling.to_string()));
        }

        let en_passant = match fields[3] {
            "-" => None,
            s => {
                let sq = Square::from_algebraic(s)
                    .ok_or_else(|| FenError::EnPassant(s.to_string()))?;
                if !matches!(sq.rank(), crate::Rank::R3 | crate::Rank::R6) {
                    return Err(FenError::EnPassant(s.to_string()));
                }
                Some(sq)
            }
        };

        let halfmove_clock = fields[4]
            .parse()
            .map_err(|_| FenError::HalfmoveClock(fields[4].to_string()))?;

        let fullmove_number = fields[5]
            .parse()
            .map_err(|_| FenError::FullmoveNumber(fields[5].to_string()))?;

        Ok(Fen {
            placement: fields[0].to_string(),
            white_to_move,
            castling: castling.to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }
}

fn validate_placement(placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::Placement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    for (i, rank) in ranks.iter().enumerate() {
        let mut squares = 0u32;
        for c in rank.chars() {
            match c {
                '1'..='8' => squares += c.to_digit(10).unwrap(),
                c if crate::Piece::from_fen_char(c).is_some() => squares += 1,
                c => {
                    return Err(FenError::Placement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - i
                    )))
                }
            }
        }
        if squares != 8 {
            return Err(FenError::Placement(format!(
                "rank {} covers {} squares",
                8 - i,
                squares
            )));
        }
    }

    Ok(())
}
