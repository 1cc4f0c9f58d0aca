//! Core types for chess.
//!
//! This crate provides the fundamental types shared across the engine:
//! - [`Color`], [`PieceType`] and [`Piece`] for piece representation
//! - [`Square`], [`File`] and [`Rank`] for board coordinates
//! - [`Move`] for the 16-bit packed move encoding
//! - [`Fen`] for validated FEN reading

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{Fen, FenError};
pub use mov::{Move, MoveKind};
pub use piece::{Piece, PieceType};
pub use square::{File, Rank, Square};
