//! Errors used throughout the chess engine.
//!
//! `ChessErrors` is the single error type returned by the rules engine, the
//! search, the notation utilities and the game facade. Every variant describes
//! a recoverable condition: a rejected operation leaves the board exactly as it
//! was, and the caller decides whether to retry (for example re-prompting for a
//! promotion piece).

use std::error::Error;
use std::fmt;

use crate::game_state::chess_types::PieceKind;

/// Unified error type for the chess engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChessErrors {
    /// The move is not among the legal moves of its origin square, or the game
    /// has already ended.
    ///
    /// Payload: human-readable reason.
    IllegalMove(String),

    /// A promoting move was submitted without a choice, or with a piece type
    /// outside {queen, rook, bishop, knight}.
    InvalidPromotionChoice(Option<PieceKind>),

    /// Square coordinates fell outside the 8x8 grid.
    ///
    /// Payload: (row, col) as requested.
    OutOfBounds(i16, i16),

    /// A deferred promotion is waiting for its piece choice.
    PromotionPending,

    /// A background search currently owns the board.
    SearchInProgress,

    /// The side asked to move has no legal moves.
    NoLegalMoves,

    /// Undo was requested with an empty move history.
    NothingToUndo,

    /// FEN string could not be parsed or describes an impossible position.
    InvalidFen(String),

    /// Square or coordinate-move text could not be parsed.
    InvalidAlgebraic(String),

    /// PGN text could not be parsed or replayed.
    InvalidPgn(String),

    /// Unknown configuration option or value.
    InvalidConfig(String),

    /// The background search thread panicked before returning a move.
    SearchWorkerPanicked,
}

impl fmt::Display for ChessErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChessErrors::IllegalMove(reason) => write!(f, "illegal move: {reason}"),
            ChessErrors::InvalidPromotionChoice(Some(kind)) => {
                write!(f, "cannot promote to {kind:?}")
            }
            ChessErrors::InvalidPromotionChoice(None) => {
                write!(f, "promotion requires a choice of queen, rook, bishop or knight")
            }
            ChessErrors::OutOfBounds(row, col) => {
                write!(f, "square ({row},{col}) is outside the board")
            }
            ChessErrors::PromotionPending => write!(f, "a promotion choice is still pending"),
            ChessErrors::SearchInProgress => write!(f, "a search is in progress"),
            ChessErrors::NoLegalMoves => write!(f, "no legal moves available"),
            ChessErrors::NothingToUndo => write!(f, "no moves to undo"),
            ChessErrors::InvalidFen(msg) => write!(f, "invalid FEN: {msg}"),
            ChessErrors::InvalidAlgebraic(msg) => write!(f, "invalid algebraic notation: {msg}"),
            ChessErrors::InvalidPgn(msg) => write!(f, "invalid PGN: {msg}"),
            ChessErrors::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            ChessErrors::SearchWorkerPanicked => write!(f, "search worker thread panicked"),
        }
    }
}

impl Error for ChessErrors {}
