//! Error types for position setup and move application.

use thiserror::Error;

/// Reasons a FEN string is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected at least 4 fields, found {0}")]
    MissingFields(usize),

    #[error("board section must have 8 ranks, found {0}")]
    RankCount(usize),

    #[error("rank {rank} does not describe exactly 8 files")]
    RankWidth { rank: u8 },

    #[error("invalid piece character '{0}'")]
    InvalidPiece(char),

    #[error("invalid side to move '{0}'")]
    InvalidSideToMove(String),

    #[error("invalid castling field '{0}'")]
    InvalidCastling(String),

    #[error("invalid en-passant field '{0}'")]
    InvalidEnPassant(String),

    #[error("invalid move counter '{0}'")]
    InvalidCounter(String),

    #[error("{0:?} must have exactly one king")]
    KingCount(crate::Color),

    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(String),

    #[error("side not to move is in check")]
    OpponentInCheck,
}

/// Reasons `GameState::apply_move` refuses an intent. State is untouched in
/// every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("{0} is not a legal move in this position")]
    Illegal(String),

    #[error("cannot promote to {0:?}")]
    InvalidPromotion(crate::PieceKind),

    #[error("the game is over")]
    GameOver,
}

/// A UCI move token that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed move token '{0}'")]
pub struct ParseMoveError(pub String);
