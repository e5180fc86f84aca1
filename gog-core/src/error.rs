//! Error types.
//!
//! Nothing here is fatal: every error is reported back to the caller and
//! leaves the board exactly as it was before the rejected call.

use thiserror::Error;

use crate::piece::Rank;

/// A directional move was rejected before touching the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("empty cell selected")]
    EmptyCell,
    #[error("out-of-bounds move")]
    OutOfBounds,
    #[error("move blocked by a friendly piece")]
    FriendlyFire,
}

/// A setup action was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("position is off the board")]
    OutOfRange,
    #[error("pieces may only be placed on your first three rows")]
    ForbiddenRow,
    #[error("position already occupied")]
    Occupied,
    #[error("all pieces of {0} have already been placed")]
    NoneRemaining(Rank),
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("not all pieces have been placed")]
    Incomplete,
}

/// Errors surfaced by [`Game`](crate::Game).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error("action not available in the current phase")]
    WrongPhase,
    #[error("position is off the board")]
    OutOfRange,
    #[error("enemy piece selected")]
    EnemyPiece,
    #[error("no piece can move")]
    NoMovablePiece,
}

/// Text that could not be understood as a rank, position or direction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no such piece '{0}' exists")]
    UnknownRank(String),
    #[error("invalid position '{0}'")]
    InvalidPosition(String),
    #[error("invalid operation '{0}'")]
    UnknownDirection(String),
}
