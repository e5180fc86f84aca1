//! Directional move resolution.
//!
//! All four moves share one contract: check the source, the bounds and the
//! destination, and only then lift the piece and hand it to
//! [`Board::place`]. A rejected move never touches the board.

use crate::board::{Board, Direction, Occupant, Outcome, Pos};
use crate::error::MoveError;

/// Move the piece on `from` one step in `dir`.
pub fn execute(board: &mut Board, from: Pos, dir: Direction) -> Result<Outcome, MoveError> {
    if !from.is_valid() {
        return Err(MoveError::OutOfBounds);
    }
    let piece = board.piece_at(from).ok_or(MoveError::EmptyCell)?;
    let to = from.step(dir).ok_or(MoveError::OutOfBounds)?;
    if let Occupant::Piece(block) = board.at(to) {
        if block.side() == piece.side() {
            return Err(MoveError::FriendlyFire);
        }
    }

    board.clear(from);
    Ok(board.place(piece, to))
}

#[inline]
pub fn move_up(board: &mut Board, from: Pos) -> Result<Outcome, MoveError> {
    execute(board, from, Direction::Up)
}

#[inline]
pub fn move_down(board: &mut Board, from: Pos) -> Result<Outcome, MoveError> {
    execute(board, from, Direction::Down)
}

#[inline]
pub fn move_left(board: &mut Board, from: Pos) -> Result<Outcome, MoveError> {
    execute(board, from, Direction::Left)
}

#[inline]
pub fn move_right(board: &mut Board, from: Pos) -> Result<Outcome, MoveError> {
    execute(board, from, Direction::Right)
}
