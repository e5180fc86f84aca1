//! Heuristic move selection for the automated side.
//!
//! Priority each turn:
//! 1. Flag rush - if nothing stands between the flag and the far row, step
//!    the flag forward.
//! 2. Aggression - if any piece has an enemy next to it, pick one such piece
//!    at random and attack in one of those directions.
//! 3. Wander - pick a random piece that can move and a random legal
//!    direction, with the forward direction counted twice.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Direction, Outcome, Pos};
use crate::moves;
use crate::piece::{Piece, Side};

/// Random picks tried before the turn is given up.
pub const MAX_OPPONENT_ATTEMPTS: usize = 64;

/// A move made by [`take_turn`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct OpponentMove {
    pub from: Pos,
    pub direction: Direction,
    pub outcome: Outcome,
}

/// Pick a move for `side` without touching the board.
///
/// Returns `None` when no piece of `side` can move.
pub fn choose<R: Rng + ?Sized>(board: &Board, side: Side, rng: &mut R) -> Option<(Pos, Direction)> {
    pick(board, side, rng, true)
}

/// The flag's next step when nothing stands between it and the far row.
fn flag_rush(board: &Board, side: Side) -> Option<(Pos, Direction)> {
    let flag = board.flag(side)?;
    let pos = flag.pos()?;
    pos.step(side.forward())?;
    board.clear_path_to_end(&flag).then_some((pos, side.forward()))
}

fn pick<R: Rng + ?Sized>(board: &Board, side: Side, rng: &mut R, rush: bool) -> Option<(Pos, Direction)> {
    if rush {
        if let Some(step) = flag_rush(board, side) {
            return Some(step);
        }
    }

    let pieces: Vec<Piece> = board.pieces(side).collect();

    let challengers: Vec<(Piece, Vec<Direction>)> = pieces
        .iter()
        .map(|piece| (*piece, board.can_be_challenged(piece)))
        .filter(|(_, dirs)| !dirs.is_empty())
        .collect();
    if let Some((piece, dirs)) = challengers.choose(rng) {
        let dir = *dirs.choose(rng)?;
        return Some((piece.pos()?, dir));
    }

    let movable: Vec<(Piece, Vec<Direction>)> = pieces
        .iter()
        .filter(|piece| !board.is_surrounded(piece))
        .map(|piece| (*piece, board.legal_directions(piece)))
        .filter(|(_, dirs)| !dirs.is_empty())
        .collect();
    let (piece, dirs) = movable.choose(rng)?;
    let mut dirs = dirs.clone();
    if dirs.contains(&side.forward()) {
        dirs.push(side.forward());
    }
    let dir = *dirs.choose(rng)?;
    Some((piece.pos()?, dir))
}

/// Choose and play a move for `side`, re-rolling if a pick turns out to be
/// illegal. Returns `None` if no legal move was found.
///
/// The flag rush is only tried first: it is deterministic, so repeating it
/// after a rejection would give the same answer.
pub fn take_turn<R: Rng + ?Sized>(board: &mut Board, side: Side, rng: &mut R) -> Option<OpponentMove> {
    for attempt in 0..MAX_OPPONENT_ATTEMPTS {
        let (from, direction) = pick(board, side, rng, attempt == 0)?;
        if board.piece_at(from).map_or(true, |piece| piece.side() != side) {
            continue;
        }
        if let Ok(outcome) = moves::execute(board, from, direction) {
            return Some(OpponentMove { from, direction, outcome });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Rank;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pos(s: &str) -> Pos {
        s.parse().unwrap()
    }

    fn board(pieces: &[(Rank, Side, &str)]) -> Board {
        pieces.iter().map(|&(rank, side, at)| (rank, side, pos(at))).collect()
    }

    #[test]
    fn test_flag_rush_overrides() {
        let b = board(&[
            (Rank::Flag, Side::Opponent, "D3"),
            (Rank::Private, Side::Player, "E3"),
            (Rank::Spy, Side::Opponent, "E4"),
        ]);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(choose(&b, Side::Opponent, &mut rng), Some((pos("D3"), Direction::Down)));
        }
    }

    #[test]
    fn test_blocked_flag_does_not_rush() {
        let b = board(&[
            (Rank::Flag, Side::Opponent, "D3"),
            (Rank::Private, Side::Player, "D1"),
        ]);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..20 {
            let (from, _) = choose(&b, Side::Opponent, &mut rng).unwrap();
            assert_eq!(from, pos("D3"));
        }
    }

    #[test]
    fn test_prefers_challenges() {
        let b = board(&[
            (Rank::Flag, Side::Opponent, "A8"),
            (Rank::Private, Side::Opponent, "A7"),
            (Rank::Major, Side::Opponent, "E5"),
            (Rank::Spy, Side::Opponent, "H7"),
            (Rank::Sergeant, Side::Player, "E4"),
        ]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(choose(&b, Side::Opponent, &mut rng), Some((pos("E5"), Direction::Down)));
        }
    }

    #[test]
    fn test_wander_uses_legal_directions() {
        let b = board(&[
            (Rank::Flag, Side::Opponent, "A8"),
            (Rank::Private, Side::Opponent, "A7"),
            (Rank::Private, Side::Opponent, "B8"),
            (Rank::Private, Side::Player, "A1"),
        ]);
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            let (from, dir) = choose(&b, Side::Opponent, &mut rng).unwrap();
            assert_ne!(from, pos("A8"), "the flag is boxed in");
            let piece = b.piece_at(from).unwrap();
            assert!(b.legal_directions(&piece).contains(&dir));
        }
    }

    #[test]
    fn test_forward_is_favoured() {
        let b = board(&[
            (Rank::Flag, Side::Opponent, "A8"),
            (Rank::Private, Side::Opponent, "A7"),
            (Rank::Private, Side::Player, "A1"),
            (Rank::Major, Side::Opponent, "E6"),
        ]);
        let mut rng = StdRng::seed_from_u64(5);
        let mut down = 0;
        let mut total = 0;
        for _ in 0..2000 {
            let (from, dir) = choose(&b, Side::Opponent, &mut rng).unwrap();
            if from == pos("E6") {
                total += 1;
                if dir == Direction::Down {
                    down += 1;
                }
            }
        }
        // 2 of 5 weighted options point down.
        let share = down as f64 / total as f64;
        assert!(share > 0.3 && share < 0.5, "share = {share}");
    }

    #[test]
    fn test_no_movable_piece() {
        let mut b = board(&[(Rank::Private, Side::Player, "A1")]);
        let mut rng = StdRng::seed_from_u64(6);
        let before = b.clone();
        assert_eq!(choose(&b, Side::Opponent, &mut rng), None);
        assert_eq!(take_turn(&mut b, Side::Opponent, &mut rng), None);
        assert_eq!(b, before);
    }

    #[test]
    fn test_flag_on_far_row_does_not_rush() {
        let mut b = board(&[
            (Rank::Flag, Side::Opponent, "D1"),
            (Rank::General, Side::Opponent, "H6"),
            (Rank::Private, Side::Player, "A3"),
        ]);
        let flag = b.opponent_flag().unwrap();
        assert_eq!(flag_rush(&b, Side::Opponent), None);
        assert!(b.clear_path_to_end(&flag));

        let mut rng = StdRng::seed_from_u64(9);
        let mv = take_turn(&mut b, Side::Opponent, &mut rng).unwrap();
        assert!(mv.from == pos("H6") || mv.from == pos("D1"));
        assert_ne!((mv.from, mv.direction), (pos("D1"), Direction::Down));
    }

    #[test]
    fn test_retry_skips_flag_rush() {
        // With the rush disabled the flag is just one more wandering piece,
        // so the General gets picked on some re-rolls.
        let b = board(&[
            (Rank::Flag, Side::Opponent, "D3"),
            (Rank::General, Side::Opponent, "H6"),
            (Rank::Private, Side::Player, "A8"),
        ]);
        let mut rng = StdRng::seed_from_u64(10);
        assert_eq!(pick(&b, Side::Opponent, &mut rng, true), Some((pos("D3"), Direction::Down)));
        let froms: Vec<Pos> = (0..50)
            .filter_map(|_| pick(&b, Side::Opponent, &mut rng, false))
            .map(|(from, _)| from)
            .collect();
        assert_eq!(froms.len(), 50);
        assert!(froms.contains(&pos("H6")));
    }

    #[test]
    fn test_take_turn_executes() {
        let mut b = board(&[
            (Rank::Flag, Side::Opponent, "A8"),
            (Rank::Private, Side::Opponent, "A7"),
            (Rank::General, Side::Opponent, "E5"),
            (Rank::Sergeant, Side::Player, "E4"),
        ]);
        let mut rng = StdRng::seed_from_u64(7);
        let mv = take_turn(&mut b, Side::Opponent, &mut rng).unwrap();
        assert_eq!(mv.from, pos("E5"));
        assert_eq!(mv.direction, Direction::Down);
        assert_eq!(mv.outcome, Outcome::PlayerEliminated);
        assert_eq!(b.piece_at(pos("E4")).unwrap().rank(), Rank::General);
    }

    #[test]
    fn test_player_side_strategy() {
        let mut b = board(&[
            (Rank::Flag, Side::Player, "C6"),
            (Rank::Private, Side::Opponent, "A8"),
        ]);
        let mut rng = StdRng::seed_from_u64(8);
        let mv = take_turn(&mut b, Side::Player, &mut rng).unwrap();
        assert_eq!(mv.direction, Direction::Up);
        assert_eq!(mv.outcome, Outcome::MoveMade);
        let mv = take_turn(&mut b, Side::Player, &mut rng).unwrap();
        assert_eq!(mv.outcome, Outcome::FlagHome { side: Side::Player });
    }
}
