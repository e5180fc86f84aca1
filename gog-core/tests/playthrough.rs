//! Whole matches driven through the public `Game` API.
//!
//! The human side is played by the same heuristic as the opponent, fed from
//! a separate seeded RNG, so every match here is reproducible.

use gog_core::opponent;
use gog_core::{Direction, Game, GameError, Outcome, Phase, Pos, Rank, Side, STARTING_PIECES};
use rand::rngs::StdRng;
use rand::SeedableRng;

const MAX_PLIES: usize = 2_000;

/// One entry per half-move: who moved, from where, which way, and what happened.
type Log = Vec<(Side, Pos, Direction, Outcome)>;

fn total_pieces() -> usize {
    STARTING_PIECES.iter().map(|&n| n as usize).sum::<usize>() * 2
}

fn play(seed: u64) -> (Game, Log) {
    let mut game = Game::with_seed(seed);
    let mut human = StdRng::seed_from_u64(seed ^ 0x5eed);
    game.randomize(Side::Player).unwrap();
    game.start().unwrap();

    let mut log = Log::new();
    for _ in 0..MAX_PLIES {
        match game.phase() {
            Phase::PlayerTurn => match opponent::choose(game.board(), Side::Player, &mut human) {
                Some((from, dir)) => {
                    let outcome = game
                        .execute_move(from.col(), from.row(), dir)
                        .expect("heuristic picks are always legal");
                    log.push((Side::Player, from, dir, outcome));
                }
                None => game.forfeit().unwrap(),
            },
            Phase::OpponentTurn => match game.opponent_take_turn() {
                Ok(mv) => log.push((Side::Opponent, mv.from, mv.direction, mv.outcome)),
                Err(err) => assert_eq!(err, GameError::NoMovablePiece),
            },
            Phase::ChallengeResolution { .. } => game.acknowledge_challenge().unwrap(),
            Phase::Finished { .. } => break,
            Phase::Setup => unreachable!("setup is over"),
        }

        // The survivor of a staged challenge is hidden behind the marker.
        if !matches!(game.phase(), Phase::ChallengeResolution { .. }) {
            let board = game.board();
            let on_board = board.pieces(Side::Player).count() + board.pieces(Side::Opponent).count();
            assert_eq!(on_board + board.captured().len(), total_pieces(), "seed {seed}: pieces lost");
        }
    }
    (game, log)
}

#[test]
fn test_seeded_matches_hold_invariants() {
    let mut finished = 0;
    for seed in 0..20 {
        let (game, log) = play(seed);
        assert!(!log.is_empty());
        if game.is_over() {
            finished += 1;
        }
    }
    println!("{finished}/20 matches finished within {MAX_PLIES} plies");
}

#[test]
fn test_same_seed_same_match() {
    let (a, log_a) = play(99);
    let (b, log_b) = play(99);
    assert_eq!(log_a, log_b);
    assert_eq!(a.board(), b.board());
    assert_eq!(a.phase(), b.phase());
}

#[test]
fn test_finished_match_reveals_everything() {
    for seed in 0..10 {
        let (mut game, _) = play(seed);
        if !game.is_over() {
            game.forfeit().unwrap();
        }
        let board = game.board();
        assert!(!board.is_challenge_staged());
        assert!(board.pieces(Side::Opponent).all(|p| !p.is_hidden()));
        assert!(board.captured().iter().all(|p| !p.is_hidden()));
        assert!(game.winner().is_some());
    }
}

#[test]
fn test_manual_setup() {
    let mut game = Game::with_seed(11);
    let mut free = (0..3u8).flat_map(|y| (0..9u8).map(move |x| (x, y)));

    // Place everything except one Private.
    let mut pool: Vec<Rank> = game
        .remaining()
        .iter()
        .flat_map(|&(rank, n)| std::iter::repeat(rank).take(n as usize))
        .collect();
    let private = pool.iter().position(|&rank| rank == Rank::Private).unwrap();
    pool.remove(private);
    for rank in pool {
        let (x, y) = free.next().unwrap();
        game.place_piece(rank, x, y).unwrap();
    }
    assert_eq!(game.remaining(), vec![(Rank::Private, 1)]);
    assert_eq!(game.start(), Err(gog_core::SetupError::Incomplete.into()));

    let (x, y) = free.next().unwrap();
    game.place_piece(Rank::Private, x, y).unwrap();
    assert!(game.setup_complete());

    let undone = game.undo_last_placement().unwrap();
    assert_eq!(undone.rank(), Rank::Private);
    assert_eq!(game.remaining(), vec![(Rank::Private, 1)]);
    game.place_piece(Rank::Private, x, y).unwrap();

    game.start().unwrap();
    assert_eq!(game.phase(), Phase::PlayerTurn);
    assert_eq!(game.board().pieces(Side::Player).count(), 21);
    assert_eq!(game.board().pieces(Side::Opponent).count(), 21);
    assert_eq!(game.undo_last_placement(), Err(GameError::WrongPhase));
}

#[test]
fn test_randomize_discards_manual_placement() {
    let mut game = Game::with_seed(12);
    game.place_piece(Rank::Flag, 4, 0).unwrap();
    game.place_piece(Rank::General, 4, 1).unwrap();
    game.randomize(Side::Player).unwrap();

    let flags: Vec<_> = game.board().pieces(Side::Player).filter(|p| p.is_flag()).collect();
    assert_eq!(flags.len(), 1);
    assert_eq!(game.board().pieces(Side::Player).count(), 21);
    assert!(game.setup_complete());
}
