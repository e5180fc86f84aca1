//! Plays one automated match through the `Game` API.
//!
//! The human seat is filled by the same heuristic the opponent uses, driven
//! by its own RNG so that a seed fully determines the match.

use gog_core::opponent;
use gog_core::{EndReason, Game, GameError, Phase, Side};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Mixed into the match seed for the scripted human's RNG.
const HUMAN_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// How a single match went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    pub seed: u64,
    /// `None` when the ply limit was hit first.
    pub winner: Option<Side>,
    pub reason: Option<EndReason>,
    /// Half-moves played by either side.
    pub plies: usize,
    /// Moves that ended in combat.
    pub challenges: usize,
    /// Opponent turns skipped for lack of a legal move.
    pub passes: usize,
}

/// Play a full match from random setup to the end, or until `max_plies`
/// half-moves have been made.
pub fn play_match(seed: u64, max_plies: usize, verbose: bool) -> Result<MatchReport, GameError> {
    let mut game = Game::with_seed(seed);
    let mut human = StdRng::seed_from_u64(seed ^ HUMAN_SEED_SALT);
    game.randomize(Side::Player)?;
    game.start()?;

    let mut report = MatchReport {
        seed,
        winner: None,
        reason: None,
        plies: 0,
        challenges: 0,
        passes: 0,
    };

    if verbose {
        println!("--- match seed={} ---", seed);
        print!("{}", game.board());
    }

    while report.plies < max_plies {
        match game.phase() {
            Phase::PlayerTurn => {
                let Some((from, dir)) = opponent::choose(game.board(), Side::Player, &mut human) else {
                    // Nothing left that can move: concede.
                    game.forfeit()?;
                    continue;
                };
                let outcome = game.execute_move(from.col(), from.row(), dir)?;
                report.plies += 1;
                if verbose {
                    println!("{:>4} P {} {:<5} {:?}", report.plies, from, dir, outcome);
                }
            }
            Phase::OpponentTurn => match game.opponent_take_turn() {
                Ok(mv) => {
                    report.plies += 1;
                    if verbose {
                        println!("{:>4} O {} {:<5} {:?}", report.plies, mv.from, mv.direction, mv.outcome);
                    }
                }
                Err(GameError::NoMovablePiece) => report.passes += 1,
                Err(e) => return Err(e),
            },
            Phase::ChallengeResolution { .. } => {
                report.challenges += 1;
                if verbose {
                    if let Some(fallen) = game.board().last_captured() {
                        println!("       eliminated: {:?} {}", fallen.side(), fallen.name());
                    }
                }
                game.acknowledge_challenge()?;
            }
            Phase::Finished { winner, reason } => {
                report.winner = Some(winner);
                report.reason = Some(reason);
                break;
            }
            Phase::Setup => return Err(GameError::WrongPhase),
        }
    }

    // A match that ends on the last allowed ply still counts.
    if let Phase::Finished { winner, reason } = game.phase() {
        report.winner = Some(winner);
        report.reason = Some(reason);
    }

    if verbose {
        print!("{}", game.board());
        match report.winner {
            Some(side) => println!("winner: {:?} ({:?}) after {} plies\n", side, report.reason, report.plies),
            None => println!("unfinished after {} plies\n", report.plies),
        }
    }

    Ok(report)
}
