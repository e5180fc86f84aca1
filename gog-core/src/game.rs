//! Match session: setup, turn order and the end of the game.
//!
//! ```text
//! Setup ──start()──> PlayerTurn ──execute_move()──> OpponentTurn ──opponent_take_turn()──> PlayerTurn
//!                        │                              │
//!                        └──── combat ──> ChallengeResolution ──acknowledge_challenge()──┘
//!                                                       │
//!                                                       └──> Finished (flag captured / flag home / forfeit)
//! ```
//!
//! A [`Game`] owns the board, the pool of pieces still to place and the RNG
//! used for random setup and opponent moves. Nothing here is global: two
//! games never share state.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Direction, Occupant, Outcome, Pos};
use crate::error::{GameError, SetupError};
use crate::opponent::{self, OpponentMove};
use crate::piece::{
    Piece, Rank, Side, CHALLENGE_SYMBOL, HIDDEN_SYMBOL, OPPONENT_FLAG_SYMBOL, RANK_COUNT,
    STARTING_PIECES,
};

/// Why a match ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum EndReason {
    FlagCaptured,
    FlagHome,
    /// A flag reached the far row next to an enemy and survived the reply.
    ContestedArrival,
    Forfeit,
}

/// Where the match currently stands.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    PlayerTurn,
    /// Combat just happened. The destination cell shows a challenge marker
    /// until [`Game::acknowledge_challenge`] is called.
    ChallengeResolution { outcome: Outcome, mover: Side },
    OpponentTurn,
    Finished { winner: Side, reason: EndReason },
}

/// A cell as the human is allowed to see it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum PieceView {
    Empty,
    Known { rank: Rank, side: Side },
    Unknown,
    Challenge,
}

impl PieceView {
    fn of(occupant: Occupant) -> PieceView {
        match occupant {
            Occupant::Empty | Occupant::Wall => PieceView::Empty,
            Occupant::Challenge => PieceView::Challenge,
            Occupant::Piece(piece) if piece.is_hidden() => PieceView::Unknown,
            Occupant::Piece(piece) => PieceView::Known {
                rank: piece.rank(),
                side: piece.side(),
            },
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PieceView::Empty => "",
            PieceView::Known { rank: Rank::Flag, side: Side::Opponent } => OPPONENT_FLAG_SYMBOL,
            PieceView::Known { rank, .. } => rank.symbol(),
            PieceView::Unknown => HIDDEN_SYMBOL,
            PieceView::Challenge => CHALLENGE_SYMBOL,
        }
    }
}

/// One match against the automated opponent.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    /// Player pieces still to place, indexed by rank value.
    remaining: [u8; RANK_COUNT],
    phase: Phase,
    /// Side whose flag reached the far row next to an enemy and is waiting
    /// out the other side's reply.
    pending_arrival: Option<Side>,
    rng: StdRng,
}

impl Game {
    /// Start a new match in the setup phase, seeded from the OS.
    pub fn new() -> Game {
        Game::with_rng(StdRng::from_os_rng())
    }

    /// Start a new match in the setup phase with a fixed seed.
    pub fn with_seed(seed: u64) -> Game {
        Game::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Game {
        Game {
            board: Board::new(),
            remaining: STARTING_PIECES,
            phase: Phase::Setup,
            pending_arrival: None,
            rng,
        }
    }

    /// Resume from an arbitrary position with the human to move. Setup is
    /// considered done.
    pub fn from_board(mut board: Board, seed: u64) -> Game {
        board.seal_setup();
        Game {
            board,
            remaining: [0; RANK_COUNT],
            phase: Phase::PlayerTurn,
            pending_arrival: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    // ========== Accessors ==========

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            Phase::Finished { winner, .. } => Some(winner),
            _ => None,
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Finished { .. })
    }

    #[inline]
    pub fn pending_arrival(&self) -> Option<Side> {
        self.pending_arrival
    }

    /// Ranks the human still has to place, with counts.
    pub fn remaining(&self) -> Vec<(Rank, u8)> {
        Rank::all()
            .map(|rank| (rank, self.remaining[rank.value() as usize]))
            .filter(|&(_, count)| count > 0)
            .collect()
    }

    pub fn setup_complete(&self) -> bool {
        self.remaining.iter().all(|&count| count == 0)
    }

    fn expect_phase(&self, phase: Phase) -> Result<(), GameError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(GameError::WrongPhase)
        }
    }

    // ========== Setup ==========

    /// Place one of the human's remaining pieces on column `x`, row `y`.
    pub fn place_piece(&mut self, rank: Rank, x: u8, y: u8) -> Result<Pos, GameError> {
        self.expect_phase(Phase::Setup)?;
        if self.remaining[rank.value() as usize] == 0 {
            return Err(SetupError::NoneRemaining(rank).into());
        }
        let pos = Pos::from_coords(x as i16, y as i16).ok_or(SetupError::OutOfRange)?;
        if !Side::Player.home_rows().contains(&pos.row()) {
            return Err(SetupError::ForbiddenRow.into());
        }
        if !self.board.is_empty(pos) {
            return Err(SetupError::Occupied.into());
        }

        self.board.place(Piece::new(rank, Side::Player), pos);
        self.remaining[rank.value() as usize] -= 1;
        Ok(pos)
    }

    /// Take back the most recent placement and return the piece to the pool.
    pub fn undo_last_placement(&mut self) -> Result<Piece, GameError> {
        self.expect_phase(Phase::Setup)?;
        match self.board.last_placed() {
            Some(piece) if piece.side() == Side::Player => {}
            _ => return Err(SetupError::NothingToUndo.into()),
        }
        let piece = self.board.undo_place().ok_or(SetupError::NothingToUndo)?;
        self.remaining[piece.rank().value() as usize] += 1;
        Ok(piece)
    }

    /// Throw away whatever `side` has placed and lay out its full roster on
    /// random cells of its home rows.
    pub fn randomize(&mut self, side: Side) -> Result<(), GameError> {
        self.expect_phase(Phase::Setup)?;
        self.board.remove_side(side);

        let mut cells: Vec<Pos> = Pos::all()
            .filter(|pos| side.home_rows().contains(&pos.row()) && self.board.is_empty(*pos))
            .collect();
        cells.shuffle(&mut self.rng);

        let roster = Rank::all()
            .flat_map(|rank| std::iter::repeat(rank).take(rank.starting_count() as usize));
        for (rank, pos) in roster.zip(cells) {
            self.board.place(Piece::new(rank, side), pos);
        }
        if side == Side::Player {
            self.remaining = [0; RANK_COUNT];
        }
        Ok(())
    }

    /// Finish setup. The opponent gets a random layout unless one was
    /// already made with [`randomize`](Self::randomize).
    pub fn start(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::Setup)?;
        if !self.setup_complete() {
            return Err(SetupError::Incomplete.into());
        }
        if self.board.pieces(Side::Opponent).next().is_none() {
            self.randomize(Side::Opponent)?;
        }
        self.board.seal_setup();
        self.phase = Phase::PlayerTurn;
        Ok(())
    }

    // ========== Play ==========

    /// Move the human's piece on column `x`, row `y` one step in `dir`.
    pub fn execute_move(&mut self, x: u8, y: u8, dir: Direction) -> Result<Outcome, GameError> {
        self.expect_phase(Phase::PlayerTurn)?;
        let from = Pos::from_coords(x as i16, y as i16).ok_or(GameError::OutOfRange)?;
        if self.board.piece_at(from).map_or(false, |piece| piece.side() != Side::Player) {
            return Err(GameError::EnemyPiece);
        }
        let outcome = crate::moves::execute(&mut self.board, from, dir)?;
        self.after_move(outcome, Side::Player);
        Ok(outcome)
    }

    /// Let the opponent play its move.
    ///
    /// When the opponent cannot move at all the turn passes back to the
    /// human and [`GameError::NoMovablePiece`] is returned.
    pub fn opponent_take_turn(&mut self) -> Result<OpponentMove, GameError> {
        self.expect_phase(Phase::OpponentTurn)?;
        match opponent::take_turn(&mut self.board, Side::Opponent, &mut self.rng) {
            Some(mv) => {
                self.after_move(mv.outcome, Side::Opponent);
                Ok(mv)
            }
            None => {
                self.conclude(Outcome::MoveMade, Side::Opponent);
                Err(GameError::NoMovablePiece)
            }
        }
    }

    /// Clear the challenge marker and carry on with the match.
    pub fn acknowledge_challenge(&mut self) -> Result<(), GameError> {
        let Phase::ChallengeResolution { outcome, mover } = self.phase else {
            return Err(GameError::WrongPhase);
        };
        self.board.restore();
        self.conclude(outcome, mover);
        Ok(())
    }

    fn after_move(&mut self, outcome: Outcome, mover: Side) {
        if outcome.is_challenge() {
            self.board.challenge();
            self.phase = Phase::ChallengeResolution { outcome, mover };
        } else {
            self.conclude(outcome, mover);
        }
    }

    fn conclude(&mut self, outcome: Outcome, mover: Side) {
        match outcome {
            Outcome::FlagCaptured { winner } => return self.finish(winner, EndReason::FlagCaptured),
            Outcome::FlagHome { side } => return self.finish(side, EndReason::FlagHome),
            _ => {}
        }
        // Any reply that did not take the flag lets it through.
        if let Some(side) = self.pending_arrival.take() {
            if side != mover {
                return self.finish(side, EndReason::ContestedArrival);
            }
        }
        if let Outcome::FlagContested { side } = outcome {
            self.pending_arrival = Some(side);
        }
        self.phase = match mover {
            Side::Player => Phase::OpponentTurn,
            Side::Opponent => Phase::PlayerTurn,
        };
    }

    fn finish(&mut self, winner: Side, reason: EndReason) {
        self.board.restore();
        self.board.reveal_all();
        self.pending_arrival = None;
        self.phase = Phase::Finished { winner, reason };
    }

    /// Give up. The opponent wins and every piece is revealed.
    pub fn forfeit(&mut self) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::WrongPhase);
        }
        self.finish(Side::Opponent, EndReason::Forfeit);
        Ok(())
    }

    /// Discard the match and go back to an empty setup. The RNG carries on.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.remaining = STARTING_PIECES;
        self.phase = Phase::Setup;
        self.pending_arrival = None;
    }

    // ========== Views ==========

    /// What the human sees on column `x`, row `y`.
    pub fn query_piece(&self, x: u8, y: u8) -> Result<PieceView, GameError> {
        let pos = Pos::from_coords(x as i16, y as i16).ok_or(GameError::OutOfRange)?;
        Ok(PieceView::of(self.board.at(pos)))
    }

    /// The whole board as the human sees it, row-major from A1.
    pub fn view(&self) -> Vec<PieceView> {
        Pos::all().map(|pos| PieceView::of(self.board.at(pos))).collect()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
