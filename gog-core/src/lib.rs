//! Game of the Generals engine.
//!
//! Two armies of 21 pieces face off on a 9×8 board. Each side only knows
//! the ranks of its own pieces; when two pieces meet, [`resolve`] decides
//! who survives. A side wins by capturing the enemy flag, or by walking its
//! own flag onto the enemy back row and surviving there for one reply.
//!
//! # Board
//!
//! ```text
//!     A  B  C  D  E  F  G  H  I
//!  8 |  opponent home rows       |  <- player flag wins here
//!  7 |                           |
//!  6 |                           |
//!  5 |                           |
//!  4 |                           |
//!  3 |  player home rows         |
//!  2 |                           |
//!  1 |                           |  <- opponent flag wins here
//! ```
//!
//! # Layers
//!
//! - [`piece`]: ranks, sides and the combat rule.
//! - [`board`]: the grid, capture record, challenge staging and geometry
//!   queries.
//! - [`moves`]: validated one-step moves.
//! - [`opponent`]: the heuristic automated player.
//! - [`game`]: the session object that ties it together for a front end.
//!
//! ```
//! use gog_core::{Direction, Game, Phase, Side};
//!
//! let mut game = Game::with_seed(7);
//! game.randomize(Side::Player).unwrap();
//! game.start().unwrap();
//! assert_eq!(game.phase(), Phase::PlayerTurn);
//!
//! // Any piece on the front row can step forward.
//! let front = game.board().pieces(Side::Player).find(|p| p.pos().unwrap().row() == 2).unwrap();
//! let at = front.pos().unwrap();
//! game.execute_move(at.col(), at.row(), Direction::Up).unwrap();
//! assert_eq!(game.phase(), Phase::OpponentTurn);
//! ```

pub mod board;
pub mod error;
pub mod game;
pub mod moves;
pub mod opponent;
pub mod piece;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use board::{Board, Direction, Occupant, Outcome, Pos, BOARD_HEIGHT, BOARD_WIDTH, HOME_ROWS};
pub use error::{GameError, MoveError, ParseError, SetupError};
pub use game::{EndReason, Game, Phase, PieceView};
pub use opponent::OpponentMove;
pub use piece::{resolve, Combat, Piece, Rank, Side, STARTING_PIECES};
