//! Board representation and combat staging.
//!
//! # Layout
//!
//! ```text
//!   row 7  | opponent back row (the player's flag wins here)
//!   row 6  | opponent home
//!   row 5  | opponent home
//!   row 4  |
//!   row 3  |
//!   row 2  | player home
//!   row 1  | player home
//!   row 0  | player back row (the opponent's flag wins here)
//!            A B C D E F G H I   (columns 0-8)
//! ```
//!
//! Cells are stored row-major: `index = row * BOARD_WIDTH + col`.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::piece::{resolve, Combat, Piece, Rank, Side};

/// Number of columns (A-I).
pub const BOARD_WIDTH: u8 = 9;
/// Number of rows (1-8).
pub const BOARD_HEIGHT: u8 = 8;
/// Rows each side may use during setup.
pub const HOME_ROWS: u8 = 3;
/// Total number of cells.
pub const CELL_COUNT: usize = BOARD_WIDTH as usize * BOARD_HEIGHT as usize;

/// A cell on the board (0-71).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Pos(pub u8);

impl Pos {
    /// Create a position from column and row (0-indexed).
    #[inline]
    pub fn new(col: u8, row: u8) -> Pos {
        debug_assert!(col < BOARD_WIDTH && row < BOARD_HEIGHT);
        Pos(row * BOARD_WIDTH + col)
    }

    /// Create a position from signed coordinates, `None` if off the board.
    #[inline]
    pub fn from_coords(x: i16, y: i16) -> Option<Pos> {
        let on_board = (0..BOARD_WIDTH as i16).contains(&x) && (0..BOARD_HEIGHT as i16).contains(&y);
        on_board.then(|| Pos::new(x as u8, y as u8))
    }

    #[inline]
    pub fn col(self) -> u8 {
        self.0 % BOARD_WIDTH
    }

    #[inline]
    pub fn row(self) -> u8 {
        self.0 / BOARD_WIDTH
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        (self.0 as usize) < CELL_COUNT
    }

    /// The neighbouring cell in `dir`, or `None` at the edge.
    #[inline]
    pub fn step(self, dir: Direction) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        Pos::from_coords(self.col() as i16 + dx as i16, self.row() as i16 + dy as i16)
    }

    /// Iterate over all 72 positions.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..CELL_COUNT as u8).map(Pos)
    }
}

impl fmt::Display for Pos {
    /// Human notation: column letter then 1-based row, e.g. "C4".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.col()) as char, self.row() + 1)
    }
}

impl FromStr for Pos {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Pos, ParseError> {
        let invalid = || ParseError::InvalidPosition(s.to_string());
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let col = bytes[0].to_ascii_uppercase().wrapping_sub(b'A');
        let row = bytes[1].wrapping_sub(b'1');
        if col >= BOARD_WIDTH || row >= BOARD_HEIGHT {
            return Err(invalid());
        }
        Ok(Pos::new(col, row))
    }
}

/// One of the four orthogonal moves.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards row 8 (the opponent's side).
    Up,
    /// Towards row 1 (the player's side).
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Column and row offset of one step.
    #[inline]
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Direction, ParseError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(ParseError::UnknownDirection(s.to_string())),
        }
    }
}

/// What a cell query returns.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Occupant {
    Empty,
    Piece(Piece),
    /// Placeholder shown while a combat outcome is being revealed.
    Challenge,
    /// Synthetic occupant of every off-board coordinate. Hostile to both sides.
    Wall,
}

impl Occupant {
    #[inline]
    pub fn piece(&self) -> Option<&Piece> {
        match self {
            Occupant::Piece(piece) => Some(piece),
            _ => None,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Occupant::Empty)
    }

    /// Whether this occupant counts as an enemy of `side`. Walls always do.
    #[inline]
    pub fn is_hostile_to(&self, side: Side) -> bool {
        match self {
            Occupant::Wall => true,
            Occupant::Piece(piece) => piece.side() != side,
            Occupant::Empty | Occupant::Challenge => false,
        }
    }
}

/// Result of placing a piece on a cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Plain move onto an empty cell.
    MoveMade,
    /// An opponent piece was eliminated by combat.
    OpponentEliminated,
    /// A player piece was eliminated by combat.
    PlayerEliminated,
    /// Equal ranks: both pieces were eliminated.
    Split,
    /// A flag fell in combat; `winner` took it.
    FlagCaptured { winner: Side },
    /// `side`'s flag reached the far row with no enemy able to contest it.
    FlagHome { side: Side },
    /// `side`'s flag reached the far row next to an enemy piece.
    FlagContested { side: Side },
}

impl Outcome {
    /// The outcome when a piece of `side` is the one that fell.
    #[inline]
    fn eliminated(side: Side) -> Outcome {
        match side {
            Side::Player => Outcome::PlayerEliminated,
            Side::Opponent => Outcome::OpponentEliminated,
        }
    }

    /// Whether combat took place, so the outcome should be staged with
    /// [`Board::challenge`] before it is shown.
    #[inline]
    pub fn is_challenge(self) -> bool {
        matches!(
            self,
            Outcome::OpponentEliminated
                | Outcome::PlayerEliminated
                | Outcome::Split
                | Outcome::FlagCaptured { .. }
        )
    }

    /// The side that has won the match outright, if any.
    #[inline]
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::FlagCaptured { winner } => Some(winner),
            Outcome::FlagHome { side } => Some(side),
            _ => None,
        }
    }
}

/// The 9×8 grid plus the bookkeeping that goes with it.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Board {
    cells: [Occupant; CELL_COUNT],
    /// Destinations passed to `place`, oldest first. Once setup is sealed
    /// only the latest one is kept.
    placements: Vec<Pos>,
    setup_sealed: bool,
    /// Every piece lost in combat, oldest first.
    captured: Vec<Piece>,
    last_captured: Option<Piece>,
    opponent_flag: Option<Pos>,
    /// Cell and its real occupant while a challenge marker is showing.
    staged: Option<(Pos, Occupant)>,
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Board {
        Board {
            cells: [Occupant::Empty; CELL_COUNT],
            placements: Vec::new(),
            setup_sealed: false,
            captured: Vec::new(),
            last_captured: None,
            opponent_flag: None,
            staged: None,
        }
    }

    // ========== Queries ==========

    /// Occupant at column `x`, row `y`. Off-board coordinates yield
    /// [`Occupant::Wall`].
    #[inline]
    pub fn get_at(&self, x: i16, y: i16) -> Occupant {
        match Pos::from_coords(x, y) {
            Some(pos) => self.cells[pos.index()],
            None => Occupant::Wall,
        }
    }

    #[inline]
    pub fn at(&self, pos: Pos) -> Occupant {
        self.cells.get(pos.index()).copied().unwrap_or(Occupant::Wall)
    }

    #[inline]
    pub fn piece_at(&self, pos: Pos) -> Option<Piece> {
        self.at(pos).piece().copied()
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.at(pos).is_empty()
    }

    /// All pieces of `side` still on the board, in cell order.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = Piece> + '_ {
        self.cells
            .iter()
            .filter_map(|cell| cell.piece().copied())
            .filter(move |piece| piece.side() == side)
    }

    /// The flag of `side`, if still on the board.
    pub fn flag(&self, side: Side) -> Option<Piece> {
        match side {
            Side::Opponent => self.opponent_flag(),
            Side::Player => self.pieces(side).find(|piece| piece.is_flag()),
        }
    }

    /// The opponent's flag, tracked from the moment it is placed.
    #[inline]
    pub fn opponent_flag(&self) -> Option<Piece> {
        self.opponent_flag.and_then(|pos| self.piece_at(pos))
    }

    /// Most recently eliminated piece. After a split this is the
    /// opponent's piece.
    #[inline]
    pub fn last_captured(&self) -> Option<Piece> {
        self.last_captured
    }

    /// Every piece eliminated so far, oldest first.
    #[inline]
    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    /// The piece sitting on the most recent placement, if it is still there.
    pub fn last_placed(&self) -> Option<Piece> {
        self.placements.last().and_then(|&pos| self.piece_at(pos))
    }

    /// Hash of the full board state, for cheap before/after comparisons.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    // ========== Placement & Combat ==========

    /// Put `piece` on `pos`, resolving combat if the cell is occupied.
    ///
    /// The moving piece is the attacker. Losers go to the capture record and
    /// leave the grid; the survivor (if any) ends up on `pos`. When a flag
    /// makes a plain move onto its far row the result is either
    /// [`Outcome::FlagHome`] or [`Outcome::FlagContested`], depending on
    /// whether an adjacent enemy could attack it.
    ///
    /// Does NOT validate bounds or friendly fire - see [`crate::moves`].
    pub fn place(&mut self, mut piece: Piece, pos: Pos) -> Outcome {
        let mut outcome = Outcome::MoveMade;
        piece.set_pos(Some(pos));

        let survivor = match self.at(pos) {
            Occupant::Piece(defender) => {
                let attacker_side = piece.side();
                let survivor = match resolve(piece.rank(), defender.rank()) {
                    Combat::AttackerSurvives => {
                        self.record_capture(defender);
                        outcome = Outcome::eliminated(defender.side());
                        Some(piece)
                    }
                    Combat::DefenderSurvives => {
                        self.record_capture(piece);
                        outcome = Outcome::eliminated(attacker_side);
                        Some(defender)
                    }
                    Combat::BothEliminated => {
                        // The opponent's piece is recorded last so it becomes
                        // `last_captured`.
                        if attacker_side == Side::Opponent {
                            self.record_capture(defender);
                            self.record_capture(piece);
                        } else {
                            self.record_capture(piece);
                            self.record_capture(defender);
                        }
                        outcome = Outcome::Split;
                        None
                    }
                };

                let survived = |p: &Piece| survivor.map_or(false, |s| s.side() == p.side());
                if defender.is_flag() && !survived(&defender) {
                    outcome = Outcome::FlagCaptured { winner: attacker_side };
                } else if piece.is_flag() && !survived(&piece) {
                    outcome = Outcome::FlagCaptured { winner: defender.side() };
                }
                survivor
            }
            Occupant::Empty | Occupant::Challenge | Occupant::Wall => Some(piece),
        };

        self.cells[pos.index()] = match survivor {
            Some(survivor) => {
                if survivor.is_flag() && survivor.side() == Side::Opponent {
                    self.opponent_flag = Some(pos);
                }
                Occupant::Piece(survivor)
            }
            None => Occupant::Empty,
        };
        if self.setup_sealed {
            self.placements.clear();
        }
        self.placements.push(pos);

        if outcome == Outcome::MoveMade && piece.is_flag() && pos.row() == piece.side().far_row() {
            let side = piece.side();
            outcome = if self.can_be_challenged(&piece).is_empty() {
                Outcome::FlagHome { side }
            } else {
                Outcome::FlagContested { side }
            };
        }

        outcome
    }

    /// Empty a cell, returning what was there.
    pub fn clear(&mut self, pos: Pos) -> Occupant {
        let previous = std::mem::replace(&mut self.cells[pos.index()], Occupant::Empty);
        if self.opponent_flag == Some(pos) {
            self.opponent_flag = None;
        }
        previous
    }

    /// Stop keeping the placement history once play begins. Only the
    /// latest destination is remembered afterwards, for `challenge`.
    pub(crate) fn seal_setup(&mut self) {
        self.setup_sealed = true;
        let last = self.placements.last().copied();
        self.placements.clear();
        self.placements.extend(last);
    }

    #[cfg(test)]
    pub(crate) fn placement_count(&self) -> usize {
        self.placements.len()
    }

    fn record_capture(&mut self, mut piece: Piece) {
        if piece.is_flag() && piece.side() == Side::Opponent {
            self.opponent_flag = None;
        }
        piece.set_pos(None);
        piece.reveal();
        self.captured.push(piece);
        self.last_captured = Some(piece);
    }

    /// Take back the most recent placement and return the piece.
    /// Returns `None` when there is nothing to undo.
    pub fn undo_place(&mut self) -> Option<Piece> {
        let pos = self.placements.pop()?;
        let mut piece = self.clear(pos).piece().copied()?;
        piece.set_pos(None);
        Some(piece)
    }

    /// Remove every piece of `side` from the board and forget their
    /// placements. Returns how many were removed.
    pub fn remove_side(&mut self, side: Side) -> usize {
        let mut removed = 0;
        for pos in Pos::all() {
            if self.piece_at(pos).map_or(false, |piece| piece.side() == side) {
                self.clear(pos);
                removed += 1;
            }
        }
        self.placements.retain(|pos| !self.cells[pos.index()].is_empty());
        removed
    }

    /// Reveal every opponent piece, on the board and in the capture record.
    pub fn reveal_all(&mut self) {
        for cell in self.cells.iter_mut() {
            if let Occupant::Piece(piece) = cell {
                piece.reveal();
            }
        }
        for piece in self.captured.iter_mut() {
            piece.reveal();
        }
    }

    // ========== Challenge Staging ==========

    /// Swap the occupant of the most recent placement for a challenge
    /// marker. Does nothing if a challenge is already staged or nothing has
    /// been placed.
    pub fn challenge(&mut self) {
        if self.staged.is_some() {
            return;
        }
        if let Some(&pos) = self.placements.last() {
            let real = std::mem::replace(&mut self.cells[pos.index()], Occupant::Challenge);
            self.staged = Some((pos, real));
        }
    }

    /// Put back whatever [`challenge`](Self::challenge) swapped out.
    /// No-op without a staged challenge.
    pub fn restore(&mut self) {
        if let Some((pos, real)) = self.staged.take() {
            self.cells[pos.index()] = real;
        }
    }

    #[inline]
    pub fn is_challenge_staged(&self) -> bool {
        self.staged.is_some()
    }

    // ========== Geometry ==========

    /// Occupants of the four orthogonal neighbours of `pos`, walls included.
    pub fn neighbors(&self, pos: Pos) -> [(Direction, Occupant); 4] {
        Direction::ALL.map(|dir| {
            let (dx, dy) = dir.delta();
            let occupant = self.get_at(pos.col() as i16 + dx as i16, pos.row() as i16 + dy as i16);
            (dir, occupant)
        })
    }

    /// True when all four neighbours, walls included, are hostile to the
    /// piece's side.
    pub fn is_surrounded(&self, piece: &Piece) -> bool {
        let Some(pos) = piece.pos() else {
            return false;
        };
        self.neighbors(pos)
            .iter()
            .all(|(_, occupant)| occupant.is_hostile_to(piece.side()))
    }

    /// Directions in which an enemy piece (never a wall) sits directly next
    /// to `piece` and could attack it, or be attacked by it, next move.
    pub fn can_be_challenged(&self, piece: &Piece) -> Vec<Direction> {
        let Some(pos) = piece.pos() else {
            return Vec::new();
        };
        self.neighbors(pos)
            .iter()
            .filter(|(_, occupant)| occupant.piece().map_or(false, |p| p.side() != piece.side()))
            .map(|(dir, _)| *dir)
            .collect()
    }

    /// Directions `piece` may move in: on the board and not onto a friend.
    pub fn legal_directions(&self, piece: &Piece) -> Vec<Direction> {
        let Some(pos) = piece.pos() else {
            return Vec::new();
        };
        self.neighbors(pos)
            .iter()
            .filter(|(_, occupant)| match occupant {
                Occupant::Empty => true,
                Occupant::Piece(other) => other.side() != piece.side(),
                Occupant::Challenge | Occupant::Wall => false,
            })
            .map(|(dir, _)| *dir)
            .collect()
    }

    /// True when every cell in the flag's column from its current row
    /// (exclusive) to its far row (inclusive) is empty.
    pub fn clear_path_to_end(&self, flag: &Piece) -> bool {
        let Some(pos) = flag.pos() else {
            return false;
        };
        let (col, row) = (pos.col(), pos.row());
        let mut rows = match flag.side() {
            Side::Player => (row + 1)..BOARD_HEIGHT,
            Side::Opponent => 0..row,
        };
        rows.all(|r| self.is_empty(Pos::new(col, r)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    /// Plain-text grid from the player's point of view. Player pieces show
    /// their keyword, revealed opponent pieces the keyword in lowercase,
    /// hidden ones `???` and a staged challenge `***`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..BOARD_WIDTH {
            write!(f, "  {} ", (b'A' + col) as char)?;
        }
        writeln!(f)?;
        for row in (0..BOARD_HEIGHT).rev() {
            write!(f, "{} ", row + 1)?;
            for col in 0..BOARD_WIDTH {
                let label = match self.at(Pos::new(col, row)) {
                    Occupant::Empty | Occupant::Wall => "   ".to_string(),
                    Occupant::Challenge => "***".to_string(),
                    Occupant::Piece(piece) if piece.is_hidden() => "???".to_string(),
                    Occupant::Piece(piece) if piece.side() == Side::Opponent => {
                        piece.rank().keyword().to_lowercase()
                    }
                    Occupant::Piece(piece) => piece.rank().keyword().to_string(),
                };
                write!(f, "|{}", label)?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

/// Convenience for tests and puzzles: a board built from `(rank, side, pos)`
/// triples in order.
impl FromIterator<(Rank, Side, Pos)> for Board {
    fn from_iter<I: IntoIterator<Item = (Rank, Side, Pos)>>(iter: I) -> Board {
        let mut board = Board::new();
        for (rank, side, pos) in iter {
            board.place(Piece::new(rank, side), pos);
        }
        board
    }
}
