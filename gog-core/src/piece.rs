//! Ranks, sides and combat resolution.
//!
//! Every piece carries one of 15 ranks. Combat is a pure function of the two
//! ranks involved; the only exceptions to "higher rank wins" are the two
//! Private/Spy ambush matchups.
//!
//! ```text
//!  0 FLAG                 captured by anything, loses every attack
//!  1 PRIVATE              beats the Spy, attacking or defending
//!  2..=13                 plain rank comparison
//! 14 SPY                  beats everything except the Private
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Direction, Pos, BOARD_HEIGHT, HOME_ROWS};
use crate::error::ParseError;

/// Number of distinct ranks (Flag through Spy).
pub const RANK_COUNT: usize = 15;

/// Pieces per side at the start of a match, indexed by rank value.
///
/// 1 Flag, 6 Privates, 2 Spies and one of every officer: 21 pieces.
pub const STARTING_PIECES: [u8; RANK_COUNT] = [1, 6, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2];

/// Symbol shown in place of a hidden opponent piece.
pub const HIDDEN_SYMBOL: &str = "❔";

/// Symbol shown for the opponent's flag once revealed.
pub const OPPONENT_FLAG_SYMBOL: &str = "🏴";

/// Symbol shown on a cell while a combat result is being revealed.
pub const CHALLENGE_SYMBOL: &str = "💥";

/// The army a piece fights for.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The human player. Sets up on rows 1-3 and advances up the board.
    Player,
    /// The automated opponent. Sets up on rows 6-8 and advances down.
    Opponent,
}

impl Side {
    /// Get the other side.
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    /// Rows (0-indexed) this side may place pieces on during setup.
    pub fn home_rows(self) -> std::ops::Range<u8> {
        match self {
            Side::Player => 0..HOME_ROWS,
            Side::Opponent => BOARD_HEIGHT - HOME_ROWS..BOARD_HEIGHT,
        }
    }

    /// The row this side's flag must reach to win: the enemy back row.
    #[inline]
    pub fn far_row(self) -> u8 {
        match self {
            Side::Player => BOARD_HEIGHT - 1,
            Side::Opponent => 0,
        }
    }

    /// Direction of travel towards `far_row`.
    #[inline]
    pub fn forward(self) -> Direction {
        match self {
            Side::Player => Direction::Up,
            Side::Opponent => Direction::Down,
        }
    }
}

/// Military rank of a piece. Discriminants are the rank values used in
/// combat comparison.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Flag = 0,
    Private = 1,
    Sergeant = 2,
    SecondLieutenant = 3,
    FirstLieutenant = 4,
    Captain = 5,
    Major = 6,
    LieutenantColonel = 7,
    Colonel = 8,
    BrigadierGeneral = 9,
    MajorGeneral = 10,
    LieutenantGeneral = 11,
    General = 12,
    GeneralOfTheArmy = 13,
    Spy = 14,
}

impl Rank {
    /// All ranks in ascending order.
    pub const ALL: [Rank; RANK_COUNT] = [
        Rank::Flag,
        Rank::Private,
        Rank::Sergeant,
        Rank::SecondLieutenant,
        Rank::FirstLieutenant,
        Rank::Captain,
        Rank::Major,
        Rank::LieutenantColonel,
        Rank::Colonel,
        Rank::BrigadierGeneral,
        Rank::MajorGeneral,
        Rank::LieutenantGeneral,
        Rank::General,
        Rank::GeneralOfTheArmy,
        Rank::Spy,
    ];

    /// Numeric rank value (0 = Flag, 14 = Spy).
    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Convert a rank value back to a `Rank`.
    #[inline]
    pub fn from_value(value: u8) -> Option<Rank> {
        Rank::ALL.get(value as usize).copied()
    }

    /// Iterate over all ranks, Flag first.
    pub fn all() -> impl Iterator<Item = Rank> {
        Rank::ALL.into_iter()
    }

    /// How many pieces of this rank each side starts with.
    #[inline]
    pub fn starting_count(self) -> u8 {
        STARTING_PIECES[self as usize]
    }

    /// Full display name, e.g. "LIEUTENANT COLONEL".
    pub fn name(self) -> &'static str {
        match self {
            Rank::Flag => "FLAG",
            Rank::Private => "PRIVATE",
            Rank::Sergeant => "SERGEANT",
            Rank::SecondLieutenant => "2ND LIEUTENANT",
            Rank::FirstLieutenant => "1ST LIEUTENANT",
            Rank::Captain => "CAPTAIN",
            Rank::Major => "MAJOR",
            Rank::LieutenantColonel => "LIEUTENANT COLONEL",
            Rank::Colonel => "COLONEL",
            Rank::BrigadierGeneral => "BRIGADIER GENERAL",
            Rank::MajorGeneral => "MAJOR GENERAL",
            Rank::LieutenantGeneral => "LIEUTENANT GENERAL",
            Rank::General => "GENERAL",
            Rank::GeneralOfTheArmy => "GENERAL OF THE ARMY",
            Rank::Spy => "SPY",
        }
    }

    /// Three-letter abbreviation accepted when placing pieces.
    pub fn keyword(self) -> &'static str {
        match self {
            Rank::Flag => "FLG",
            Rank::Private => "PRV",
            Rank::Sergeant => "SGT",
            Rank::SecondLieutenant => "2LT",
            Rank::FirstLieutenant => "1LT",
            Rank::Captain => "CPT",
            Rank::Major => "MJR",
            Rank::LieutenantColonel => "LTC",
            Rank::Colonel => "COL",
            Rank::BrigadierGeneral => "BRG",
            Rank::MajorGeneral => "MJG",
            Rank::LieutenantGeneral => "LTG",
            Rank::General => "GNR",
            Rank::GeneralOfTheArmy => "GOA",
            Rank::Spy => "SPY",
        }
    }

    /// Emoji used by the console renderer.
    pub fn symbol(self) -> &'static str {
        match self {
            Rank::Flag => "🏳️",
            Rank::Private => "🪖",
            Rank::Sergeant => "🔼",
            Rank::SecondLieutenant => "🔺",
            Rank::FirstLieutenant => "🔻",
            Rank::Captain => "⚓",
            Rank::Major => "☀️",
            Rank::LieutenantColonel => "✴️",
            Rank::Colonel => "🔰",
            Rank::BrigadierGeneral => "🌟",
            Rank::MajorGeneral => "💫",
            Rank::LieutenantGeneral => "✨",
            Rank::General => "⚔️",
            Rank::GeneralOfTheArmy => "👑",
            Rank::Spy => "👀",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rank {
    type Err = ParseError;

    /// Accepts a full name ("major general") or keyword ("MJG"), any case.
    fn from_str(s: &str) -> Result<Rank, ParseError> {
        let wanted = s.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        Rank::all()
            .find(|rank| rank.name() == wanted || rank.keyword() == wanted)
            .ok_or_else(|| ParseError::UnknownRank(s.trim().to_string()))
    }
}

// ============================================================================
// COMBAT
// ============================================================================

/// Result of one piece attacking another.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Combat {
    AttackerSurvives,
    DefenderSurvives,
    /// Equal ranks: both pieces are eliminated (a "split").
    BothEliminated,
}

/// Resolve an attack by `attacker` on a stationary `defender`.
///
/// Rules, first match wins:
/// 1. Private attacking Spy: attacker survives.
/// 2. Spy attacking Private: defender survives.
/// 3. Equal ranks: both eliminated. This includes Flag against Flag.
/// 4. Otherwise the higher rank survives, so a defending Flag falls to any
///    attacker and an attacking Flag loses to any defender.
pub fn resolve(attacker: Rank, defender: Rank) -> Combat {
    match (attacker, defender) {
        (Rank::Private, Rank::Spy) => Combat::AttackerSurvives,
        (Rank::Spy, Rank::Private) => Combat::DefenderSurvives,
        (a, d) if a == d => Combat::BothEliminated,
        (a, d) if a > d => Combat::AttackerSurvives,
        _ => Combat::DefenderSurvives,
    }
}

// ============================================================================
// PIECE
// ============================================================================

/// A single piece. Rank and side are fixed at creation; only the position
/// and the visibility flag change during a match.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Piece {
    rank: Rank,
    side: Side,
    pos: Option<Pos>,
    hidden: bool,
}

impl Piece {
    /// Create an unplaced piece. Opponent pieces start hidden.
    pub fn new(rank: Rank, side: Side) -> Piece {
        Piece {
            rank,
            side,
            pos: None,
            hidden: side == Side::Opponent,
        }
    }

    #[inline]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Current board position, or `None` while unplaced or after capture.
    #[inline]
    pub fn pos(&self) -> Option<Pos> {
        self.pos
    }

    #[inline]
    pub(crate) fn set_pos(&mut self, pos: Option<Pos>) {
        self.pos = pos;
    }

    #[inline]
    pub fn is_flag(&self) -> bool {
        self.rank == Rank::Flag
    }

    /// Whether the human is prevented from seeing this piece's rank.
    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Make the rank visible to the human.
    #[inline]
    pub fn reveal(&mut self) {
        self.hidden = false;
    }

    /// Display name of the rank.
    pub fn name(&self) -> &'static str {
        self.rank.name()
    }

    /// Symbol as the human sees it.
    pub fn symbol(&self) -> &'static str {
        if self.hidden {
            HIDDEN_SYMBOL
        } else if self.is_flag() && self.side == Side::Opponent {
            OPPONENT_FLAG_SYMBOL
        } else {
            self.rank.symbol()
        }
    }
}
