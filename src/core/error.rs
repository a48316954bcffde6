//! Engine error type.
//!
//! Every fallible engine operation returns [`EngineResult`]. Structural edits
//! that fail leave the state they were applied to untouched, so an error
//! always means "nothing happened".

use std::fmt;

use super::player::PlayerId;
use crate::board::SetId;
use crate::tiles::{Tile, TileId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// Player count outside the supported range.
    PlayerCount { count: usize },
    /// Two players were configured with the same name.
    DuplicatePlayerName(String),
    /// `deal` was called twice.
    AlreadyDealt,
    /// A turn was requested before the opening hands were dealt.
    NotDealt,
    /// Fewer tiles remain in the pile than were requested.
    PileExhausted { requested: usize, remaining: usize },
    /// A turn is already running.
    TurnInProgress,
    /// A move was issued outside a turn.
    NoTurnInProgress,
    /// The match has a result; no further turns are played.
    GameOver,
    /// A tile set needs at least one tile.
    EmptySet,
    /// Tile numbers run 1-13.
    TileNumber(u8),
    /// The same set id appears twice in loaded board state.
    DuplicateSet(SetId),
    /// No set with this id is on the board.
    UnknownSet(SetId),
    /// The active player does not hold this tile.
    TileNotInHand(TileId),
    /// Index past the end of a set.
    TileIndexOutOfRange { set: SetId, index: usize, size: usize },
    /// Split index must satisfy `0 < index < size`.
    InvalidSplit { set: SetId, index: usize, size: usize },
    /// Appending the tile would leave the set invalid.
    InvalidAppend { set: SetId },
    /// The concatenation of the two sets is not a valid set.
    InvalidMerge { left: SetId, right: SetId },
    /// A set cannot be merged with itself.
    SameSet(SetId),
    /// No joker in the set stands for the offered tile.
    NoMatchingJoker { set: SetId },
    /// The move touches tiles that were on the board before this turn.
    OpeningMeldRequired { player: PlayerId },
    /// Only tiles placed from the hand this turn can be taken back.
    TileNotRetractable(TileId),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::PlayerCount { count } => {
                write!(f, "a game needs 2-4 players, got {}", count)
            }
            EngineError::DuplicatePlayerName(name) => {
                write!(f, "player name '{}' is used twice", name)
            }
            EngineError::AlreadyDealt => write!(f, "tiles have already been dealt"),
            EngineError::NotDealt => write!(f, "tiles have not been dealt yet"),
            EngineError::PileExhausted { requested, remaining } => write!(
                f,
                "draw pile exhausted: requested {} tiles, {} remaining",
                requested, remaining
            ),
            EngineError::TurnInProgress => write!(f, "a turn is already in progress"),
            EngineError::NoTurnInProgress => write!(f, "no turn is in progress"),
            EngineError::GameOver => write!(f, "the game is over"),
            EngineError::EmptySet => write!(f, "a tile set cannot be empty"),
            EngineError::TileNumber(number) => {
                write!(f, "tile numbers run 1-13, got {}", number)
            }
            EngineError::DuplicateSet(set) => write!(f, "{} appears more than once", set),
            EngineError::UnknownSet(set) => write!(f, "{} is not on the board", set),
            EngineError::TileNotInHand(tile) => write!(f, "{} is not in the player's hand", tile),
            EngineError::TileIndexOutOfRange { set, index, size } => {
                write!(f, "index {} out of range for {} of size {}", index, set, size)
            }
            EngineError::InvalidSplit { set, index, size } => {
                write!(f, "cannot split {} of size {} at index {}", set, size, index)
            }
            EngineError::InvalidAppend { set } => {
                write!(f, "appending to {} would make it invalid", set)
            }
            EngineError::InvalidMerge { left, right } => {
                write!(f, "merging {} with {} does not form a valid set", left, right)
            }
            EngineError::SameSet(set) => write!(f, "cannot merge {} with itself", set),
            EngineError::NoMatchingJoker { set } => {
                write!(f, "no joker in {} stands for that tile", set)
            }
            EngineError::OpeningMeldRequired { player } => write!(
                f,
                "{} must place an opening meld before using board tiles",
                player
            ),
            EngineError::TileNotRetractable(tile) => {
                write!(f, "{} was not placed from the hand this turn", tile)
            }
        }
    }
}

impl std::error::Error for EngineError {}

pub type EngineResult<T> = Result<T, EngineError>;

/// A board edit that refused an owned tile.
///
/// The tile is handed back so it can return to where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejected {
    pub tile: Tile,
    pub error: EngineError,
}

impl Rejected {
    #[must_use]
    pub fn new(tile: Tile, error: EngineError) -> Self {
        Self { tile, error }
    }
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rejected: {}", self.tile, self.error)
    }
}

impl std::error::Error for Rejected {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
