//! Moves and turn records.
//!
//! A `Move` is one structural edit a player (or a bot on their behalf) asks
//! for during a turn. Moves name tiles by `TileId` and sets by `SetId`, so a
//! proposed move stays meaningful while the board changes around it.
//!
//! A `TurnRecord` is what remains of a turn once it resolves.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;
use crate::board::SetId;
use crate::rules::TurnOutcome;
use crate::tiles::{Side, TileId};

/// A single move within a turn.
///
/// ```
/// use rummikub_engine::core::Move;
/// use rummikub_engine::tiles::TileId;
///
/// let mv = Move::place_set(&[TileId::new(0), TileId::new(8), TileId::new(16)]);
/// assert_eq!(mv.tile_count(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Lay hand tiles on the board as a new set.
    PlaceSet { tiles: SmallVec<[TileId; 4]> },

    /// Extend a board set with a hand tile. Rejected if the result is invalid.
    Append { set: SetId, side: Side, tile: TileId },

    /// Split a set in two at `index`.
    Split { set: SetId, index: usize },

    /// Concatenate two sets. Rejected if the result is invalid.
    Merge { left: SetId, right: SetId },

    /// Move one tile between sets without validating either.
    MoveTile { from: SetId, index: usize, to: SetId, side: Side },

    /// Swap a hand tile for the joker standing in for it.
    ReplaceJoker { set: SetId, tile: TileId },

    /// Take back a tile placed from the hand earlier this turn.
    Retract { set: SetId, index: usize },

    /// Finish the turn.
    EndTurn,
}

impl Move {
    #[must_use]
    pub fn place_set(tiles: &[TileId]) -> Self {
        Move::PlaceSet {
            tiles: SmallVec::from_slice(tiles),
        }
    }

    /// Number of hand tiles this move puts on the board.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        match self {
            Move::PlaceSet { tiles } => tiles.len(),
            Move::Append { .. } | Move::ReplaceJoker { .. } => 1,
            _ => 0,
        }
    }

    #[must_use]
    pub fn is_end_turn(&self) -> bool {
        matches!(self, Move::EndTurn)
    }
}

/// A resolved turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Turn number, starting at 1.
    pub turn: u32,

    pub player: PlayerId,

    pub outcome: TurnOutcome,
}

impl TurnRecord {
    #[must_use]
    pub fn new(turn: u32, player: PlayerId, outcome: TurnOutcome) -> Self {
        Self {
            turn,
            player,
            outcome,
        }
    }
}
