//! Turn bookkeeping and outcomes.
//!
//! A turn is a transaction over the board and the active player's hand.
//! `TurnState` holds what is needed to undo it plus the per-turn tile
//! bookkeeping that the opening-meld gate and end-of-turn checks read.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::BoardSnapshot;
use crate::core::action::Move;
use crate::core::player::PlayerId;
use crate::tiles::{Tile, TileId};

/// What drawing at the end of a turn produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawResult {
    Drawn(TileId),
    /// Nothing left to draw. The turn still ends normally.
    PileExhausted,
}

impl DrawResult {
    #[must_use]
    pub fn tile(self) -> Option<TileId> {
        match self {
            DrawResult::Drawn(tile) => Some(tile),
            DrawResult::PileExhausted => None,
        }
    }
}

/// Why a turn was rolled back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollbackReason {
    /// Provisional sets were left on the board.
    UnresolvedSets,
    /// A joker taken from the board was still in hand.
    BorrowedTilesInHand,
    /// First meld placed fewer than the required points.
    OpeningMeldTooLow { points: u32 },
}

/// How a turn resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// The board was kept.
    Committed {
        /// Hand tiles now on the board.
        tiles_placed: usize,
        /// This turn was the player's opening meld.
        opened: bool,
    },
    /// Nothing was placed; the player drew.
    Drew(DrawResult),
    /// Board and hand were restored, then the player drew.
    RolledBack { reason: RollbackReason, draw: DrawResult },
}

impl TurnOutcome {
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, TurnOutcome::Committed { .. })
    }

    /// The tile drawn, if the turn ended in a draw.
    #[must_use]
    pub fn drawn_tile(&self) -> Option<TileId> {
        match self {
            TurnOutcome::Committed { .. } => None,
            TurnOutcome::Drew(draw) | TurnOutcome::RolledBack { draw, .. } => draw.tile(),
        }
    }

    /// Whether the turn wanted a tile and found the pile empty.
    #[must_use]
    pub fn hit_empty_pile(&self) -> bool {
        match self {
            TurnOutcome::Committed { .. } => false,
            TurnOutcome::Drew(draw) | TurnOutcome::RolledBack { draw, .. } => {
                *draw == DrawResult::PileExhausted
            }
        }
    }
}

/// A turn in progress.
#[derive(Clone, Debug)]
pub struct TurnState {
    player: PlayerId,
    board_before: BoardSnapshot,
    hand_before: Vector<Tile>,
    /// Tiles moved from the hand to the board this turn and still there.
    placed: FxHashSet<TileId>,
    /// Jokers freed from pre-existing board sets, now in the hand.
    borrowed: FxHashSet<TileId>,
    moves: Vec<Move>,
}

impl TurnState {
    pub(crate) fn new(player: PlayerId, board_before: BoardSnapshot, hand_before: Vector<Tile>) -> Self {
        Self {
            player,
            board_before,
            hand_before,
            placed: FxHashSet::default(),
            borrowed: FxHashSet::default(),
            moves: Vec::new(),
        }
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Moves applied so far.
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Was this tile placed from the hand during this turn?
    #[must_use]
    pub fn placed_this_turn(&self, tile: TileId) -> bool {
        self.placed.contains(&tile)
    }

    pub fn placed_tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.placed.iter().copied()
    }

    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    #[must_use]
    pub fn has_borrowed(&self) -> bool {
        !self.borrowed.is_empty()
    }

    // === Bookkeeping ===

    /// A tile left the hand for the board.
    pub(crate) fn note_placed(&mut self, tile: TileId) {
        if !self.borrowed.remove(&tile) {
            self.placed.insert(tile);
        }
    }

    /// A tile came back from the board to the hand.
    pub(crate) fn note_returned(&mut self, tile: TileId) {
        if !self.placed.remove(&tile) {
            self.borrowed.insert(tile);
        }
    }

    pub(crate) fn record(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    /// Split into what a rollback needs.
    pub(crate) fn into_undo(self) -> (BoardSnapshot, Vector<Tile>) {
        (self.board_before, self.hand_before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn turn() -> TurnState {
        TurnState::new(PlayerId::new(0), Board::new().snapshot(), Vector::new())
    }

    #[test]
    fn test_place_then_retract() {
        let mut state = turn();
        state.note_placed(TileId::new(3));
        assert!(state.placed_this_turn(TileId::new(3)));
        assert_eq!(state.placed_count(), 1);

        state.note_returned(TileId::new(3));
        assert!(!state.placed_this_turn(TileId::new(3)));
        assert!(!state.has_borrowed());
    }

    #[test]
    fn test_borrowed_joker_must_go_back() {
        let mut state = turn();
        state.note_returned(TileId::new(104));
        assert!(state.has_borrowed());

        state.note_placed(TileId::new(104));
        assert!(!state.has_borrowed());
        assert_eq!(state.placed_count(), 0);
    }

    #[test]
    fn test_outcome_draws() {
        let drew = TurnOutcome::Drew(DrawResult::Drawn(TileId::new(9)));
        assert_eq!(drew.drawn_tile(), Some(TileId::new(9)));
        assert!(!drew.hit_empty_pile());

        let rolled = TurnOutcome::RolledBack {
            reason: RollbackReason::UnresolvedSets,
            draw: DrawResult::PileExhausted,
        };
        assert!(rolled.hit_empty_pile());
        assert!(!rolled.is_committed());

        let committed = TurnOutcome::Committed { tiles_placed: 3, opened: true };
        assert!(committed.is_committed());
        assert_eq!(committed.drawn_tile(), None);
    }
}
