//! Read-only views of a match.
//!
//! A `GameView` borrows the game and is what automated players see. A view
//! built for one player hides every other hand, leaving only its size.

use im::Vector;

use super::game::GameResult;
use crate::board::Board;
use crate::core::player::PlayerId;
use crate::tiles::Tile;

/// One seat as seen through a view.
#[derive(Clone, Copy, Debug)]
pub struct PlayerView<'a> {
    pub id: PlayerId,
    pub name: &'a str,
    /// `None` when the viewer may not see this hand.
    pub hand: Option<&'a Vector<Tile>>,
    pub hand_size: usize,
    pub has_placed_opening_meld: bool,
    pub is_automated: bool,
}

/// Snapshot of everything a player or driver may look at.
#[derive(Clone, Debug)]
pub struct GameView<'a> {
    pub(crate) viewer: Option<PlayerId>,
    pub(crate) active_player: Option<PlayerId>,
    pub(crate) turn_in_progress: bool,
    pub(crate) turn_number: u32,
    pub(crate) board: &'a Board,
    pub(crate) pile_size: usize,
    pub(crate) players: Vec<PlayerView<'a>>,
    pub(crate) result: Option<&'a GameResult>,
}

impl<'a> GameView<'a> {
    /// Whose hand is visible; `None` for the full view.
    #[must_use]
    pub fn viewer(&self) -> Option<PlayerId> {
        self.viewer
    }

    #[must_use]
    pub fn active_player(&self) -> Option<PlayerId> {
        self.active_player
    }

    #[must_use]
    pub fn turn_in_progress(&self) -> bool {
        self.turn_in_progress
    }

    /// Resolved turns so far.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub fn board(&self) -> &'a Board {
        self.board
    }

    #[must_use]
    pub fn pile_size(&self) -> usize {
        self.pile_size
    }

    #[must_use]
    pub fn players(&self) -> &[PlayerView<'a>] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PlayerView<'a>> {
        self.players.get(id.index())
    }

    /// A hand, if visible.
    #[must_use]
    pub fn hand(&self, id: PlayerId) -> Option<&'a Vector<Tile>> {
        self.player(id).and_then(|p| p.hand)
    }

    /// The active player's hand, if visible.
    #[must_use]
    pub fn active_hand(&self) -> Option<&'a Vector<Tile>> {
        self.active_player.and_then(|id| self.hand(id))
    }

    #[must_use]
    pub fn result(&self) -> Option<&'a GameResult> {
        self.result
    }
}
