//! Players and per-player data storage.
//!
//! ## PlayerId
//!
//! Seat index of a player, 0-based in configuration order.
//!
//! ## PlayerMap
//!
//! Per-player storage backed by `Vec` for O(1) access, indexable by `PlayerId`.
//!
//! ## Player
//!
//! A hand of tiles plus the flags that gate what the player may do.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::tiles::{Tile, TileId};

/// Seat index of a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat after this one, wrapping around.
    #[must_use]
    pub fn next(self, player_count: usize) -> Self {
        Self(((self.index() + 1) % player_count) as u8)
    }

    /// The seat before this one, wrapping around.
    #[must_use]
    pub fn previous(self, player_count: usize) -> Self {
        Self(((self.index() + player_count - 1) % player_count) as u8)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ```
/// use rummikub_engine::core::{PlayerId, PlayerMap};
///
/// let mut drawn: PlayerMap<u32> = PlayerMap::from_values(vec![0, 0]);
/// drawn[PlayerId::new(1)] += 1;
/// assert_eq!(drawn[PlayerId::new(1)], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a PlayerMap from values in seat order.
    pub fn from_values(values: Vec<T>) -> Self {
        assert!(!values.is_empty(), "Must have at least 1 player");
        assert!(values.len() <= 255, "At most 255 players supported");
        Self { data: values }
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// A seated player: name, hand and turn-eligibility flags.
///
/// Hand order is kept as dealt/drawn for display; it has no bearing on
/// validity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    hand: Vector<Tile>,
    has_placed_opening_meld: bool,
    is_automated: bool,
}

impl Player {
    #[must_use]
    pub fn new(name: impl Into<String>, is_automated: bool) -> Self {
        Self {
            name: name.into(),
            hand: Vector::new(),
            has_placed_opening_meld: false,
            is_automated,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn hand(&self) -> &Vector<Tile> {
        &self.hand
    }

    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    /// Sum of face values in hand. Jokers count zero.
    #[must_use]
    pub fn hand_value(&self) -> u32 {
        self.hand.iter().map(|t| u32::from(t.points())).sum()
    }

    /// Has this player committed an opening meld?
    #[must_use]
    pub fn has_placed_opening_meld(&self) -> bool {
        self.has_placed_opening_meld
    }

    #[must_use]
    pub fn is_automated(&self) -> bool {
        self.is_automated
    }

    #[must_use]
    pub fn holds(&self, id: TileId) -> bool {
        self.hand.iter().any(|t| t.id() == id)
    }

    /// Add a tile to the end of the hand.
    pub fn receive(&mut self, tile: Tile) {
        self.hand.push_back(tile);
    }

    /// Add several tiles, keeping their order.
    pub fn receive_all(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        self.hand.extend(tiles);
    }

    /// Remove a tile by id. Returns its hand position with the tile.
    pub fn take_tile(&mut self, id: TileId) -> Option<(usize, Tile)> {
        let index = self.hand.iter().position(|t| t.id() == id)?;
        Some((index, self.hand.remove(index)))
    }

    /// Put a tile back where `take_tile` found it.
    pub(crate) fn return_tile(&mut self, index: usize, tile: Tile) {
        let index = index.min(self.hand.len());
        self.hand.insert(index, tile);
    }

    pub(crate) fn replace_hand(&mut self, hand: Vector<Tile>) {
        self.hand = hand;
    }

    pub(crate) fn mark_opened(&mut self) {
        self.has_placed_opening_meld = true;
    }
}
