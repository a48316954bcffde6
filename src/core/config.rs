//! Match configuration.
//!
//! Drivers describe a match with a `GameConfig`:
//! - the seated players, in seat order, and whether each is automated
//! - an optional starting player, by name
//! - the RNG seed
//! - a cap on how many moves an automated player may issue per turn
//!
//! Validation happens in `Game::new`, which turns a bad player count into a
//! typed error instead of aborting.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};

/// Fewest players a match can seat.
pub const MIN_PLAYERS: usize = 2;

/// Most players a match can seat.
pub const MAX_PLAYERS: usize = 4;

/// Tiles dealt to each player.
pub const HAND_SIZE: usize = 14;

/// Points a player's first committed turn must place from the hand.
pub const OPENING_MELD_POINTS: u32 = 30;

/// Default cap on moves an automated player may issue in one turn.
pub const DEFAULT_MAX_MOVES_PER_TURN: usize = 64;

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Display name, unique within the match.
    pub name: String,

    /// Driven by a `MovePolicy` rather than a human.
    pub is_automated: bool,
}

impl PlayerConfig {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_automated: false,
        }
    }

    pub fn bot(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_automated: true,
        }
    }
}

/// Complete match configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seats in turn order.
    pub players: Vec<PlayerConfig>,

    /// Name of the player who moves first. Unknown names are ignored.
    pub starting_player: Option<String>,

    /// Seed for every random decision in the match.
    pub seed: u64,

    /// Upper bound on moves per automated turn.
    pub max_moves_per_turn: usize,
}

impl GameConfig {
    /// Create an empty configuration with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            players: Vec::new(),
            starting_player: None,
            seed,
            max_moves_per_turn: DEFAULT_MAX_MOVES_PER_TURN,
        }
    }

    /// Seat a human player.
    #[must_use]
    pub fn with_player(mut self, name: impl Into<String>) -> Self {
        self.players.push(PlayerConfig::human(name));
        self
    }

    /// Seat an automated player.
    #[must_use]
    pub fn with_bot(mut self, name: impl Into<String>) -> Self {
        self.players.push(PlayerConfig::bot(name));
        self
    }

    /// Seat players from `(name, is_automated)` pairs.
    #[must_use]
    pub fn with_players<S: Into<String>>(mut self, seats: impl IntoIterator<Item = (S, bool)>) -> Self {
        self.players.extend(seats.into_iter().map(|(name, is_automated)| PlayerConfig {
            name: name.into(),
            is_automated,
        }));
        self
    }

    /// Preset the player who moves first.
    #[must_use]
    pub fn with_starting_player(mut self, name: impl Into<String>) -> Self {
        self.starting_player = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_max_moves_per_turn(mut self, max: usize) -> Self {
        self.max_moves_per_turn = max;
        self
    }

    /// Check seat count and name uniqueness.
    pub fn validate(&self) -> EngineResult<()> {
        let count = self.players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(EngineError::PlayerCount { count });
        }

        for (i, seat) in self.players.iter().enumerate() {
            if self.players[..i].iter().any(|other| other.name == seat.name) {
                return Err(EngineError::DuplicatePlayerName(seat.name.clone()));
            }
        }

        Ok(())
    }

    /// Seat index of the configured starting player, if the name is known.
    #[must_use]
    pub fn starting_seat(&self) -> Option<usize> {
        let name = self.starting_player.as_deref()?;
        self.players.iter().position(|p| p.name == name)
    }
}
