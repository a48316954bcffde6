//! Core engine types: players, RNG, configuration, errors, moves.
//!
//! Nothing here knows how tiles combine into sets; that lives in `tiles`
//! and `board`.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use action::{Move, TurnRecord};
pub use config::{
    GameConfig, PlayerConfig, DEFAULT_MAX_MOVES_PER_TURN, HAND_SIZE, MAX_PLAYERS, MIN_PLAYERS,
    OPENING_MELD_POINTS,
};
pub use error::{EngineError, EngineResult, Rejected};
pub use player::{Player, PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
