//! # rummikub-engine
//!
//! A rule engine for Rummikub-style tile games.
//!
//! ## Design Principles
//!
//! 1. **Tiles Have Identity**: Every tile carries a `TileId`, and every set
//!    on the board a `SetId`. Equal-looking tiles or sets are never confused.
//!
//! 2. **Turns Are Transactions**: A turn snapshots the board and the hand,
//!    then either commits or rolls back and draws. Nothing in between leaks.
//!
//! 3. **Errors Are Values**: Bad configuration and refused edits come back as
//!    `EngineError`; a refused edit leaves state exactly as it was.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: `im` vectors and maps back sets, hands
//!   and board partitions, so snapshots are O(1) clones.
//!
//! - **Derived Joker Bindings**: What a joker stands for is computed by the
//!   set holding it and never stored on the tile.
//!
//! - **Deterministic Randomness**: One seed drives the shuffle, seating and
//!   automated players through independent streams.
//!
//! ## Modules
//!
//! - `core`: Players, RNG, configuration, errors, moves
//! - `tiles`: Tiles, tile sets and their validity, the draw pile
//! - `board`: The shared table and its snapshots
//! - `rules`: Turn manager, turn outcomes, read-only views
//! - `bot`: Move policies for automated players

pub mod core;
pub mod tiles;
pub mod board;
pub mod rules;
pub mod bot;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, PlayerMap, Player,
    GameRng, GameRngState,
    GameConfig, PlayerConfig,
    EngineError, EngineResult, Rejected,
    Move, TurnRecord,
};

pub use crate::tiles::{Color, Tile, TileId, TileSet, SetKind, Side, DrawPile};

pub use crate::board::{Board, BoardSnapshot, SetId, SetSource};

pub use crate::rules::{
    Game, GameResult, GameView, PlayerView,
    TurnOutcome, DrawResult, RollbackReason,
};

pub use crate::bot::{MovePolicy, EndTurnPolicy, UniformMeldPolicy};
