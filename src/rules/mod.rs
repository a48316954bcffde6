//! Turn flow and match rules.
//!
//! `Game` is the turn manager: it rotates players, runs each turn as a
//! snapshot-act-resolve transaction, enforces the opening meld and decides
//! when the match is over.

pub mod game;
pub mod turn;
pub mod view;

pub use game::{Game, GameResult};
pub use turn::{DrawResult, RollbackReason, TurnOutcome, TurnState};
pub use view::{GameView, PlayerView};
