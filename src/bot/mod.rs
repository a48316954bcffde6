//! Automated players.
//!
//! A `MovePolicy` looks at a `GameView` and proposes the next move; the
//! engine applies it and validates the turn as for any other player.

pub mod policy;

pub use policy::{EndTurnPolicy, MovePolicy, UniformMeldPolicy};
