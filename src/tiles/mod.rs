//! Tiles, tile sets and the draw pile.
//!
//! ## Key Types
//!
//! - `Tile`: a numbered, coloured tile or a joker, with a stable `TileId`
//! - `TileSet`: an ordered arrangement, classified as Group, Sequence or
//!   provisional
//! - `DrawPile`: the shuffled stock, drawn from the front

pub mod pile;
pub mod tile;
pub mod tileset;

pub use pile::DrawPile;
pub use tile::{
    build_deck, deck_tile_id, Color, Face, Tile, TileId, COPIES_PER_TILE, DECK_SIZE, JOKER_COUNT, MAX_NUMBER,
    MIN_NUMBER,
};
pub use tileset::{JokerBinding, JokerBindings, SetKind, Side, TileSet, GROUP_SIZES, SEQUENCE_SIZES};
