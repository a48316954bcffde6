//! Tiles, colours and the fixed deck.
//!
//! A tile is a numbered, coloured piece or a joker. Every tile also carries
//! a `TileId`, assigned once when the deck is built, so that two red 7s can
//! be told apart even though they are equal as values.
//!
//! Jokers have no number or colour of their own. What a joker stands for is
//! derived by the set it sits in (see `TileSet::joker_bindings`); the tile
//! itself never stores it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::EngineError;

/// Lowest tile number.
pub const MIN_NUMBER: u8 = 1;

/// Highest tile number.
pub const MAX_NUMBER: u8 = 13;

/// Copies of each numbered tile in the deck.
pub const COPIES_PER_TILE: usize = 2;

/// Jokers in the deck.
pub const JOKER_COUNT: usize = 2;

/// 13 numbers x 4 colours x 2 copies + 2 jokers.
pub const DECK_SIZE: usize =
    MAX_NUMBER as usize * Color::ALL.len() * COPIES_PER_TILE + JOKER_COUNT;

/// Tile colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    Orange,
    Blue,
    Black,
    Red,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Orange, Color::Blue, Color::Black, Color::Red];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// One-letter code used in `Display` output.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Color::Orange => 'o',
            Color::Blue => 'b',
            Color::Black => 'k',
            Color::Red => 'r',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Orange => "orange",
            Color::Blue => "blue",
            Color::Black => "black",
            Color::Red => "red",
        };
        f.write_str(name)
    }
}

/// Identity of a physical tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u8);

impl TileId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

/// What is printed on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFace")]
pub enum Face {
    Number { number: u8, color: Color },
    Joker,
}

/// Wire form of `Face`, checked on the way in.
#[derive(Deserialize)]
enum RawFace {
    Number { number: u8, color: Color },
    Joker,
}

impl TryFrom<RawFace> for Face {
    type Error = EngineError;

    fn try_from(raw: RawFace) -> Result<Self, Self::Error> {
        match raw {
            RawFace::Number { number, color } if (MIN_NUMBER..=MAX_NUMBER).contains(&number) => {
                Ok(Face::Number { number, color })
            }
            RawFace::Number { number, .. } => Err(EngineError::TileNumber(number)),
            RawFace::Joker => Ok(Face::Joker),
        }
    }
}

/// A physical tile.
///
/// Tiles are deliberately not `Copy`: a tile lives in exactly one place (the
/// pile, a hand or a board set) and moves between them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    id: TileId,
    face: Face,
}

impl Tile {
    /// Create a numbered tile.
    ///
    /// Panics if `number` is outside 1..=13.
    #[must_use]
    pub fn new(id: TileId, number: u8, color: Color) -> Self {
        assert!(
            (MIN_NUMBER..=MAX_NUMBER).contains(&number),
            "Tile number must be 1-13, got {}",
            number
        );
        Self {
            id,
            face: Face::Number { number, color },
        }
    }

    /// Create a joker.
    #[must_use]
    pub fn joker(id: TileId) -> Self {
        Self { id, face: Face::Joker }
    }

    #[must_use]
    pub fn id(&self) -> TileId {
        self.id
    }

    #[must_use]
    pub fn face(&self) -> Face {
        self.face
    }

    /// Printed number; `None` for a joker.
    #[must_use]
    pub fn number(&self) -> Option<u8> {
        match self.face {
            Face::Number { number, .. } => Some(number),
            Face::Joker => None,
        }
    }

    /// Printed colour; `None` for a joker.
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        match self.face {
            Face::Number { color, .. } => Some(color),
            Face::Joker => None,
        }
    }

    #[must_use]
    pub fn is_joker(&self) -> bool {
        self.face == Face::Joker
    }

    /// Value equality: same number, colour and joker flag, regardless of id.
    #[must_use]
    pub fn same_face(&self, other: &Tile) -> bool {
        self.face == other.face
    }

    /// Face value. An unplaced joker is worth nothing.
    #[must_use]
    pub fn points(&self) -> u8 {
        self.number().unwrap_or(0)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.face {
            Face::Number { number, color } => write!(f, "{}{}", color.code(), number),
            Face::Joker => f.write_str("J"),
        }
    }
}

/// Build the full, unshuffled deck.
///
/// Ids run 0..106 in construction order: numbers ascending, then colours,
/// then copies; the two jokers take the last ids.
#[must_use]
pub fn build_deck() -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(DECK_SIZE);
    let mut next = 0u8;

    for number in MIN_NUMBER..=MAX_NUMBER {
        for color in Color::ALL {
            for _ in 0..COPIES_PER_TILE {
                tiles.push(Tile::new(TileId(next), number, color));
                next += 1;
            }
        }
    }

    for _ in 0..JOKER_COUNT {
        tiles.push(Tile::joker(TileId(next)));
        next += 1;
    }

    tiles
}

/// Id that `build_deck` gives to a numbered tile.
///
/// `None` if the number or copy index is out of range.
#[must_use]
pub fn deck_tile_id(number: u8, color: Color, copy: usize) -> Option<TileId> {
    if !(MIN_NUMBER..=MAX_NUMBER).contains(&number) || copy >= COPIES_PER_TILE {
        return None;
    }
    let slot = usize::from(number - MIN_NUMBER) * Color::ALL.len() + color.index();
    u8::try_from(slot * COPIES_PER_TILE + copy).ok().map(TileId)
}
