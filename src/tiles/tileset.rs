//! Tile sets and their classification.
//!
//! A `TileSet` is an ordered run of one or more tiles. Whether it is a
//! legal Group, a legal Sequence or merely provisional is always computed
//! from the tiles; nothing about the classification is stored.
//!
//! ## Validity
//!
//! - **Group**: 3-4 tiles, one number, pairwise-distinct colours. Jokers take
//!   the colours not already used, in `Color::ALL` order.
//! - **Sequence**: 3-13 tiles, one colour, distinct numbers forming a
//!   consecutive run once sorted. Tile order is for display only. Each
//!   joker fills one missing number: internal gaps first (ascending, in
//!   tile order), then extending the run upward, then downward once 13 is
//!   reached. Runs never leave 1..=13 and never wrap.
//!
//! A set valid both ways (`[r5, J, J]`) classifies as a Sequence.
//!
//! ## Joker bindings
//!
//! What a joker stands for is derived by `joker_bindings`. A joker taken
//! out of a set carries nothing with it.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::ops::RangeInclusive;

use super::tile::{Color, Face, Tile, TileId, MAX_NUMBER};
use crate::core::error::{EngineError, EngineResult};

/// Legal group sizes.
pub const GROUP_SIZES: RangeInclusive<usize> = 3..=4;

/// Legal sequence sizes.
pub const SEQUENCE_SIZES: RangeInclusive<usize> = 3..=13;

/// End of a set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Classification of a set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SetKind {
    Group,
    Sequence,
    /// Neither; tolerated on the board only mid-turn.
    Provisional,
}

impl SetKind {
    /// Can a set of this kind stay on the board after a turn?
    #[must_use]
    pub fn is_valid(self) -> bool {
        self != SetKind::Provisional
    }
}

/// What a joker stands for inside a valid set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JokerBinding {
    pub tile: TileId,
    pub number: u8,
    pub color: Color,
}

/// At most two jokers exist.
pub type JokerBindings = SmallVec<[JokerBinding; 2]>;

/// Numbers a valid sequence covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Run {
    color: Color,
    start: u8,
    end: u8,
}

/// An ordered arrangement of tiles.
///
/// ```
/// use rummikub_engine::tiles::{Color, SetKind, Side, Tile, TileId, TileSet};
///
/// let mut set = TileSet::new(vec![
///     Tile::new(TileId::new(0), 1, Color::Blue),
///     Tile::new(TileId::new(1), 2, Color::Blue),
///     Tile::new(TileId::new(2), 3, Color::Blue),
/// ]).unwrap();
/// assert_eq!(set.kind(), SetKind::Sequence);
///
/// // A red 4 does not extend a blue run; the set is left as it was.
/// let red = Tile::new(TileId::new(3), 4, Color::Red);
/// assert!(set.append_tile(Side::Right, red).is_err());
/// assert_eq!(set.size(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTileSet")]
pub struct TileSet {
    tiles: Vector<Tile>,
}

#[derive(Deserialize)]
struct RawTileSet {
    tiles: Vector<Tile>,
}

impl TryFrom<RawTileSet> for TileSet {
    type Error = EngineError;

    fn try_from(raw: RawTileSet) -> EngineResult<Self> {
        TileSet::new(raw.tiles)
    }
}

impl TileSet {
    /// Create a set from tiles in order. At least one tile is required.
    pub fn new(tiles: impl IntoIterator<Item = Tile>) -> EngineResult<Self> {
        let tiles: Vector<Tile> = tiles.into_iter().collect();
        if tiles.is_empty() {
            return Err(EngineError::EmptySet);
        }
        Ok(Self { tiles })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn left_tile(&self) -> Option<&Tile> {
        self.tiles.front()
    }

    #[must_use]
    pub fn right_tile(&self) -> Option<&Tile> {
        self.tiles.back()
    }

    #[must_use]
    pub fn tiles(&self) -> &Vector<Tile> {
        &self.tiles
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn tile_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().map(Tile::id)
    }

    #[must_use]
    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.iter().any(|t| t.id() == id)
    }

    pub fn into_tiles(self) -> Vector<Tile> {
        self.tiles
    }

    // === Classification ===

    /// 3-4 tiles of one number in distinct colours.
    #[must_use]
    pub fn is_valid_group(&self) -> bool {
        self.group_number().is_some()
    }

    /// 3-13 tiles of one colour forming a consecutive run.
    #[must_use]
    pub fn is_valid_sequence(&self) -> bool {
        self.sequence_run().is_some()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_sequence() || self.is_valid_group()
    }

    #[must_use]
    pub fn kind(&self) -> SetKind {
        if self.is_valid_sequence() {
            SetKind::Sequence
        } else if self.is_valid_group() {
            SetKind::Group
        } else {
            SetKind::Provisional
        }
    }

    fn group_number(&self) -> Option<u8> {
        if !GROUP_SIZES.contains(&self.tiles.len()) {
            return None;
        }

        let mut number = None;
        let mut colors = 0u8;

        for tile in &self.tiles {
            let Face::Number { number: n, color } = tile.face() else {
                continue;
            };
            match number {
                None => number = Some(n),
                Some(base) if base != n => return None,
                Some(_) => {}
            }
            let bit = 1u8 << color.index();
            if colors & bit != 0 {
                return None;
            }
            colors |= bit;
        }

        number
    }

    fn sequence_run(&self) -> Option<Run> {
        let size = self.tiles.len();
        if !SEQUENCE_SIZES.contains(&size) {
            return None;
        }

        let mut color = None;
        let mut seen = 0u16;
        let mut jokers = 0usize;

        for tile in &self.tiles {
            match tile.face() {
                Face::Joker => jokers += 1,
                Face::Number { number, color: c } => {
                    match color {
                        None => color = Some(c),
                        Some(base) if base != c => return None,
                        Some(_) => {}
                    }
                    let bit = 1u16 << number;
                    if seen & bit != 0 {
                        return None;
                    }
                    seen |= bit;
                }
            }
        }

        let color = color?;
        let low = seen.trailing_zeros() as u8;
        let high = (15 - seen.leading_zeros()) as u8;
        let span = usize::from(high - low + 1);
        let gaps = span - (size - jokers);
        if gaps > jokers {
            return None;
        }

        // Surplus jokers extend upward first, then downward.
        let surplus = (jokers - gaps) as u8;
        let up = surplus.min(MAX_NUMBER - high);
        let down = surplus - up;
        if down >= low {
            return None;
        }

        Some(Run {
            color,
            start: low - down,
            end: high + up,
        })
    }

    /// What each joker stands for. Empty for a provisional set.
    #[must_use]
    pub fn joker_bindings(&self) -> JokerBindings {
        let jokers = self.tiles.iter().filter(|t| t.is_joker()).map(Tile::id);

        if let Some(run) = self.sequence_run() {
            let present: Vec<u8> = self.tiles.iter().filter_map(Tile::number).collect();
            let missing = (run.start..=run.end).filter(|n| !present.contains(n));
            return jokers
                .zip(missing)
                .map(|(tile, number)| JokerBinding {
                    tile,
                    number,
                    color: run.color,
                })
                .collect();
        }

        if let Some(number) = self.group_number() {
            let used: Vec<Color> = self.tiles.iter().filter_map(Tile::color).collect();
            let free = Color::ALL.into_iter().filter(|c| !used.contains(c));
            return jokers
                .zip(free)
                .map(|(tile, color)| JokerBinding { tile, number, color })
                .collect();
        }

        JokerBindings::new()
    }

    /// Number and colour the tile at `index` counts as.
    ///
    /// For a joker this is its binding; `None` if the set is provisional or
    /// the index is out of range.
    #[must_use]
    pub fn effective_face(&self, index: usize) -> Option<(u8, Color)> {
        let tile = self.tiles.get(index)?;
        match tile.face() {
            Face::Number { number, color } => Some((number, color)),
            Face::Joker => self
                .joker_bindings()
                .into_iter()
                .find(|b| b.tile == tile.id())
                .map(|b| (b.number, b.color)),
        }
    }

    /// Sum of effective numbers of the tiles selected by `filter`.
    ///
    /// Jokers in a provisional set count zero.
    #[must_use]
    pub fn points_of(&self, filter: impl Fn(TileId) -> bool) -> u32 {
        let bindings = self.joker_bindings();
        self.tiles
            .iter()
            .filter(|t| filter(t.id()))
            .map(|t| match t.number() {
                Some(n) => u32::from(n),
                None => bindings
                    .iter()
                    .find(|b| b.tile == t.id())
                    .map_or(0, |b| u32::from(b.number)),
            })
            .sum()
    }

    /// Sum of effective numbers of every tile.
    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.points_of(|_| true)
    }

    // === Mutation ===

    /// Insert a tile at one end, keeping the change only if the set is valid
    /// afterwards. On rejection the tile is handed back and the set is
    /// unchanged.
    ///
    /// `side` only decides where the tile sits in the arrangement. Sequence
    /// validity ignores tile order, so `b4` appended on the left of
    /// `[b1 b2 b3]` is accepted as `[b4 b1 b2 b3]`; callers that care about
    /// display order pick the side themselves.
    pub fn append_tile(&mut self, side: Side, tile: Tile) -> Result<(), Tile> {
        let before = self.tiles.clone();
        self.push(side, tile.clone());

        if self.is_valid() {
            Ok(())
        } else {
            self.tiles = before;
            Err(tile)
        }
    }

    /// Insert a tile at one end without checking validity.
    pub fn push(&mut self, side: Side, tile: Tile) {
        match side {
            Side::Left => self.tiles.push_front(tile),
            Side::Right => self.tiles.push_back(tile),
        }
    }

    /// Remove the tile at `index`.
    ///
    /// Returns `None` if the index is out of range or the tile is the last
    /// one; a set is never left empty.
    pub fn take_tile(&mut self, index: usize) -> Option<Tile> {
        if index >= self.tiles.len() || self.tiles.len() == 1 {
            return None;
        }
        Some(self.tiles.remove(index))
    }

    /// Split into `[0, index)` and `[index, size)`.
    ///
    /// Requires `0 < index < size`; otherwise the set comes back untouched.
    /// Either half may be provisional.
    pub fn split_at(self, index: usize) -> Result<(TileSet, TileSet), TileSet> {
        if index == 0 || index >= self.tiles.len() {
            return Err(self);
        }
        let mut left = self.tiles;
        let right = left.split_off(index);
        Ok((TileSet { tiles: left }, TileSet { tiles: right }))
    }

    /// Concatenate `self` then `other` into a candidate set.
    ///
    /// The candidate is not validated here.
    #[must_use]
    pub fn merge_with(mut self, other: TileSet) -> TileSet {
        self.tiles.append(other.tiles);
        self
    }

    /// Swap `tile` in for the joker standing for it.
    ///
    /// In a sequence the tile must be exactly the joker's binding. In a group
    /// any colour the numbered tiles leave free will do. Returns the joker;
    /// otherwise hands `tile` back and leaves the set unchanged.
    pub fn replace_joker(&mut self, tile: Tile) -> Result<Tile, Tile> {
        let Face::Number { number, color } = tile.face() else {
            return Err(tile);
        };

        let bindings = self.joker_bindings();
        let claimed = match self.kind() {
            SetKind::Sequence => bindings
                .iter()
                .find(|b| b.number == number && b.color == color),
            SetKind::Group => {
                let taken = self.tiles.iter().any(|t| t.color() == Some(color));
                bindings.iter().find(|b| b.number == number && !taken)
            }
            SetKind::Provisional => None,
        };
        let Some(index) = claimed.and_then(|b| self.tiles.iter().position(|t| t.id() == b.tile)) else {
            return Err(tile);
        };

        Ok(self.tiles.set(index, tile))
    }
}

impl fmt::Display for TileSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, tile) in self.tiles.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", tile)?;
        }
        f.write_str("]")
    }
}
