//! The shared table of tile sets.
//!
//! The `Board` owns every set laid down, split into three partitions:
//! - committed groups
//! - committed sequences
//! - provisional sets (anything not yet valid; tolerated mid-turn only)
//!
//! Sets are addressed by `SetId`, never by value, so two identical-looking
//! sets are still distinct. Every edit goes through the board, which
//! reclassifies the sets it touched before putting them back.
//!
//! ## Snapshots
//!
//! Partitions are `im` persistent maps, so `snapshot()` is an O(1) clone
//! that shares structure with the live board. `restore` swaps the old
//! value back in wholesale.

use im::OrdMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{EngineError, EngineResult, Rejected};
use crate::tiles::{SetKind, Side, Tile, TileId, TileSet};

/// Identity of a set on the board.
///
/// Ids are handed out in increasing order and never reused, not even after
/// a `restore`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SetId(pub u32);

impl SetId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Set({})", self.0)
    }
}

/// What `Board::add_tile_set` places.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetSource {
    /// Loose tiles, in order.
    Tiles(Vec<Tile>),
    /// A set built elsewhere.
    Existing(TileSet),
}

impl From<Vec<Tile>> for SetSource {
    fn from(tiles: Vec<Tile>) -> Self {
        SetSource::Tiles(tiles)
    }
}

impl From<TileSet> for SetSource {
    fn from(set: TileSet) -> Self {
        SetSource::Existing(set)
    }
}

/// Saved board state, produced by `Board::snapshot`.
#[derive(Clone, Debug)]
pub struct BoardSnapshot {
    board: Board,
}

impl BoardSnapshot {
    /// The board as it was when the snapshot was taken.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }
}

/// All sets on the table, partitioned by classification.
///
/// ```
/// use rummikub_engine::board::{Board, SetSource};
/// use rummikub_engine::tiles::{Color, SetKind, Tile, TileId};
///
/// let mut board = Board::new();
/// let run = board.add_tile_set(SetSource::Tiles(vec![
///     Tile::new(TileId::new(0), 1, Color::Blue),
///     Tile::new(TileId::new(1), 2, Color::Blue),
///     Tile::new(TileId::new(2), 3, Color::Blue),
/// ])).unwrap();
///
/// assert_eq!(board.kind_of(run), Some(SetKind::Sequence));
/// assert!(board.is_clean());
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "BoardRecord")]
pub struct Board {
    groups: OrdMap<SetId, TileSet>,
    sequences: OrdMap<SetId, TileSet>,
    provisional: OrdMap<SetId, TileSet>,
    next_id: u32,
}

/// Loaded board state. Partition membership is not trusted; every set is
/// classified again.
#[derive(Deserialize)]
struct BoardRecord {
    groups: OrdMap<SetId, TileSet>,
    sequences: OrdMap<SetId, TileSet>,
    provisional: OrdMap<SetId, TileSet>,
    next_id: u32,
}

impl TryFrom<BoardRecord> for Board {
    type Error = EngineError;

    fn try_from(record: BoardRecord) -> EngineResult<Self> {
        let mut board = Board::new();
        let loaded = record
            .groups
            .into_iter()
            .chain(record.sequences)
            .chain(record.provisional);
        for (id, set) in loaded {
            if board.get(id).is_some() {
                return Err(EngineError::DuplicateSet(id));
            }
            board.insert(id, set);
            board.next_id = board.next_id.max(id.0 + 1);
        }
        board.next_id = board.next_id.max(record.next_id);
        Ok(board)
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.groups == other.groups
            && self.sequences == other.sequences
            && self.provisional == other.provisional
    }
}

impl Eq for Board {}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Partitions ===

    #[must_use]
    pub fn groups(&self) -> &OrdMap<SetId, TileSet> {
        &self.groups
    }

    #[must_use]
    pub fn sequences(&self) -> &OrdMap<SetId, TileSet> {
        &self.sequences
    }

    #[must_use]
    pub fn provisional(&self) -> &OrdMap<SetId, TileSet> {
        &self.provisional
    }

    #[must_use]
    pub fn partition(&self, kind: SetKind) -> &OrdMap<SetId, TileSet> {
        match kind {
            SetKind::Group => &self.groups,
            SetKind::Sequence => &self.sequences,
            SetKind::Provisional => &self.provisional,
        }
    }

    fn partition_mut(&mut self, kind: SetKind) -> &mut OrdMap<SetId, TileSet> {
        match kind {
            SetKind::Group => &mut self.groups,
            SetKind::Sequence => &mut self.sequences,
            SetKind::Provisional => &mut self.provisional,
        }
    }

    /// Which partition holds the set.
    #[must_use]
    pub fn kind_of(&self, id: SetId) -> Option<SetKind> {
        [SetKind::Group, SetKind::Sequence, SetKind::Provisional]
            .into_iter()
            .find(|&kind| self.partition(kind).contains_key(&id))
    }

    #[must_use]
    pub fn get(&self, id: SetId) -> Option<&TileSet> {
        self.groups
            .get(&id)
            .or_else(|| self.sequences.get(&id))
            .or_else(|| self.provisional.get(&id))
    }

    /// Every set with its partition, committed groups first.
    pub fn sets(&self) -> impl Iterator<Item = (SetId, SetKind, &TileSet)> {
        tagged(&self.groups, SetKind::Group)
            .chain(tagged(&self.sequences, SetKind::Sequence))
            .chain(tagged(&self.provisional, SetKind::Provisional))
    }

    /// All set ids in ascending order.
    #[must_use]
    pub fn set_ids(&self) -> Vec<SetId> {
        let mut ids: Vec<SetId> = self.sets().map(|(id, _, _)| id).collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn set_count(&self) -> usize {
        self.groups.len() + self.sequences.len() + self.provisional.len()
    }

    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.sets().map(|(_, _, set)| set.size()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set_count() == 0
    }

    /// No provisional sets.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.provisional.is_empty()
    }

    /// Where a tile sits, as set and index.
    #[must_use]
    pub fn find_tile(&self, tile: TileId) -> Option<(SetId, usize)> {
        self.sets().find_map(|(id, _, set)| {
            set.iter().position(|t| t.id() == tile).map(|index| (id, index))
        })
    }

    #[must_use]
    pub fn contains_tile(&self, tile: TileId) -> bool {
        self.sets().any(|(_, _, set)| set.contains(tile))
    }

    // === Internal bookkeeping ===

    fn alloc_id(&mut self) -> SetId {
        let id = SetId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Classify and file a set.
    fn insert(&mut self, id: SetId, set: TileSet) -> SetKind {
        let kind = set.kind();
        self.partition_mut(kind).insert(id, set);
        kind
    }

    /// Pull a set out of whichever partition holds it.
    fn take(&mut self, id: SetId) -> EngineResult<TileSet> {
        let kind = self.kind_of(id).ok_or(EngineError::UnknownSet(id))?;
        self.partition_mut(kind)
            .remove(&id)
            .ok_or(EngineError::UnknownSet(id))
    }

    // === Structural operations ===

    /// Place a set, filing it by its classification.
    ///
    /// An invalid set is not an error; it lands in the provisional
    /// partition. Only an empty tile list is refused.
    pub fn add_tile_set(&mut self, source: SetSource) -> EngineResult<SetId> {
        let set = match source {
            SetSource::Tiles(tiles) => TileSet::new(tiles)?,
            SetSource::Existing(set) => set,
        };
        let id = self.alloc_id();
        self.insert(id, set);
        Ok(id)
    }

    /// Take a set off the board.
    pub fn remove_tile_set(&mut self, id: SetId) -> EngineResult<TileSet> {
        self.take(id)
    }

    /// Replace `left` and `right` with their concatenation.
    ///
    /// Only happens if the concatenation is valid; otherwise the board is
    /// untouched.
    pub fn merge_sets(&mut self, left: SetId, right: SetId) -> EngineResult<SetId> {
        if left == right {
            return Err(EngineError::SameSet(left));
        }
        let a = self.get(left).ok_or(EngineError::UnknownSet(left))?;
        let b = self.get(right).ok_or(EngineError::UnknownSet(right))?;

        let candidate = a.clone().merge_with(b.clone());
        if !candidate.is_valid() {
            return Err(EngineError::InvalidMerge { left, right });
        }

        self.take(left)?;
        self.take(right)?;
        let id = self.alloc_id();
        self.insert(id, candidate);
        Ok(id)
    }

    /// Split a set at `index` into two new sets, `[0, index)` then the rest.
    ///
    /// Both halves are reclassified and may be provisional. A bad index
    /// leaves the set where it was.
    pub fn split_set(&mut self, id: SetId, index: usize) -> EngineResult<(SetId, SetId)> {
        let set = self.take(id)?;
        let size = set.size();

        match set.split_at(index) {
            Ok((left, right)) => {
                let left_id = self.alloc_id();
                self.insert(left_id, left);
                let right_id = self.alloc_id();
                self.insert(right_id, right);
                Ok((left_id, right_id))
            }
            Err(set) => {
                self.insert(id, set);
                Err(EngineError::InvalidSplit { set: id, index, size })
            }
        }
    }

    /// Extend a set with `tile`, only if the result is valid.
    ///
    /// A provisional set that becomes valid moves to its committed
    /// partition. On rejection the tile is handed back.
    pub fn append_tile(&mut self, id: SetId, side: Side, tile: Tile) -> Result<(), Rejected> {
        let mut set = match self.take(id) {
            Ok(set) => set,
            Err(error) => return Err(Rejected::new(tile, error)),
        };

        let result = set.append_tile(side, tile);
        self.insert(id, set);
        result.map_err(|tile| Rejected::new(tile, EngineError::InvalidAppend { set: id }))
    }

    /// Move one tile from one set to an end of another, without validating.
    ///
    /// Both sets are reclassified. A source set left empty disappears.
    /// `from == to` reorders the tile within the set.
    pub fn move_tile(&mut self, from: SetId, index: usize, to: SetId, side: Side) -> EngineResult<()> {
        let source = self.get(from).ok_or(EngineError::UnknownSet(from))?;
        if index >= source.size() {
            return Err(EngineError::TileIndexOutOfRange {
                set: from,
                index,
                size: source.size(),
            });
        }
        if self.get(to).is_none() {
            return Err(EngineError::UnknownSet(to));
        }

        if from == to {
            let mut set = self.take(from)?;
            if let Some(tile) = set.take_tile(index) {
                set.push(side, tile);
            }
            self.insert(from, set);
            return Ok(());
        }

        let tile = self.take_tile(from, index)?;
        let mut target = self.take(to)?;
        target.push(side, tile);
        self.insert(to, target);
        Ok(())
    }

    /// Remove and return the tile at `index`. A set left empty disappears.
    pub fn take_tile(&mut self, id: SetId, index: usize) -> EngineResult<Tile> {
        let set = self.get(id).ok_or(EngineError::UnknownSet(id))?;
        let size = set.size();
        if index >= size {
            return Err(EngineError::TileIndexOutOfRange { set: id, index, size });
        }

        let mut set = self.take(id)?;
        if size == 1 {
            let tiles = set.into_tiles();
            return tiles
                .into_iter()
                .next()
                .ok_or(EngineError::TileIndexOutOfRange { set: id, index, size });
        }

        let tile = set
            .take_tile(index)
            .ok_or(EngineError::TileIndexOutOfRange { set: id, index, size });
        self.insert(id, set);
        tile
    }

    /// Swap `tile` for a joker in the set that it can stand in for.
    ///
    /// Returns the freed joker. On rejection the tile is handed back.
    pub fn replace_joker(&mut self, id: SetId, tile: Tile) -> Result<Tile, Rejected> {
        let mut set = match self.take(id) {
            Ok(set) => set,
            Err(error) => return Err(Rejected::new(tile, error)),
        };

        let result = set.replace_joker(tile);
        self.insert(id, set);
        result.map_err(|tile| Rejected::new(tile, EngineError::NoMatchingJoker { set: id }))
    }

    // === Transactions ===

    /// Capture the whole board.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot { board: self.clone() }
    }

    /// Put a snapshot back in place of the live board.
    ///
    /// Set ids issued since the snapshot are not reissued.
    pub fn restore(&mut self, snapshot: BoardSnapshot) {
        let next_id = self.next_id.max(snapshot.board.next_id);
        *self = snapshot.board;
        self.next_id = next_id;
    }

    /// Empty the provisional partition, returning what was in it.
    ///
    /// Meant for after a successful commit, when there is nothing left in
    /// it; discarding provisional sets is not a rollback.
    pub fn clear_provisional(&mut self) -> OrdMap<SetId, TileSet> {
        std::mem::take(&mut self.provisional)
    }
}

fn tagged(
    partition: &OrdMap<SetId, TileSet>,
    kind: SetKind,
) -> impl Iterator<Item = (SetId, SetKind, &TileSet)> {
    partition.iter().map(move |(id, set)| (*id, kind, set))
}
