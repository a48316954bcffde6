//! The draw pile.
//!
//! Built once per match from the full deck, shuffled once, then consumed
//! from the front. It only ever shrinks.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::tile::{build_deck, Tile};
use crate::core::error::{EngineError, EngineResult};
use crate::core::rng::GameRng;

/// Undealt tiles, front first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawPile {
    tiles: VecDeque<Tile>,
}

impl DrawPile {
    /// The full 106-tile deck in random order.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng) -> Self {
        let mut tiles = build_deck();
        rng.shuffle(&mut tiles);
        Self::from_tiles(tiles)
    }

    /// A pile with a known order, first element drawn first.
    #[must_use]
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Self {
        Self {
            tiles: tiles.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The tile the next draw would return.
    #[must_use]
    pub fn peek(&self) -> Option<&Tile> {
        self.tiles.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Remove the first `count` tiles.
    ///
    /// All or nothing: if fewer than `count` remain the pile is untouched and
    /// `PileExhausted` is returned.
    pub fn draw(&mut self, count: usize) -> EngineResult<Vec<Tile>> {
        if self.tiles.len() < count {
            return Err(EngineError::PileExhausted {
                requested: count,
                remaining: self.tiles.len(),
            });
        }
        Ok(self.tiles.drain(..count).collect())
    }

    /// Remove the first tile.
    pub fn draw_one(&mut self) -> EngineResult<Tile> {
        self.tiles.pop_front().ok_or(EngineError::PileExhausted {
            requested: 1,
            remaining: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{Color, TileId, DECK_SIZE};

    #[test]
    fn test_shuffled_pile_is_full_deck() {
        let mut rng = GameRng::new(42);
        let pile = DrawPile::shuffled(&mut rng);
        assert_eq!(pile.len(), DECK_SIZE);

        let mut ids: Vec<_> = pile.iter().map(|t| t.id().raw()).collect();
        assert_ne!(ids, (0..DECK_SIZE as u8).collect::<Vec<_>>());
        ids.sort_unstable();
        assert_eq!(ids, (0..DECK_SIZE as u8).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_order() {
        let a = DrawPile::shuffled(&mut GameRng::new(5));
        let b = DrawPile::shuffled(&mut GameRng::new(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_draw_from_front() {
        let mut pile = DrawPile::from_tiles((1..=5).map(|n| Tile::new(TileId(n), n, Color::Red)));

        let drawn = pile.draw(2).unwrap();
        assert_eq!(drawn.iter().map(|t| t.number()).collect::<Vec<_>>(), vec![Some(1), Some(2)]);
        assert_eq!(pile.peek().and_then(Tile::number), Some(3));

        let one = pile.draw_one().unwrap();
        assert_eq!(one.number(), Some(3));
        assert_eq!(pile.len(), 2);
    }

    #[test]
    fn test_draw_too_many_is_all_or_nothing() {
        let mut pile = DrawPile::from_tiles((1..=3).map(|n| Tile::new(TileId(n), n, Color::Blue)));

        assert_eq!(
            pile.draw(4),
            Err(EngineError::PileExhausted { requested: 4, remaining: 3 })
        );
        assert_eq!(pile.len(), 3);
    }

    #[test]
    fn test_draw_one_from_empty() {
        let mut pile = DrawPile::default();
        assert!(pile.is_empty());
        assert_eq!(
            pile.draw_one(),
            Err(EngineError::PileExhausted { requested: 1, remaining: 0 })
        );
    }
}
