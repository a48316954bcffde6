//! Move policies for automated players.
//!
//! The engine only asks a policy for its next move; how the policy decides
//! is its own business:
//! - `EndTurnPolicy`: never plays, so the player always draws
//! - `UniformMeldPolicy`: picks uniformly among simple melds from the hand

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::action::Move;
use crate::core::config::OPENING_MELD_POINTS;
use crate::core::rng::GameRng;
use crate::rules::GameView;
use crate::tiles::{Color, Side, Tile, TileId, TileSet};

/// Proposes moves for the active player.
pub trait MovePolicy {
    /// Next move for the active player in `view`.
    ///
    /// `None` or `Move::EndTurn` ends the turn.
    fn propose_move(&mut self, view: &GameView<'_>, rng: &mut GameRng) -> Option<Move>;
}

/// Always ends the turn.
#[derive(Clone, Debug, Default)]
pub struct EndTurnPolicy;

impl MovePolicy for EndTurnPolicy {
    fn propose_move(&mut self, _view: &GameView<'_>, _rng: &mut GameRng) -> Option<Move> {
        Some(Move::EndTurn)
    }
}

/// Uniform random choice among simple melds.
///
/// Candidates are groups and runs formed from numbered hand tiles and, once
/// the player has opened, single-tile extensions of board sets. Before
/// opening only melds worth the opening threshold on their own are played.
/// Jokers are kept in hand.
#[derive(Clone, Debug, Default)]
pub struct UniformMeldPolicy;

impl MovePolicy for UniformMeldPolicy {
    fn propose_move(&mut self, view: &GameView<'_>, rng: &mut GameRng) -> Option<Move> {
        let active = view.active_player()?;
        let hand = view.active_hand()?;
        let opened = view.player(active)?.has_placed_opening_meld;

        let tiles: Vec<&Tile> = hand.iter().collect();
        let mut candidates: Vec<Move> = hand_melds(&tiles)
            .into_iter()
            .filter(|(_, points)| opened || *points >= OPENING_MELD_POINTS)
            .map(|(ids, _)| Move::PlaceSet { tiles: ids })
            .collect();

        if opened {
            for (set_id, kind, set) in view.board().sets() {
                if !kind.is_valid() {
                    continue;
                }
                for tile in tiles.iter().filter(|t| !t.is_joker()) {
                    for side in [Side::Left, Side::Right] {
                        if extends(set, side, tile) {
                            candidates.push(Move::Append {
                                set: set_id,
                                side,
                                tile: tile.id(),
                            });
                        }
                    }
                }
            }
        }

        rng.choose(&candidates).cloned()
    }
}

fn extends(set: &TileSet, side: Side, tile: &Tile) -> bool {
    let mut candidate = set.clone();
    candidate.append_tile(side, tile.clone()).is_ok()
}

/// Groups and maximal runs in a hand, with their point values.
fn hand_melds(hand: &[&Tile]) -> Vec<(SmallVec<[TileId; 4]>, u32)> {
    let mut melds = Vec::new();

    // One tile per (number, colour); duplicates add nothing to a meld.
    let mut by_face: FxHashMap<(u8, Color), TileId> = FxHashMap::default();
    for tile in hand {
        if let (Some(number), Some(color)) = (tile.number(), tile.color()) {
            by_face.entry((number, color)).or_insert(tile.id());
        }
    }

    for number in 1..=13u8 {
        let ids: SmallVec<[TileId; 4]> = Color::ALL
            .iter()
            .filter_map(|&color| by_face.get(&(number, color)).copied())
            .collect();
        if ids.len() >= 3 {
            melds.push((ids.clone(), u32::from(number) * ids.len() as u32));
        }
    }

    for color in Color::ALL {
        let mut run: SmallVec<[TileId; 4]> = SmallVec::new();
        let mut points = 0;
        for number in 1..=14u8 {
            match by_face.get(&(number, color)) {
                Some(&id) => {
                    run.push(id);
                    points += u32::from(number);
                }
                None => {
                    if run.len() >= 3 {
                        melds.push((std::mem::take(&mut run), points));
                    }
                    run.clear();
                    points = 0;
                }
            }
        }
    }

    melds
}
