//! The turn manager.
//!
//! `Game` seats the players, owns the board and the pile, and runs turns:
//!
//! 1. `begin_turn` advances to the next player and snapshots board and hand
//! 2. the player applies moves (`place_set`, `append_from_hand`, ...)
//! 3. `end_turn` commits the board, or rolls it back and draws a tile
//!
//! ## Opening meld
//!
//! Until a player has committed a turn placing at least
//! `OPENING_MELD_POINTS` from their hand, they may only touch sets made
//! entirely of tiles they placed this turn.
//!
//! ## Game end
//!
//! A player who empties their hand on a committed turn wins. Once the pile
//! is exhausted, a full round of turns without a commit ends the match as a
//! draw.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::turn::{DrawResult, RollbackReason, TurnOutcome, TurnState};
use super::view::{GameView, PlayerView};
use crate::board::{Board, SetId, SetSource};
use crate::bot::MovePolicy;
use crate::core::action::{Move, TurnRecord};
use crate::core::config::{GameConfig, HAND_SIZE, OPENING_MELD_POINTS};
use crate::core::error::{EngineError, EngineResult, Rejected};
use crate::core::player::{Player, PlayerId, PlayerMap};
use crate::core::rng::GameRng;
use crate::tiles::{DrawPile, Side, Tile, TileId};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Emptied their hand.
    Winner(PlayerId),
    /// Pile ran out and nobody could place.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Draw => false,
        }
    }
}

/// A match in progress.
#[derive(Clone, Debug)]
pub struct Game {
    players: PlayerMap<Player>,
    board: Board,
    pile: DrawPile,
    /// Tiles in play; never changes after construction.
    tile_total: usize,
    active: Option<PlayerId>,
    turn: Option<TurnState>,
    turn_number: u32,
    dealt: bool,
    seating_rng: GameRng,
    policy_rng: GameRng,
    history: Vector<TurnRecord>,
    result: Option<GameResult>,
    /// Consecutive turns that found the pile empty and committed nothing.
    starved_turns: usize,
    max_moves_per_turn: usize,
}

impl Game {
    /// Seat the configured players over a freshly shuffled deck.
    pub fn new(config: GameConfig) -> EngineResult<Self> {
        config.validate()?;
        let mut deck_rng = GameRng::new(config.seed).for_context("deck");
        let pile = DrawPile::shuffled(&mut deck_rng);
        Self::with_pile(config, pile)
    }

    /// Seat the configured players over a pile in a known order.
    pub fn with_pile(config: GameConfig, pile: DrawPile) -> EngineResult<Self> {
        config.validate()?;
        let root = GameRng::new(config.seed);

        let players = PlayerMap::from_values(
            config
                .players
                .iter()
                .map(|seat| Player::new(seat.name.clone(), seat.is_automated))
                .collect(),
        );
        let count = players.player_count();
        let active = config
            .starting_seat()
            .map(|seat| PlayerId::new(seat as u8).previous(count));

        Ok(Self {
            players,
            board: Board::new(),
            tile_total: pile.len(),
            pile,
            active,
            turn: None,
            turn_number: 0,
            dealt: false,
            seating_rng: root.for_context("seating"),
            policy_rng: root.for_context("policy"),
            history: Vector::new(),
            result: None,
            starved_turns: 0,
            max_moves_per_turn: config.max_moves_per_turn,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// The player whose turn it is, or was last.
    #[must_use]
    pub fn active_player(&self) -> Option<PlayerId> {
        self.active
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn pile(&self) -> &DrawPile {
        &self.pile
    }

    #[must_use]
    pub fn pile_size(&self) -> usize {
        self.pile.len()
    }

    #[must_use]
    pub fn turn(&self) -> Option<&TurnState> {
        self.turn.as_ref()
    }

    /// Resolved turns so far.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub fn is_dealt(&self) -> bool {
        self.dealt
    }

    #[must_use]
    pub fn history(&self) -> &Vector<TurnRecord> {
        &self.history
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    // === Setup and rotation ===

    /// Deal `HAND_SIZE` tiles to every player, in seat order.
    pub fn deal(&mut self) -> EngineResult<()> {
        if self.dealt {
            return Err(EngineError::AlreadyDealt);
        }

        let needed = HAND_SIZE * self.players.player_count();
        if self.pile.len() < needed {
            return Err(EngineError::PileExhausted {
                requested: needed,
                remaining: self.pile.len(),
            });
        }

        for (_, player) in self.players.iter_mut() {
            player.receive_all(self.pile.draw(HAND_SIZE)?);
        }
        self.dealt = true;
        Ok(())
    }

    /// Advance the active player.
    ///
    /// The first call picks a random player unless a starting player was
    /// configured. `begin_turn` calls this; drivers only need it to skip a
    /// seat.
    pub fn next_player(&mut self) -> EngineResult<PlayerId> {
        if self.turn.is_some() {
            return Err(EngineError::TurnInProgress);
        }

        let count = self.players.player_count();
        let next = match self.active {
            Some(current) => current.next(count),
            None => PlayerId::new(self.seating_rng.gen_range_usize(0..count) as u8),
        };
        self.active = Some(next);
        Ok(next)
    }

    /// Start the next player's turn.
    pub fn begin_turn(&mut self) -> EngineResult<PlayerId> {
        if self.result.is_some() {
            return Err(EngineError::GameOver);
        }
        if !self.dealt {
            return Err(EngineError::NotDealt);
        }

        let player = self.next_player()?;
        let hand_before = self.players[player].hand().clone();
        self.turn = Some(TurnState::new(player, self.board.snapshot(), hand_before));
        Ok(player)
    }

    // === Moves ===

    fn current_turn(&self) -> EngineResult<&TurnState> {
        self.turn.as_ref().ok_or(EngineError::NoTurnInProgress)
    }

    fn current_turn_mut(&mut self) -> EngineResult<&mut TurnState> {
        self.turn.as_mut().ok_or(EngineError::NoTurnInProgress)
    }

    /// Opening-meld gate for a move touching `set`.
    fn check_may_touch(&self, set: SetId) -> EngineResult<()> {
        let turn = self.current_turn()?;
        let tiles = self.board.get(set).ok_or(EngineError::UnknownSet(set))?;

        if self.players[turn.player()].has_placed_opening_meld()
            || tiles.tile_ids().all(|id| turn.placed_this_turn(id))
        {
            Ok(())
        } else {
            Err(EngineError::OpeningMeldRequired { player: turn.player() })
        }
    }

    /// Lay hand tiles down as a new set. It may be provisional.
    pub fn place_set(&mut self, tiles: &[TileId]) -> EngineResult<SetId> {
        let player = self.current_turn()?.player();
        if tiles.is_empty() {
            return Err(EngineError::EmptySet);
        }

        let mut seen = FxHashSet::default();
        for &id in tiles {
            if !seen.insert(id) || !self.players[player].holds(id) {
                return Err(EngineError::TileNotInHand(id));
            }
        }

        let hand = self.players.get_mut(player);
        let taken: Vec<Tile> = tiles
            .iter()
            .filter_map(|&id| hand.take_tile(id).map(|(_, tile)| tile))
            .collect();
        let set = self.board.add_tile_set(SetSource::Tiles(taken))?;

        let turn = self.current_turn_mut()?;
        for &id in tiles {
            turn.note_placed(id);
        }
        turn.record(Move::place_set(tiles));
        Ok(set)
    }

    /// Extend a board set with a hand tile. The result must be valid.
    pub fn append_from_hand(&mut self, set: SetId, side: Side, tile: TileId) -> EngineResult<()> {
        let player = self.current_turn()?.player();
        self.check_may_touch(set)?;

        let (index, owned) = self.players[player]
            .take_tile(tile)
            .ok_or(EngineError::TileNotInHand(tile))?;
        if let Err(Rejected { tile: owned, error }) = self.board.append_tile(set, side, owned) {
            self.players[player].return_tile(index, owned);
            return Err(error);
        }

        let turn = self.current_turn_mut()?;
        turn.note_placed(tile);
        turn.record(Move::Append { set, side, tile });
        Ok(())
    }

    pub fn split_set(&mut self, set: SetId, index: usize) -> EngineResult<(SetId, SetId)> {
        self.check_may_touch(set)?;
        let halves = self.board.split_set(set, index)?;
        self.current_turn_mut()?.record(Move::Split { set, index });
        Ok(halves)
    }

    pub fn merge_sets(&mut self, left: SetId, right: SetId) -> EngineResult<SetId> {
        self.check_may_touch(left)?;
        self.check_may_touch(right)?;
        let merged = self.board.merge_sets(left, right)?;
        self.current_turn_mut()?.record(Move::Merge { left, right });
        Ok(merged)
    }

    /// Move a tile between board sets, leaving validation to `end_turn`.
    pub fn move_tile(&mut self, from: SetId, index: usize, to: SetId, side: Side) -> EngineResult<()> {
        self.check_may_touch(from)?;
        self.check_may_touch(to)?;
        self.board.move_tile(from, index, to, side)?;
        self.current_turn_mut()?.record(Move::MoveTile { from, index, to, side });
        Ok(())
    }

    /// Swap a hand tile for the joker standing in for it. The joker goes to
    /// the hand and has to be played again before the turn ends.
    pub fn replace_joker(&mut self, set: SetId, tile: TileId) -> EngineResult<TileId> {
        let player = self.current_turn()?.player();
        self.check_may_touch(set)?;

        let (index, owned) = self.players[player]
            .take_tile(tile)
            .ok_or(EngineError::TileNotInHand(tile))?;
        let joker = match self.board.replace_joker(set, owned) {
            Ok(joker) => joker,
            Err(Rejected { tile: owned, error }) => {
                self.players[player].return_tile(index, owned);
                return Err(error);
            }
        };

        let joker_id = joker.id();
        self.players[player].receive(joker);

        let turn = self.current_turn_mut()?;
        turn.note_placed(tile);
        turn.note_returned(joker_id);
        turn.record(Move::ReplaceJoker { set, tile });
        Ok(joker_id)
    }

    /// Take back a tile placed from the hand earlier this turn.
    pub fn retract_tile(&mut self, set: SetId, index: usize) -> EngineResult<TileId> {
        let turn = self.current_turn()?;
        let player = turn.player();
        let tiles = self.board.get(set).ok_or(EngineError::UnknownSet(set))?;
        let tile_id = tiles
            .get(index)
            .map(Tile::id)
            .ok_or(EngineError::TileIndexOutOfRange { set, index, size: tiles.size() })?;
        if !turn.placed_this_turn(tile_id) {
            return Err(EngineError::TileNotRetractable(tile_id));
        }

        let tile = self.board.take_tile(set, index)?;
        self.players[player].receive(tile);

        let turn = self.current_turn_mut()?;
        turn.note_returned(tile_id);
        turn.record(Move::Retract { set, index });
        Ok(tile_id)
    }

    /// Apply a move for the active player. `EndTurn` resolves the turn and
    /// returns its outcome.
    pub fn apply_move(&mut self, mv: &Move) -> EngineResult<Option<TurnOutcome>> {
        match mv {
            Move::PlaceSet { tiles } => self.place_set(tiles).map(|_| None),
            Move::Append { set, side, tile } => self.append_from_hand(*set, *side, *tile).map(|()| None),
            Move::Split { set, index } => self.split_set(*set, *index).map(|_| None),
            Move::Merge { left, right } => self.merge_sets(*left, *right).map(|_| None),
            Move::MoveTile { from, index, to, side } => {
                self.move_tile(*from, *index, *to, *side).map(|()| None)
            }
            Move::ReplaceJoker { set, tile } => self.replace_joker(*set, *tile).map(|_| None),
            Move::Retract { set, index } => self.retract_tile(*set, *index).map(|_| None),
            Move::EndTurn => self.end_turn().map(Some),
        }
    }

    // === Resolution ===

    /// Resolve the turn in progress.
    ///
    /// Rolls back and draws if provisional sets remain, a borrowed joker is
    /// still in hand, or an opening meld falls short. A turn that placed
    /// nothing draws. Anything else commits.
    pub fn end_turn(&mut self) -> EngineResult<TurnOutcome> {
        let turn = self.turn.take().ok_or(EngineError::NoTurnInProgress)?;
        let player = turn.player();

        let rollback = if !self.board.is_clean() {
            Some(RollbackReason::UnresolvedSets)
        } else if turn.has_borrowed() {
            Some(RollbackReason::BorrowedTilesInHand)
        } else if turn.placed_count() > 0 && !self.players[player].has_placed_opening_meld() {
            let points = self.placed_points(&turn);
            (points < OPENING_MELD_POINTS).then_some(RollbackReason::OpeningMeldTooLow { points })
        } else {
            None
        };

        let outcome = match rollback {
            Some(reason) => {
                self.undo(turn);
                TurnOutcome::RolledBack {
                    reason,
                    draw: self.draw_for(player),
                }
            }
            None if turn.placed_count() == 0 => {
                self.undo(turn);
                TurnOutcome::Drew(self.draw_for(player))
            }
            None => self.commit(&turn),
        };

        self.finish(player, outcome);
        Ok(outcome)
    }

    /// Drop the turn in progress without drawing. The same player is up
    /// again on the next `begin_turn`.
    pub fn abandon_turn(&mut self) -> EngineResult<()> {
        let turn = self.turn.take().ok_or(EngineError::NoTurnInProgress)?;
        let player = turn.player();
        self.undo(turn);
        self.active = Some(player.previous(self.players.player_count()));
        Ok(())
    }

    /// Let `policy` play the active turn, beginning one if needed.
    ///
    /// Moves are requested until the policy stops, proposes `EndTurn`, a
    /// move is rejected, or the per-turn cap is reached.
    pub fn play_automated_turn<P: MovePolicy + ?Sized>(&mut self, policy: &mut P) -> EngineResult<TurnOutcome> {
        if self.turn.is_none() {
            self.begin_turn()?;
        }

        let mut rng = self.policy_rng.fork();
        for _ in 0..self.max_moves_per_turn {
            let Some(mv) = policy.propose_move(&self.view(), &mut rng) else {
                break;
            };
            if mv.is_end_turn() || self.apply_move(&mv).is_err() {
                break;
            }
        }

        self.end_turn()
    }

    /// Points placed from the hand this turn, jokers at their bound value.
    fn placed_points(&self, turn: &TurnState) -> u32 {
        self.board
            .sets()
            .map(|(_, _, set)| set.points_of(|id| turn.placed_this_turn(id)))
            .sum()
    }

    fn undo(&mut self, turn: TurnState) {
        let player = turn.player();
        let (board, hand) = turn.into_undo();
        self.board.restore(board);
        self.players[player].replace_hand(hand);
    }

    fn commit(&mut self, turn: &TurnState) -> TurnOutcome {
        self.board.clear_provisional();

        let player = &mut self.players[turn.player()];
        let opened = !player.has_placed_opening_meld();
        if opened {
            player.mark_opened();
        }

        TurnOutcome::Committed {
            tiles_placed: turn.placed_count(),
            opened,
        }
    }

    fn draw_for(&mut self, player: PlayerId) -> DrawResult {
        match self.pile.draw_one() {
            Ok(tile) => {
                let id = tile.id();
                self.players[player].receive(tile);
                DrawResult::Drawn(id)
            }
            Err(_) => DrawResult::PileExhausted,
        }
    }

    fn finish(&mut self, player: PlayerId, outcome: TurnOutcome) {
        self.turn_number += 1;
        self.history
            .push_back(TurnRecord::new(self.turn_number, player, outcome));

        if outcome.is_committed() {
            self.starved_turns = 0;
            if self.players[player].hand().is_empty() {
                self.result = Some(GameResult::Winner(player));
            }
        } else if outcome.hit_empty_pile() {
            self.starved_turns += 1;
            if self.starved_turns >= self.players.player_count() {
                self.result = Some(GameResult::Draw);
            }
        } else {
            self.starved_turns = 0;
        }
    }

    // === Views and checks ===

    /// Everything, every hand included.
    #[must_use]
    pub fn view(&self) -> GameView<'_> {
        self.build_view(None)
    }

    /// What `viewer` may see: their own hand and only the sizes of others.
    #[must_use]
    pub fn view_for(&self, viewer: PlayerId) -> GameView<'_> {
        self.build_view(Some(viewer))
    }

    fn build_view(&self, viewer: Option<PlayerId>) -> GameView<'_> {
        let players = self
            .players
            .iter()
            .map(|(id, player)| PlayerView {
                id,
                name: player.name(),
                hand: viewer.map_or(true, |v| v == id).then(|| player.hand()),
                hand_size: player.hand_size(),
                has_placed_opening_meld: player.has_placed_opening_meld(),
                is_automated: player.is_automated(),
            })
            .collect();

        GameView {
            viewer,
            active_player: self.active,
            turn_in_progress: self.turn.is_some(),
            turn_number: self.turn_number,
            board: &self.board,
            pile_size: self.pile.len(),
            players,
            result: self.result.as_ref(),
        }
    }

    /// Tiles across pile, hands and board.
    #[must_use]
    pub fn tile_total(&self) -> usize {
        self.pile.len()
            + self.players.iter().map(|(_, p)| p.hand_size()).sum::<usize>()
            + self.board.tile_count()
    }

    /// Every tile is in exactly one place and none went missing.
    #[must_use]
    pub fn check_conservation(&self) -> bool {
        let mut seen = FxHashSet::default();
        let all = self
            .pile
            .iter()
            .chain(self.players.iter().flat_map(|(_, p)| p.hand().iter()))
            .chain(self.board.sets().flat_map(|(_, _, set)| set.iter()));

        for tile in all {
            if !seen.insert(tile.id()) {
                return false;
            }
        }
        seen.len() == self.tile_total
    }
}
