//! Turn flow tests.
//!
//! These tests deal from a rigged pile so that each player's hand is known,
//! then walk through whole turns: commits, rollbacks, the opening meld,
//! jokers and the end of the match.

use rummikub_engine::bot::{EndTurnPolicy, UniformMeldPolicy};
use rummikub_engine::core::{EngineError, GameConfig, PlayerId, HAND_SIZE};
use rummikub_engine::rules::{DrawResult, Game, GameResult, RollbackReason, TurnOutcome};
use rummikub_engine::tiles::{build_deck, deck_tile_id, Color, DrawPile, SetKind, Side, Tile, TileId};

const ANA: PlayerId = PlayerId::new(0);
const BOB: PlayerId = PlayerId::new(1);
const JOKER: TileId = TileId::new(104);

fn id(number: u8, color: Color) -> TileId {
    deck_tile_id(number, color, 0).unwrap()
}

/// Pile that deals each listed hand first, padded to a full hand from the
/// front of the remaining deck.
fn rigged_pile(hands: &[&[TileId]]) -> DrawPile {
    let reserved: Vec<TileId> = hands.iter().flat_map(|hand| hand.iter().copied()).collect();
    let (mut picked, mut rest): (Vec<Tile>, Vec<Tile>) =
        build_deck().into_iter().partition(|t| reserved.contains(&t.id()));

    let mut order = Vec::new();
    for hand in hands {
        for wanted in hand.iter() {
            let pos = picked.iter().position(|t| t.id() == *wanted).unwrap();
            order.push(picked.remove(pos));
        }
        for _ in hand.len()..HAND_SIZE {
            order.push(rest.remove(0));
        }
    }
    order.extend(rest);
    DrawPile::from_tiles(order)
}

fn two_player_game(ana: &[TileId], bob: &[TileId]) -> Game {
    let config = GameConfig::new(1)
        .with_player("ana")
        .with_player("bob")
        .with_starting_player("ana");
    let mut game = Game::with_pile(config, rigged_pile(&[ana, bob])).unwrap();
    game.deal().unwrap();
    game
}

fn next_draw(game: &Game) -> DrawResult {
    game.pile()
        .peek()
        .map_or(DrawResult::PileExhausted, |t| DrawResult::Drawn(t.id()))
}

/// Play an empty turn for whoever is next.
fn pass(game: &mut Game) {
    game.begin_turn().unwrap();
    assert!(matches!(game.end_turn().unwrap(), TurnOutcome::Drew(_)));
}

/// Test that a run worth 33 points opens and commits.
#[test]
fn test_opening_meld_commits() {
    let run = [id(10, Color::Red), id(11, Color::Red), id(12, Color::Red)];
    let mut game = two_player_game(&run, &[]);

    assert_eq!(game.begin_turn(), Ok(ANA));
    let set = game.place_set(&run).unwrap();
    let outcome = game.end_turn().unwrap();

    assert_eq!(outcome, TurnOutcome::Committed { tiles_placed: 3, opened: true });
    assert!(game.player(ANA).has_placed_opening_meld());
    assert_eq!(game.player(ANA).hand_size(), HAND_SIZE - 3);
    assert_eq!(game.board().kind_of(set), Some(SetKind::Sequence));
    assert!(game.board().is_clean());
    assert!(game.check_conservation());
    assert_eq!(game.history()[0].outcome, outcome);
}

/// Test that an opening worth less than 30 is rolled back and drawn for.
#[test]
fn test_low_opening_rolls_back() {
    let run = [id(1, Color::Blue), id(2, Color::Blue), id(3, Color::Blue)];
    let mut game = two_player_game(&run, &[]);

    game.begin_turn().unwrap();
    game.place_set(&run).unwrap();
    let draw = next_draw(&game);
    let outcome = game.end_turn().unwrap();

    assert_eq!(
        outcome,
        TurnOutcome::RolledBack {
            reason: RollbackReason::OpeningMeldTooLow { points: 6 },
            draw,
        }
    );
    assert!(game.board().is_empty());
    assert!(!game.player(ANA).has_placed_opening_meld());
    assert_eq!(game.player(ANA).hand_size(), HAND_SIZE + 1);
    assert!(run.iter().all(|&t| game.player(ANA).holds(t)));
    assert!(game.check_conservation());
}

/// Test that a turn ending with provisional sets restores board and hand.
#[test]
fn test_unresolved_sets_roll_back() {
    let pair = [id(10, Color::Red), id(11, Color::Red)];
    let mut game = two_player_game(&pair, &[]);
    let before: Vec<TileId> = game.player(ANA).hand().iter().map(Tile::id).collect();

    game.begin_turn().unwrap();
    game.place_set(&pair).unwrap();
    assert!(!game.board().is_clean());
    let draw = next_draw(&game);

    assert_eq!(
        game.end_turn().unwrap(),
        TurnOutcome::RolledBack { reason: RollbackReason::UnresolvedSets, draw }
    );
    assert!(game.board().is_empty());

    let after: Vec<TileId> = game.player(ANA).hand().iter().map(Tile::id).collect();
    assert_eq!(&after[..HAND_SIZE], &before[..]);
    assert_eq!(draw.tile(), after.last().copied());
}

/// Test that a player who has not opened cannot touch board tiles.
#[test]
fn test_gate_blocks_board_tiles_before_opening() {
    let run = [id(10, Color::Red), id(11, Color::Red), id(12, Color::Red)];
    let thirteen = id(13, Color::Red);
    let mut game = two_player_game(&run, &[thirteen]);

    game.begin_turn().unwrap();
    let set = game.place_set(&run).unwrap();
    game.end_turn().unwrap();

    assert_eq!(game.begin_turn(), Ok(BOB));
    assert_eq!(
        game.append_from_hand(set, Side::Right, thirteen),
        Err(EngineError::OpeningMeldRequired { player: BOB })
    );
    assert_eq!(game.split_set(set, 1), Err(EngineError::OpeningMeldRequired { player: BOB }));
    assert!(game.player(BOB).holds(thirteen));
    assert_eq!(game.player(BOB).hand_size(), HAND_SIZE);
    assert!(matches!(game.end_turn().unwrap(), TurnOutcome::Drew(_)));
}

/// Test that an opened player may extend a board set.
#[test]
fn test_extend_after_opening() {
    let run = [id(10, Color::Red), id(11, Color::Red), id(12, Color::Red)];
    let thirteen = id(13, Color::Red);
    let mut game = two_player_game(&[run[0], run[1], run[2], thirteen], &[]);

    game.begin_turn().unwrap();
    let set = game.place_set(&run).unwrap();
    game.end_turn().unwrap();
    pass(&mut game);

    game.begin_turn().unwrap();
    game.append_from_hand(set, Side::Right, thirteen).unwrap();
    assert_eq!(
        game.end_turn().unwrap(),
        TurnOutcome::Committed { tiles_placed: 1, opened: false }
    );
    assert_eq!(game.board().get(set).map(|s| s.size()), Some(4));
}

/// Test that a rejected append hands the tile back in place.
#[test]
fn test_rejected_append_keeps_hand() {
    let run = [id(10, Color::Red), id(11, Color::Red), id(12, Color::Red)];
    let stray = id(5, Color::Blue);
    let mut game = two_player_game(&[run[0], run[1], run[2], stray], &[]);

    game.begin_turn().unwrap();
    let set = game.place_set(&run).unwrap();
    let hand: Vec<TileId> = game.player(ANA).hand().iter().map(Tile::id).collect();

    assert_eq!(
        game.append_from_hand(set, Side::Left, stray),
        Err(EngineError::InvalidAppend { set })
    );
    let after: Vec<TileId> = game.player(ANA).hand().iter().map(Tile::id).collect();
    assert_eq!(after, hand);
}

/// Test splitting, moving and regrouping board tiles in one turn.
#[test]
fn test_rearrange_board_after_opening() {
    let blacks = [id(10, Color::Black), id(11, Color::Black), id(12, Color::Black), id(13, Color::Black)];
    let tens = [id(10, Color::Orange), id(10, Color::Blue)];
    let mut game = two_player_game(&[blacks[0], blacks[1], blacks[2], blacks[3], tens[0], tens[1]], &[]);

    game.begin_turn().unwrap();
    let run = game.place_set(&blacks).unwrap();
    game.end_turn().unwrap();
    pass(&mut game);

    game.begin_turn().unwrap();
    let (single, rest) = game.split_set(run, 1).unwrap();
    let pair = game.place_set(&tens).unwrap();
    game.move_tile(single, 0, pair, Side::Right).unwrap();

    assert!(game.board().get(single).is_none());
    assert_eq!(game.board().kind_of(pair), Some(SetKind::Group));
    assert_eq!(game.board().kind_of(rest), Some(SetKind::Sequence));
    assert_eq!(
        game.end_turn().unwrap(),
        TurnOutcome::Committed { tiles_placed: 2, opened: false }
    );
    assert!(game.check_conservation());
}

/// Test that a joker taken from the board must be played again.
#[test]
fn test_borrowed_joker_must_be_replayed() {
    let meld = [id(9, Color::Black), JOKER, id(11, Color::Black)];
    let ten = id(10, Color::Black);
    let oranges = [id(5, Color::Orange), id(6, Color::Orange)];
    let mut game = two_player_game(&[meld[0], meld[1], meld[2], ten, oranges[0], oranges[1]], &[]);

    game.begin_turn().unwrap();
    let set = game.place_set(&meld).unwrap();
    assert_eq!(
        game.end_turn().unwrap(),
        TurnOutcome::Committed { tiles_placed: 3, opened: true }
    );
    pass(&mut game);

    // Keeping the joker is not allowed.
    game.begin_turn().unwrap();
    assert_eq!(game.replace_joker(set, ten), Ok(JOKER));
    assert!(game.player(ANA).holds(JOKER));
    assert!(matches!(
        game.end_turn().unwrap(),
        TurnOutcome::RolledBack { reason: RollbackReason::BorrowedTilesInHand, .. }
    ));
    assert!(game.board().get(set).unwrap().contains(JOKER));
    assert!(game.player(ANA).holds(ten));
    pass(&mut game);

    // Playing it in a new run is.
    game.begin_turn().unwrap();
    game.replace_joker(set, ten).unwrap();
    let run = game.place_set(&[oranges[0], oranges[1], JOKER]).unwrap();
    assert_eq!(game.board().kind_of(run), Some(SetKind::Sequence));
    assert_eq!(
        game.end_turn().unwrap(),
        TurnOutcome::Committed { tiles_placed: 3, opened: false }
    );
    assert!(!game.player(ANA).holds(JOKER));
    assert!(game.check_conservation());
}

/// Test taking back tiles placed this turn, and only those.
#[test]
fn test_retract_tiles() {
    let run = [id(10, Color::Red), id(11, Color::Red), id(12, Color::Red)];
    let mut game = two_player_game(&run, &[]);

    game.begin_turn().unwrap();
    let set = game.place_set(&run).unwrap();
    assert_eq!(game.retract_tile(set, 2), Ok(run[2]));
    assert_eq!(game.retract_tile(set, 1), Ok(run[1]));
    assert_eq!(game.retract_tile(set, 0), Ok(run[0]));
    assert!(game.board().is_empty());
    assert!(matches!(game.end_turn().unwrap(), TurnOutcome::Drew(DrawResult::Drawn(_))));

    game.begin_turn().unwrap();
    game.end_turn().unwrap();

    // Ana opens, then Bob may not take her tiles back.
    game.begin_turn().unwrap();
    let set = game.place_set(&run).unwrap();
    game.end_turn().unwrap();
    game.begin_turn().unwrap();
    assert_eq!(game.retract_tile(set, 0), Err(EngineError::TileNotRetractable(run[0])));
}

/// Test that emptying the hand wins and stops the match.
#[test]
fn test_win_by_emptying_hand() {
    let blues: Vec<TileId> = (1..=7).map(|n| id(n, Color::Blue)).collect();
    let blacks: Vec<TileId> = (1..=7).map(|n| id(n, Color::Black)).collect();
    let hand: Vec<TileId> = blues.iter().chain(&blacks).copied().collect();
    let mut game = two_player_game(&hand, &[]);

    game.begin_turn().unwrap();
    game.place_set(&blues).unwrap();
    game.place_set(&blacks).unwrap();
    assert_eq!(
        game.end_turn().unwrap(),
        TurnOutcome::Committed { tiles_placed: 14, opened: true }
    );

    assert_eq!(game.result(), Some(&GameResult::Winner(ANA)));
    assert!(game.is_over());
    assert_eq!(game.begin_turn(), Err(EngineError::GameOver));
}

/// Test that a round of turns on an empty pile ends in a draw.
#[test]
fn test_exhausted_pile_ends_in_draw() {
    let config = GameConfig::new(1).with_player("ana").with_player("bob").with_starting_player("ana");
    let pile = DrawPile::from_tiles(build_deck().into_iter().take(2 * HAND_SIZE));
    let mut game = Game::with_pile(config, pile).unwrap();
    game.deal().unwrap();
    assert_eq!(game.pile_size(), 0);

    game.begin_turn().unwrap();
    assert_eq!(game.end_turn().unwrap(), TurnOutcome::Drew(DrawResult::PileExhausted));
    assert!(!game.is_over());

    game.begin_turn().unwrap();
    assert_eq!(game.end_turn().unwrap(), TurnOutcome::Drew(DrawResult::PileExhausted));
    assert_eq!(game.result(), Some(&GameResult::Draw));
    assert!(game.check_conservation());
}

/// Test that an abandoned turn leaves no trace and the same player goes again.
#[test]
fn test_abandon_turn() {
    let run = [id(10, Color::Red), id(11, Color::Red), id(12, Color::Red)];
    let mut game = two_player_game(&run, &[]);
    let pile_before = game.pile_size();

    game.begin_turn().unwrap();
    game.place_set(&run).unwrap();
    game.abandon_turn().unwrap();

    assert!(game.board().is_empty());
    assert_eq!(game.player(ANA).hand_size(), HAND_SIZE);
    assert_eq!(game.pile_size(), pile_before);
    assert!(game.history().is_empty());
    assert_eq!(game.begin_turn(), Ok(ANA));
}

/// Test that moves outside a turn are refused.
#[test]
fn test_moves_need_a_turn() {
    let run = [id(10, Color::Red), id(11, Color::Red), id(12, Color::Red)];
    let mut game = two_player_game(&run, &[]);

    assert_eq!(game.place_set(&run), Err(EngineError::NoTurnInProgress));
    assert_eq!(game.abandon_turn(), Err(EngineError::NoTurnInProgress));
}

/// Test rotation across three players with a preset starting player.
#[test]
fn test_rotation_three_players() {
    let config = GameConfig::new(4)
        .with_player("a")
        .with_player("b")
        .with_player("c")
        .with_starting_player("c");
    let mut game = Game::new(config).unwrap();
    game.deal().unwrap();

    let mut order = Vec::new();
    for _ in 0..4 {
        order.push(game.begin_turn().unwrap().index());
        game.end_turn().unwrap();
    }
    assert_eq!(order, vec![2, 0, 1, 2]);

    let turns: Vec<u32> = game.history().iter().map(|r| r.turn).collect();
    assert_eq!(turns, vec![1, 2, 3, 4]);
}

/// Test an automated turn that ends immediately.
#[test]
fn test_automated_turn_draws() {
    let mut game = two_player_game(&[], &[]);
    let draw = next_draw(&game);
    assert_eq!(game.play_automated_turn(&mut EndTurnPolicy).unwrap(), TurnOutcome::Drew(draw));
}

/// Test an automated player laying down its opening run.
#[test]
fn test_automated_opening() {
    let run = [id(10, Color::Red), id(11, Color::Red), id(12, Color::Red), id(13, Color::Red)];
    let mut game = two_player_game(&run, &[]);

    let outcome = game.play_automated_turn(&mut UniformMeldPolicy).unwrap();
    assert_eq!(outcome, TurnOutcome::Committed { tiles_placed: 4, opened: true });
    assert_eq!(game.board().sequences().len(), 1);
    assert!(run.iter().all(|&t| game.board().contains_tile(t)));
}
