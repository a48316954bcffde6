//! Board and tile set tests through the public API.
//!
//! These tests walk the board through the edits a turn makes and check that
//! refused edits change nothing and that snapshots restore exactly.

use rummikub_engine::board::{Board, SetId, SetSource};
use rummikub_engine::core::EngineError;
use rummikub_engine::tiles::{Color, SetKind, Side, Tile, TileId, TileSet};

fn tile(id: u8, number: u8, color: Color) -> Tile {
    Tile::new(TileId::new(id), number, color)
}

fn numbers(set: &TileSet) -> Vec<Option<u8>> {
    set.iter().map(Tile::number).collect()
}

/// Test the blue 1-2-3 run: valid, extends with blue 4, refuses red 4.
#[test]
fn test_blue_run_scenario() {
    let mut set = TileSet::new(vec![
        tile(0, 1, Color::Blue),
        tile(1, 2, Color::Blue),
        tile(2, 3, Color::Blue),
    ])
    .unwrap();
    assert!(set.is_valid_sequence());
    assert!(!set.is_valid_group());

    let before = set.clone();
    let red = tile(3, 4, Color::Red);
    assert_eq!(set.append_tile(Side::Right, red.clone()), Err(red));
    assert_eq!(set, before);

    set.append_tile(Side::Right, tile(4, 4, Color::Blue)).unwrap();
    assert_eq!(set.size(), 4);
    assert!(set.is_valid_sequence());
    assert_eq!(set.right_tile().and_then(Tile::number), Some(4));
}

/// Test that a failed merge removes nothing and adds nothing.
#[test]
fn test_merge_atomicity() {
    let mut board = Board::new();
    let run = board
        .add_tile_set(SetSource::Tiles(vec![
            tile(0, 4, Color::Red),
            tile(1, 5, Color::Red),
            tile(2, 6, Color::Red),
        ]))
        .unwrap();
    let group = board
        .add_tile_set(SetSource::Tiles(vec![
            tile(3, 9, Color::Red),
            tile(4, 9, Color::Blue),
            tile(5, 9, Color::Orange),
        ]))
        .unwrap();

    let before = board.clone();
    assert_eq!(
        board.merge_sets(run, group),
        Err(EngineError::InvalidMerge { left: run, right: group })
    );
    assert_eq!(board, before);
    assert_eq!(board.groups().len(), 1);
    assert_eq!(board.sequences().len(), 1);
}

/// Test that removal targets the given set when another one looks the same.
#[test]
fn test_identity_based_removal() {
    let mut board = Board::new();
    let make = |base: u8| {
        vec![
            tile(base, 2, Color::Black),
            tile(base + 1, 3, Color::Black),
            tile(base + 2, 4, Color::Black),
        ]
    };
    let first = board.add_tile_set(SetSource::Tiles(make(0))).unwrap();
    let second = board.add_tile_set(SetSource::Tiles(make(10))).unwrap();
    assert_eq!(
        board.get(first).map(numbers),
        board.get(second).map(numbers)
    );

    let removed = board.remove_tile_set(second).unwrap();
    assert!(removed.contains(TileId::new(10)));
    assert!(board.get(first).is_some());
    assert_eq!(board.remove_tile_set(second), Err(EngineError::UnknownSet(second)));
}

/// Test a mid-turn rearrangement and its rollback.
#[test]
fn test_rearrangement_and_rollback() {
    let mut board = Board::new();
    let run = board
        .add_tile_set(SetSource::Tiles(
            (1..=6).map(|n| tile(n, n, Color::Orange)).collect(),
        ))
        .unwrap();
    let before = board.clone();
    let snapshot = board.snapshot();

    let (low, high) = board.split_set(run, 3).unwrap();
    assert_eq!(board.kind_of(low), Some(SetKind::Sequence));
    assert_eq!(board.kind_of(high), Some(SetKind::Sequence));

    board.move_tile(high, 0, low, Side::Right).unwrap();
    assert_eq!(board.kind_of(low), Some(SetKind::Sequence));
    assert_eq!(board.kind_of(high), Some(SetKind::Provisional));
    assert!(!board.is_clean());

    board.restore(snapshot);
    assert_eq!(board, before);
    assert!(board.is_clean());
    assert_eq!(board.get(run).map(TileSet::size), Some(6));
}

/// Test that an existing set can be placed as is.
#[test]
fn test_add_existing_set() {
    let set = TileSet::new(vec![
        tile(0, 13, Color::Red),
        tile(1, 13, Color::Blue),
        Tile::joker(TileId::new(104)),
        tile(2, 13, Color::Black),
    ])
    .unwrap();

    let mut board = Board::new();
    let id = board.add_tile_set(SetSource::from(set.clone())).unwrap();
    assert_eq!(board.kind_of(id), Some(SetKind::Group));
    assert_eq!(board.get(id), Some(&set));
    assert_eq!(set.total_points(), 52);
}

/// Test that errors name the set and read sensibly.
#[test]
fn test_error_messages() {
    let mut board = Board::new();
    let missing = SetId::new(9);
    let err = board.split_set(missing, 1).unwrap_err();
    assert_eq!(err.to_string(), "Set(9) is not on the board");

    let rejected = board
        .append_tile(missing, Side::Left, tile(0, 1, Color::Red))
        .unwrap_err();
    assert_eq!(rejected.to_string(), "r1 rejected: Set(9) is not on the board");
}
