//! The shared table.
//!
//! ## Key Types
//!
//! - `Board`: every set on the table, split into groups, sequences and
//!   provisional sets
//! - `SetId`: stable identity of a set, so equal-looking sets stay distinct
//! - `BoardSnapshot`: saved board state for rolling back a turn

pub mod table;

pub use table::{Board, BoardSnapshot, SetId, SetSource};
