//! World module
//!
//! Contains the grid data structure, tiles, and procedural generation.

pub mod grid;
pub mod tile;
pub mod generation;

pub use grid::{Grid, Position, TileCensus};
pub use tile::TileType;
pub use generation::generate_dungeon;
