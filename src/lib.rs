//! Delve - a room-and-corridor dungeon generator
//!
//! Grows a tile dungeon outwards from a single seed room, one room or
//! corridor at a time, and hands back a finished, read-only grid. A single
//! cleanup sweep trims dead-end corridors; pruning a junction can still
//! leave a stub or cut a corridor off, so full connectivity is not promised.

pub mod config;
pub mod rng;
pub mod world;

// Re-export commonly used types
pub use config::{ConfigError, GeneratorConfig};
pub use rng::RandomSource;
pub use world::generation::{DungeonBuilder, GenerationReport, StopReason};
pub use world::{generate_dungeon, Grid, Position, TileType};
