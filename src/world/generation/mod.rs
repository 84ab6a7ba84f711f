//! Procedural dungeon generation
//!
//! Rooms and corridors are attached one at a time to a growing structure,
//! then two cleanup passes tidy up corners and dead ends.

pub mod builder;
pub mod cleanup;
pub mod connection;
pub mod features;

pub use builder::{DungeonBuilder, FeatureKind, GenerationReport, GenerationState, StopReason};
pub use cleanup::{fix_dead_end_corridors, fix_wall_corners, PrunedStub};
pub use connection::{connection_at, find_connection, Connection};
pub use features::{
    carve_corridor, carve_room, make_corridor, make_room, CorridorOutcome, Direction, Footprint,
    RoomBounds,
};

use crate::config::GeneratorConfig;
use crate::rng::RandomSource;

/// Generate a dungeon with default parameters for the given size and quota
pub fn generate_dungeon(
    width: i32,
    height: i32,
    features: u32,
    rng: &mut RandomSource,
) -> GenerationReport {
    DungeonBuilder::new(GeneratorConfig::new(width, height, features)).build(rng)
}
