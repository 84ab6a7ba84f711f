//! Dungeon orchestration
//!
//! Grows a dungeon outwards from a seed room: find an attachment point,
//! carve a room or corridor there, stamp a door, repeat until the feature
//! quota is met or the attempt budget runs out.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::rng::RandomSource;
use crate::world::{Grid, TileType};

use super::cleanup::{fix_dead_end_corridors, fix_wall_corners};
use super::connection::{find_connection, Connection};
use super::features::{make_corridor, make_room, Direction};

/// Kind of the last feature that was placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    Room,
    Corridor,
}

/// Why the placement loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    QuotaReached,
    AttemptsExhausted,
    TimeLimit,
}

/// Counters threaded through one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationState {
    /// Accepted features, seed room included
    pub features: u32,
    /// Placement attempts made (the seed room is not one)
    pub attempts: u32,
    /// Connection probes spent across all attempts
    pub probes: u64,
    /// Rooms carved at the end of a corridor
    pub bonus_rooms: u32,
    pub previous: Option<FeatureKind>,
    /// Whether the seed room made it onto the grid
    pub seed_room_placed: bool,
}

/// Everything a generation run produced
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub grid: Grid,
    pub state: GenerationState,
    pub stop_reason: StopReason,
    /// Seed of the random source the run started from
    pub seed: u64,
    /// Cells changed by the wall corner pass
    pub corners_fixed: usize,
    /// Dead-end corridors removed
    pub stubs_pruned: usize,
}

impl GenerationReport {
    /// Final accepted feature count
    pub fn features(&self) -> u32 {
        self.state.features
    }
}

/// Drives connection search and feature placement over one grid
#[derive(Debug, Clone)]
pub struct DungeonBuilder {
    config: GeneratorConfig,
}

impl DungeonBuilder {
    /// Create a builder; sizes below 3 and a zero quota are replaced by their fallbacks
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a dungeon
    ///
    /// Missing the quota is not an error; the report carries whatever was built.
    pub fn build(&self, rng: &mut RandomSource) -> GenerationReport {
        let config = &self.config;
        let seed = rng.seed();
        let deadline = config.time_limit().map(|limit| Instant::now() + limit);

        let mut grid = Grid::new(config.width, config.height);
        grid.initialize_border_and_fill();

        let mut state = GenerationState {
            seed_room_placed: self.place_seed_room(&mut grid, rng),
            features: 1,
            ..GenerationState::default()
        };

        let stop_reason = loop {
            if state.features >= config.features {
                break StopReason::QuotaReached;
            }
            if state.attempts >= config.max_attempts {
                break StopReason::AttemptsExhausted;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                log::warn!(
                    "Time limit hit after {} attempts, returning partial dungeon",
                    state.attempts
                );
                break StopReason::TimeLimit;
            }

            state.attempts += 1;
            self.attempt(&mut grid, rng, &mut state);
        };

        if stop_reason == StopReason::AttemptsExhausted {
            log::debug!(
                "Quota of {} missed, placed {} features in {} attempts",
                config.features,
                state.features,
                state.attempts
            );
        }

        let corners_fixed = fix_wall_corners(&mut grid);
        let stubs_pruned = fix_dead_end_corridors(&mut grid).len();

        log::info!(
            "Generated {}x{} dungeon: {} features, {} attempts, {:?}",
            grid.width(),
            grid.height(),
            state.features,
            state.attempts,
            stop_reason
        );

        GenerationReport {
            grid,
            state,
            stop_reason,
            seed,
            corners_fixed,
            stubs_pruned,
        }
    }

    /// Carve the first room at the center, facing a random direction
    fn place_seed_room(&self, grid: &mut Grid, rng: &mut RandomSource) -> bool {
        let center = grid.center();

        for _ in 0..self.config.seed_room_tries.max(1) {
            let direction = Direction::from_index(rng.next_in_range(0, 3));
            if make_room(grid, rng, center, self.config.room_bounds, direction) {
                log::debug!("Seed room at {:?} facing {:?}", center, direction);
                return true;
            }
        }

        log::warn!(
            "No room fits a {}x{} grid, continuing without a seed room",
            grid.width(),
            grid.height()
        );
        false
    }

    /// One placement attempt; returns whether a feature was accepted
    fn attempt(
        &self,
        grid: &mut Grid,
        rng: &mut RandomSource,
        state: &mut GenerationState,
    ) -> bool {
        let Some(connection) = find_connection(grid, rng, self.config.max_probes) else {
            state.probes += u64::from(self.config.max_probes);
            return false;
        };
        state.probes += u64::from(connection.probes);

        let mut roll = rng.roll_percent();
        // Never chain two corridors
        if state.previous == Some(FeatureKind::Corridor) {
            roll = 0;
        }

        let placed = if roll <= self.config.room_chance {
            self.try_room(grid, rng, &connection)
        } else {
            self.try_corridor(grid, rng, &connection)
        };

        let Some((kind, bonus_room)) = placed else {
            return false;
        };

        state.features += 1;
        if bonus_room {
            state.features += 1;
            state.bonus_rooms += 1;
        }
        grid.set_at(connection.point, TileType::Door);
        state.previous = Some(kind);

        log::debug!(
            "Placed {:?} at {:?} heading {:?} (features: {})",
            kind,
            connection.point,
            connection.direction,
            state.features
        );
        true
    }

    fn try_room(
        &self,
        grid: &mut Grid,
        rng: &mut RandomSource,
        connection: &Connection,
    ) -> Option<(FeatureKind, bool)> {
        make_room(
            grid,
            rng,
            connection.anchor(),
            self.config.room_bounds,
            connection.direction,
        )
        .then_some((FeatureKind::Room, false))
    }

    fn try_corridor(
        &self,
        grid: &mut Grid,
        rng: &mut RandomSource,
        connection: &Connection,
    ) -> Option<(FeatureKind, bool)> {
        make_corridor(
            grid,
            rng,
            connection.anchor(),
            self.config.max_corridor_length,
            connection.direction,
            self.config.room_bounds,
        )
        .map(|outcome| (FeatureKind::Corridor, outcome.bonus_room))
    }
}
