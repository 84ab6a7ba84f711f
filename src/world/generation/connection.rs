//! Connection point search
//!
//! Finds a wall or corridor cell where a new feature can be attached to the
//! existing structure.

use crate::rng::RandomSource;
use crate::world::{Grid, Position, TileType};

use super::features::Direction;

/// An accepted attachment point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    /// The wall or corridor cell that becomes the door
    pub point: Position,
    /// Direction the new feature grows in, away from the existing structure
    pub direction: Direction,
    /// Probes spent finding it, this one included
    pub probes: u32,
}

impl Connection {
    /// Anchor for the new feature, one step beyond the door
    pub fn anchor(&self) -> Position {
        self.direction.step(self.point)
    }
}

/// Probe random interior cells until one is a valid attachment point
///
/// Gives up after `max_probes` draws.
pub fn find_connection(grid: &Grid, rng: &mut RandomSource, max_probes: u32) -> Option<Connection> {
    let (max_x, max_y) = (grid.width() - 2, grid.height() - 2);

    for probe in 1..=max_probes {
        let point = Position::new(rng.next_in_range(1, max_x), rng.next_in_range(1, max_y));
        if let Some(direction) = connection_at(grid, point) {
            return Some(Connection {
                point,
                direction,
                probes: probe,
            });
        }
    }

    None
}

/// Direction a feature attached at `point` would grow in, if `point` is valid
///
/// The cell must be a wall or corridor with floor on one side; neighbours are
/// tried below, left, above, right, and the first floor found decides the
/// direction (growth points away from it). A door on any side disqualifies
/// the cell so openings don't cluster.
pub fn connection_at(grid: &Grid, point: Position) -> Option<Direction> {
    if grid.is_border(point.x, point.y) {
        return None;
    }
    if !matches!(grid.get_at(point), TileType::Wall | TileType::FloorCorridor) {
        return None;
    }

    let direction = Direction::ALL
        .into_iter()
        .find(|dir| grid.get_at(dir.opposite().step(point)).is_floor())?;

    let near_door = Direction::ALL
        .into_iter()
        .any(|dir| grid.get_at(dir.step(point)) == TileType::Door);

    if near_door {
        None
    } else {
        Some(direction)
    }
}
