//! Post-generation cleanup passes
//!
//! Both passes sweep the interior once, row by row, skipping the border.

use crate::world::{Grid, Position, TileType};

use super::features::Direction;

/// Seal gaps around room corners
///
/// Six local rules run in order on every interior cell, each one seeing the
/// writes of the rules before it. Every rule only ever writes `Wall`.
/// Unlike older generators, the corner rules never overwrite a door or corridor.
/// Returns how many cells changed.
pub fn fix_wall_corners(grid: &mut Grid) -> usize {
    let mut changed = 0;

    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            let before = grid.get(x, y);
            apply_corner_rules(grid, x, y);
            if grid.get(x, y) != before {
                changed += 1;
            }
        }
    }

    log::debug!("Wall corner fixup changed {} cells", changed);
    changed
}

fn apply_corner_rules(grid: &mut Grid, x: i32, y: i32) {
    // ???
    // #.#   room floor pinched between two walls
    // ???
    if grid.get(x, y) == TileType::FloorRoom
        && grid.get(x - 1, y) == TileType::Wall
        && grid.get(x + 1, y) == TileType::Wall
    {
        grid.set(x, y, TileType::Wall);
    }

    // Outer corners: two walls meeting around a floor diagonal
    //
    //  .#   #.   ?#   #?
    //  #?   ?#   #.   .#
    let corners = [(-1, -1), (1, -1), (1, 1), (-1, 1)];
    for (dx, dy) in corners {
        if !may_become_corner(grid.get(x, y)) {
            break;
        }
        if wall_like_at(grid, x + dx, y)
            && wall_like_at(grid, x, y + dy)
            && room_floor_at(grid, x + dx, y + dy)
        {
            grid.set(x, y, TileType::Wall);
        }
    }

    // ?.?
    // #_#   dirt gap in a wall run next to a room
    // ?.?
    if grid.get(x, y) == TileType::Dirt
        && (room_floor_at(grid, x, y - 1) || room_floor_at(grid, x, y + 1))
        && wall_like_at(grid, x - 1, y)
        && wall_like_at(grid, x + 1, y)
    {
        grid.set(x, y, TileType::Wall);
    }
}

fn wall_like_at(grid: &Grid, x: i32, y: i32) -> bool {
    grid.get(x, y).is_wall_like()
}

fn room_floor_at(grid: &Grid, x: i32, y: i32) -> bool {
    grid.get(x, y) == TileType::FloorRoom
}

/// Corner rules never close a door or a corridor
fn may_become_corner(tile: TileType) -> bool {
    !matches!(tile, TileType::Door | TileType::FloorCorridor)
}

/// A corridor stub removed by [`fix_dead_end_corridors`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrunedStub {
    /// Cell where the dead end was detected
    pub start: Position,
    /// Direction the walk went, back along the corridor
    pub direction: Direction,
    /// Cells visited, the capped one included
    pub steps: i32,
}

/// Erase corridors that run into nothing
///
/// A cell is a dead end when it and its neighbour on one side are corridor and
/// the other side is dirt, wall or rock. From there the corridor is walked
/// back, turning corridor into dirt, and the first other cell is capped with
/// a wall. Border rock is left alone.
pub fn fix_dead_end_corridors(grid: &mut Grid) -> Vec<PrunedStub> {
    let mut pruned = Vec::new();

    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            // The walk heads away from the blocked side
            for walk in [Direction::West, Direction::East, Direction::North, Direction::South] {
                if is_dead_end(grid, x, y, walk) {
                    let start = Position::new(x, y);
                    let steps = prune_stub(grid, start, walk);
                    log::trace!("Pruned dead end at {:?} ({} steps {:?})", start, steps, walk);
                    pruned.push(PrunedStub {
                        start,
                        direction: walk,
                        steps,
                    });
                }
            }
        }
    }

    log::debug!("Pruned {} dead-end corridors", pruned.len());
    pruned
}

fn is_dead_end(grid: &Grid, x: i32, y: i32, walk: Direction) -> bool {
    let (dx, dy) = walk.delta();
    let blocked = grid.get(x - dx, y - dy);

    matches!(blocked, TileType::Dirt | TileType::Wall | TileType::Rock)
        && grid.get(x, y) == TileType::FloorCorridor
        && grid.get(x + dx, y + dy) == TileType::FloorCorridor
}

/// Walk from `start` towards `walk`, returning the number of cells visited
fn prune_stub(grid: &mut Grid, start: Position, walk: Direction) -> i32 {
    let mut pos = start;
    let mut steps = 0;

    while !grid.is_border(pos.x, pos.y) {
        steps += 1;
        if grid.get_at(pos) == TileType::FloorCorridor {
            grid.set_at(pos, TileType::Dirt);
        } else {
            grid.set_at(pos, TileType::Wall);
            break;
        }
        pos = walk.step(pos);
    }

    steps
}
