//! Room and corridor carving
//!
//! Every carve is a two-phase commit: the whole footprint is validated
//! against the grid first, and nothing is written unless it all fits.

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;
use crate::world::{Grid, Position, TileType};

/// Smallest room edge, walls included (2x2 walkable inside)
pub const MIN_ROOM_EXTENT: i32 = 4;

/// Shortest corridor
pub const MIN_CORRIDOR_LENGTH: i32 = 2;

/// Direction a feature grows in, away from what it attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Map 0..=3 to N/E/S/W; anything else falls back to North
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => Direction::East,
            2 => Direction::South,
            3 => Direction::West,
            _ => Direction::North,
        }
    }

    pub fn index(&self) -> i32 {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Unit step; y grows downwards
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Position one step from `pos` in this direction
    pub fn step(&self, pos: Position) -> Position {
        let (dx, dy) = self.delta();
        pos.offset(dx, dy)
    }
}

/// Maximum room extents handed to [`make_room`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomBounds {
    pub max_width: i32,
    pub max_height: i32,
}

impl RoomBounds {
    pub fn new(max_width: i32, max_height: i32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }
}

impl Default for RoomBounds {
    fn default() -> Self {
        Self::new(6, 6)
    }
}

/// Inclusive rectangle a room occupies, walls included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Footprint {
    /// Rectangle of a `xlen` x `ylen` room anchored at `anchor` and growing in `direction`
    ///
    /// The anchor sits on the near edge. Across the growth axis the room is
    /// split `len/2` cells before the anchor and `(len+1)/2` from it onwards,
    /// so odd lengths lean towards the positive side.
    pub fn for_room(anchor: Position, xlen: i32, ylen: i32, direction: Direction) -> Self {
        let Position { x, y } = anchor;
        let across_x = (x - xlen / 2, x + (xlen + 1) / 2 - 1);
        let across_y = (y - ylen / 2, y + (ylen + 1) / 2 - 1);

        let ((x0, x1), (y0, y1)) = match direction {
            Direction::North => (across_x, (y - ylen + 1, y)),
            Direction::South => (across_x, (y, y + ylen - 1)),
            Direction::East => ((x, x + xlen - 1), across_y),
            Direction::West => ((x - xlen + 1, x), across_y),
        };

        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0 + 1
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let (x0, x1) = (self.x0, self.x1);
        (self.y0..=self.y1).flat_map(move |y| (x0..=x1).map(move |x| (x, y)))
    }

    /// For a perimeter cell, the neighbour just outside the room
    ///
    /// Side columns (corners included) look sideways, top and bottom rows look
    /// up or down. Interior cells have none.
    pub fn outward_neighbour(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        if x == self.x0 {
            Some((x - 1, y))
        } else if x == self.x1 {
            Some((x + 1, y))
        } else if y == self.y0 {
            Some((x, y - 1))
        } else if y == self.y1 {
            Some((x, y + 1))
        } else {
            None
        }
    }

    /// Does every cell lie inside the grid on diggable ground?
    pub fn fits(&self, grid: &Grid) -> bool {
        self.cells()
            .all(|(x, y)| grid.try_get(x, y).is_some_and(|t| t.is_diggable()))
    }
}

/// Result of a successfully carved corridor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorridorOutcome {
    /// Cell one step past the corridor's far end
    pub terminal: Position,
    pub length: i32,
    /// Whether a room was also carved at the terminal
    pub bonus_room: bool,
}

/// Try to carve a randomly sized room
///
/// Extents are drawn from `4..=max` per axis. Returns `false`, leaving the
/// grid untouched, if the room doesn't fit.
pub fn make_room(
    grid: &mut Grid,
    rng: &mut RandomSource,
    anchor: Position,
    bounds: RoomBounds,
    direction: Direction,
) -> bool {
    let xlen = rng.next_in_range(MIN_ROOM_EXTENT, bounds.max_width.max(MIN_ROOM_EXTENT));
    let ylen = rng.next_in_range(MIN_ROOM_EXTENT, bounds.max_height.max(MIN_ROOM_EXTENT));

    carve_room(grid, Footprint::for_room(anchor, xlen, ylen, direction))
}

/// Carve a room into an exact footprint
///
/// A perimeter cell whose outward neighbour is already a wall becomes floor,
/// so two rooms side by side share a single wall.
pub fn carve_room(grid: &mut Grid, footprint: Footprint) -> bool {
    if !footprint.fits(grid) {
        log::trace!("Room {:?} does not fit", footprint);
        return false;
    }

    for (x, y) in footprint.cells() {
        let tile = match footprint.outward_neighbour(x, y) {
            Some((nx, ny)) if grid.try_get(nx, ny) == Some(TileType::Wall) => TileType::FloorRoom,
            Some(_) => TileType::Wall,
            None => TileType::FloorRoom,
        };
        grid.set(x, y, tile);
    }

    true
}

/// Try to carve a randomly sized corridor, then a room at its far end
///
/// Returns `None`, leaving the grid untouched, if the corridor doesn't fit.
/// The trailing room is a bonus: its failure doesn't fail the corridor.
pub fn make_corridor(
    grid: &mut Grid,
    rng: &mut RandomSource,
    anchor: Position,
    max_length: i32,
    direction: Direction,
    room_bounds: RoomBounds,
) -> Option<CorridorOutcome> {
    let length = rng.next_in_range(MIN_CORRIDOR_LENGTH, max_length.max(MIN_CORRIDOR_LENGTH));
    let terminal = carve_corridor(grid, anchor, length, direction)?;

    let bonus_room = make_room(grid, rng, terminal, room_bounds, direction);
    if bonus_room {
        grid.set_at(terminal, TileType::Door);
    }

    Some(CorridorOutcome {
        terminal,
        length,
        bonus_room,
    })
}

/// Carve a straight corridor of exactly `length` cells
///
/// Returns the terminal cell, one step past the last carved cell.
pub fn carve_corridor(
    grid: &mut Grid,
    anchor: Position,
    length: i32,
    direction: Direction,
) -> Option<Position> {
    let (dx, dy) = direction.delta();
    let cells: Vec<Position> = (0..length).map(|i| anchor.offset(dx * i, dy * i)).collect();

    let fits = cells
        .iter()
        .all(|p| grid.try_get(p.x, p.y).is_some_and(|t| t.is_diggable()));
    if !fits {
        log::trace!("Corridor from {:?} heading {:?} does not fit", anchor, direction);
        return None;
    }

    for pos in &cells {
        grid.set_at(*pos, TileType::FloorCorridor);
    }

    Some(anchor.offset(dx * length, dy * length))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(width: i32, height: i32) -> Grid {
        let mut grid = Grid::new(width, height);
        grid.initialize_border_and_fill();
        grid
    }

    #[test]
    fn test_direction_from_index() {
        assert_eq!(Direction::from_index(0), Direction::North);
        assert_eq!(Direction::from_index(1), Direction::East);
        assert_eq!(Direction::from_index(2), Direction::South);
        assert_eq!(Direction::from_index(3), Direction::West);
        assert_eq!(Direction::from_index(4), Direction::North);
        assert_eq!(Direction::from_index(-1), Direction::North);
        for dir in Direction::ALL {
            assert_eq!(Direction::from_index(dir.index()), dir);
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_footprint_splits() {
        let anchor = Position::new(10, 10);

        // Odd length: 2 before the anchor, 3 from it
        let north = Footprint::for_room(anchor, 5, 4, Direction::North);
        assert_eq!((north.x0, north.x1, north.y0, north.y1), (8, 12, 7, 10));

        let south = Footprint::for_room(anchor, 4, 6, Direction::South);
        assert_eq!((south.x0, south.x1, south.y0, south.y1), (8, 11, 10, 15));

        let east = Footprint::for_room(anchor, 6, 5, Direction::East);
        assert_eq!((east.x0, east.x1, east.y0, east.y1), (10, 15, 8, 12));

        let west = Footprint::for_room(anchor, 4, 4, Direction::West);
        assert_eq!((west.x0, west.x1, west.y0, west.y1), (7, 10, 8, 11));

        for fp in [north, south, east, west] {
            assert!(fp.contains(anchor.x, anchor.y));
        }
        assert_eq!((east.width(), east.height()), (6, 5));
    }

    #[test]
    fn test_carve_room_layout() {
        let mut grid = open_grid(12, 12);
        let fp = Footprint::for_room(Position::new(5, 2), 4, 5, Direction::South);
        assert!(carve_room(&mut grid, fp));

        for (x, y) in fp.cells() {
            let on_edge = x == fp.x0 || x == fp.x1 || y == fp.y0 || y == fp.y1;
            let expected = if on_edge { TileType::Wall } else { TileType::FloorRoom };
            assert_eq!(grid.get(x, y), expected, "at ({x}, {y})");
        }
        assert_eq!(grid.count(TileType::FloorRoom), 2 * 3);
    }

    #[test]
    fn test_room_fails_on_occupied_ground_without_mutation() {
        let mut grid = open_grid(20, 20);
        for y in 5..15 {
            for x in 5..15 {
                grid.set(x, y, TileType::Wall);
            }
        }
        let before = grid.checksum();
        let mut rng = RandomSource::new(11);

        for dir in Direction::ALL {
            let anchor = Position::new(10, 10);
            assert!(!make_room(&mut grid, &mut rng, anchor, RoomBounds::default(), dir));
        }
        assert_eq!(grid.checksum(), before);
    }

    #[test]
    fn test_room_fails_out_of_bounds_without_mutation() {
        let mut grid = Grid::filled(8, 8, TileType::Dirt);
        let before = grid.checksum();
        // Touches x = -1
        let fp = Footprint::for_room(Position::new(2, 4), 6, 4, Direction::West);
        assert!(!carve_room(&mut grid, fp));
        assert_eq!(grid.checksum(), before);
    }

    #[test]
    fn test_shared_wall_is_not_doubled() {
        let mut grid = open_grid(20, 12);
        let left = Footprint::for_room(Position::new(2, 5), 5, 5, Direction::East);
        assert!(carve_room(&mut grid, left));
        assert_eq!(left.x1, 6);

        // Right room starts directly after the left room's east wall
        let right = Footprint::for_room(Position::new(7, 5), 5, 5, Direction::East);
        assert!(carve_room(&mut grid, right));

        for y in left.y0..=left.y1 {
            assert_eq!(grid.get(6, y), TileType::Wall, "shared wall at y={y}");
            assert_eq!(grid.get(7, y), TileType::FloorRoom, "seam floor at y={y}");
        }
        // The far side still gets its own wall
        assert_eq!(grid.get(right.x1, 5), TileType::Wall);
    }

    #[test]
    fn test_room_size_respects_bounds() {
        for seed in 0..50 {
            let mut grid = open_grid(30, 30);
            let mut rng = RandomSource::new(seed);
            let bounds = RoomBounds::new(6, 5);
            let anchor = Position::new(15, 15);
            assert!(make_room(&mut grid, &mut rng, anchor, bounds, Direction::South));

            let carved = grid.count(TileType::Wall) + grid.count(TileType::FloorRoom);
            assert!(carved >= 16 && carved <= 30, "seed {seed}: {carved} cells");
        }
    }

    #[test]
    fn test_carve_corridor_terminal() {
        let mut grid = open_grid(10, 10);
        let end = carve_corridor(&mut grid, Position::new(2, 5), 4, Direction::East);
        assert_eq!(end, Some(Position::new(6, 5)));
        for x in 2..6 {
            assert_eq!(grid.get(x, 5), TileType::FloorCorridor);
        }
        assert_eq!(grid.get(6, 5), TileType::Dirt);

        let up = carve_corridor(&mut grid, Position::new(7, 7), 3, Direction::North);
        assert_eq!(up, Some(Position::new(7, 4)));
    }

    #[test]
    fn test_corridor_fails_without_mutation() {
        let mut grid = open_grid(10, 10);
        grid.set(5, 5, TileType::Wall);
        let before = grid.checksum();

        assert_eq!(carve_corridor(&mut grid, Position::new(5, 8), 4, Direction::North), None);
        // Runs into the border rock
        assert_eq!(carve_corridor(&mut grid, Position::new(2, 2), 3, Direction::West), None);
        assert_eq!(grid.checksum(), before);

        let mut rng = RandomSource::new(5);
        let mut walled = Grid::filled(10, 10, TileType::Wall);
        let walled_before = walled.checksum();
        let corridor = make_corridor(
            &mut walled,
            &mut rng,
            Position::new(5, 5),
            10,
            Direction::East,
            RoomBounds::default(),
        );
        assert!(corridor.is_none());
        assert_eq!(walled.checksum(), walled_before);
    }

    #[test]
    fn test_corridor_with_bonus_room() {
        let mut grid = open_grid(40, 40);
        let mut rng = RandomSource::new(2);
        let outcome = make_corridor(
            &mut grid,
            &mut rng,
            Position::new(20, 30),
            4,
            Direction::North,
            RoomBounds::default(),
        )
        .expect("open ground fits a corridor");

        assert!(outcome.bonus_room);
        assert_eq!(grid.get_at(outcome.terminal), TileType::Door);
        assert_eq!(outcome.terminal, Position::new(20, 30 - outcome.length));
        assert_eq!(grid.count(TileType::FloorCorridor), outcome.length as usize);
    }

    #[test]
    fn test_corridor_without_room_space_still_succeeds() {
        // 3 tall strip: room never fits, corridor does
        let mut grid = Grid::filled(20, 3, TileType::Rock);
        for x in 1..19 {
            grid.set(x, 1, TileType::Dirt);
        }
        let mut rng = RandomSource::new(8);
        let outcome = make_corridor(
            &mut grid,
            &mut rng,
            Position::new(1, 1),
            6,
            Direction::East,
            RoomBounds::default(),
        )
        .expect("strip fits a corridor");

        assert!(!outcome.bonus_room);
        assert_eq!(grid.count(TileType::Door), 0);
        assert!((2..=6).contains(&outcome.length));
    }
}
