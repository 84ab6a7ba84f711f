//! Grid data structure
//!
//! The flat, bounds-checked 2D cell array a dungeon is carved into.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::tile::TileType;

/// Per-type cell counts
pub type TileCensus = HashMap<TileType, usize>;

/// Smallest width or height a grid may have (a border ring around one cell)
pub const MIN_DIMENSION: i32 = 3;

/// A cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position shifted by a delta
    pub fn offset(&self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }
}

/// A dungeon grid
///
/// Cells are stored row-major at index `x + width * y`. Every accessor that
/// takes a coordinate checks it; reading or writing outside the grid is a bug
/// in the caller and panics instead of touching a neighbouring row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<TileType>,
}

impl Grid {
    /// Create a new grid filled with rock
    ///
    /// Dimensions below [`MIN_DIMENSION`] are raised to it.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, TileType::Rock)
    }

    /// Create a new grid with every cell set to `tile`
    ///
    /// # Panics
    ///
    /// Panics if `width * height` does not fit in an `i32`.
    pub fn filled(width: i32, height: i32, tile: TileType) -> Self {
        let width = width.max(MIN_DIMENSION);
        let height = height.max(MIN_DIMENSION);
        let len = width
            .checked_mul(height)
            .unwrap_or_else(|| panic!("{width}x{height} grid has too many cells"));
        Self {
            width,
            height,
            cells: vec![tile; len as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells (`width * height`)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Center cell, rounding down
    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Check if coordinates lie on the outer ring
    #[inline]
    pub fn is_border(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y)
            && (x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1)
    }

    /// Convert 2D coordinates to 1D index
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        assert!(
            self.in_bounds(x, y),
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        (x + self.width * y) as usize
    }

    /// Convert 1D index to 2D coordinates
    #[inline]
    pub fn idx_to_xy(&self, idx: usize) -> (i32, i32) {
        let idx = idx as i32;
        (idx % self.width, idx / self.width)
    }

    /// Get the cell type at a position
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn get(&self, x: i32, y: i32) -> TileType {
        self.cells[self.xy_to_idx(x, y)]
    }

    /// Get the cell type at a position, or `None` outside the grid
    pub fn try_get(&self, x: i32, y: i32) -> Option<TileType> {
        if self.in_bounds(x, y) {
            Some(self.cells[(x + self.width * y) as usize])
        } else {
            None
        }
    }

    /// Set the cell type at a position
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn set(&mut self, x: i32, y: i32, tile: TileType) {
        let idx = self.xy_to_idx(x, y);
        self.cells[idx] = tile;
    }

    pub fn get_at(&self, pos: Position) -> TileType {
        self.get(pos.x, pos.y)
    }

    pub fn set_at(&mut self, pos: Position, tile: TileType) {
        self.set(pos.x, pos.y, tile);
    }

    /// Seal the outer ring with rock and fill everything inside with dirt
    pub fn initialize_border_and_fill(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let tile = if self.is_border(x, y) {
                    TileType::Rock
                } else {
                    TileType::Dirt
                };
                self.set(x, y, tile);
            }
        }
    }

    /// Raw cell slice, row-major
    pub fn cells(&self) -> &[TileType] {
        &self.cells
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[TileType]> {
        self.cells.chunks(self.width as usize)
    }

    /// Count cells of a given type
    pub fn count(&self, tile: TileType) -> usize {
        self.cells.iter().filter(|&&t| t == tile).count()
    }

    /// Per-type cell counts; every type is present, even with a count of zero
    pub fn census(&self) -> TileCensus {
        let mut census: TileCensus = TileType::ALL.iter().map(|&t| (t, 0)).collect();
        for tile in &self.cells {
            *census.entry(*tile).or_insert(0) += 1;
        }
        census
    }

    /// FNV-1a hash of dimensions and cells, stable across runs and platforms
    pub fn checksum(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0100_0000_01b3;

        let header = [self.width as u32, self.height as u32]
            .into_iter()
            .flat_map(u32::to_le_bytes);
        let body = self.cells.iter().map(|&t| t as u8);

        header.chain(body).fold(OFFSET, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(PRIME)
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(TileType::glyph).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_dimensions() {
        let grid = Grid::new(1, -4);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.len(), 9);
    }

    #[test]
    fn test_index_roundtrip() {
        let grid = Grid::new(7, 5);
        assert_eq!(grid.xy_to_idx(3, 2), 3 + 7 * 2);
        assert_eq!(grid.idx_to_xy(17), (3, 2));
    }

    #[test]
    fn test_border_and_fill() {
        let mut grid = Grid::new(6, 4);
        grid.initialize_border_and_fill();

        for y in 0..4 {
            for x in 0..6 {
                let expected = if x == 0 || y == 0 || x == 5 || y == 3 {
                    TileType::Rock
                } else {
                    TileType::Dirt
                };
                assert_eq!(grid.get(x, y), expected, "at ({x}, {y})");
            }
        }
        assert_eq!(grid.count(TileType::Dirt), 4 * 2);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_get_out_of_bounds_panics() {
        let grid = Grid::new(5, 5);
        grid.get(5, 0);
    }

    #[test]
    #[should_panic(expected = "too many cells")]
    fn test_oversized_grid_panics_clearly() {
        Grid::new(100_000, 100_000);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_set_does_not_wrap_rows() {
        // (-1, 1) would alias (4, 0) with unchecked arithmetic
        let mut grid = Grid::new(5, 5);
        grid.set(-1, 1, TileType::Wall);
    }

    #[test]
    fn test_try_get() {
        let grid = Grid::filled(4, 4, TileType::Dirt);
        assert_eq!(grid.try_get(3, 3), Some(TileType::Dirt));
        assert_eq!(grid.try_get(4, 0), None);
        assert_eq!(grid.try_get(0, -1), None);
    }

    #[test]
    fn test_census_sums_to_cell_count() {
        let mut grid = Grid::new(10, 8);
        grid.initialize_border_and_fill();
        grid.set(4, 4, TileType::Door);

        let census: TileCensus = grid.census();
        assert_eq!(census.len(), TileType::ALL.len());
        assert_eq!(census.values().sum::<usize>(), 80);
        assert_eq!(census[&TileType::Door], 1);
        assert_eq!(census[&TileType::Wall], 0);
    }

    #[test]
    fn test_checksum_tracks_changes() {
        let mut grid = Grid::filled(5, 5, TileType::Dirt);
        let before = grid.checksum();
        assert_eq!(before, grid.clone().checksum());

        grid.set(2, 2, TileType::Wall);
        assert_ne!(before, grid.checksum());

        grid.set(2, 2, TileType::Dirt);
        assert_eq!(before, grid.checksum());
    }

    #[test]
    fn test_display_one_line_per_row() {
        let mut grid = Grid::new(4, 3);
        grid.initialize_border_and_fill();
        let text = grid.to_string();
        assert_eq!(text, "%%%%\n%  %\n%%%%\n");
    }
}
