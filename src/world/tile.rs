//! Tile definitions
//!
//! The closed set of cell types a dungeon grid is made of, and their properties.

use serde::{Deserialize, Serialize};

/// Types of cells in a dungeon grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileType {
    /// Impassable filler; seals the map border
    Rock,
    /// Unused diggable ground, the only thing new features may be carved from
    Dirt,
    /// Boundary of a room or a capped corridor
    Wall,
    FloorRoom,
    FloorCorridor,
    /// Opening where one feature attaches to another
    Door,
}

impl TileType {
    /// Every tile type, in declaration order
    pub const ALL: [TileType; 6] = [
        TileType::Rock,
        TileType::Dirt,
        TileType::Wall,
        TileType::FloorRoom,
        TileType::FloorCorridor,
        TileType::Door,
    ];

    /// Can something walk through this cell?
    pub fn is_passable(&self) -> bool {
        matches!(
            self,
            TileType::FloorRoom | TileType::FloorCorridor | TileType::Door
        )
    }

    /// Can a new room or corridor be carved here?
    pub fn is_diggable(&self) -> bool {
        matches!(self, TileType::Dirt)
    }

    pub fn is_openable(&self) -> bool {
        matches!(self, TileType::Door)
    }

    /// Floor of either kind (the cells a new feature can connect to)
    pub fn is_floor(&self) -> bool {
        matches!(self, TileType::FloorRoom | TileType::FloorCorridor)
    }

    /// Wall or door, which the corner rules treat alike
    pub fn is_wall_like(&self) -> bool {
        matches!(self, TileType::Wall | TileType::Door)
    }

    /// Human readable name
    pub fn description(&self) -> &'static str {
        match self {
            TileType::Rock => "Rock (impassable)",
            TileType::Dirt => "Dirt (diggable)",
            TileType::Wall => "Wall",
            TileType::FloorRoom => "Floor (room)",
            TileType::FloorCorridor => "Floor (corridor)",
            TileType::Door => "Door",
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            TileType::Rock => '%',
            TileType::Dirt => ' ',
            TileType::Wall => '#',
            TileType::FloorRoom => '.',
            TileType::FloorCorridor => ',',
            TileType::Door => '+',
        }
    }

    /// Parse a glyph produced by [`TileType::glyph`]
    pub fn from_glyph(glyph: char) -> Option<TileType> {
        TileType::ALL.into_iter().find(|t| t.glyph() == glyph)
    }

    pub fn fg_color(&self) -> (u8, u8, u8) {
        match self {
            TileType::Rock => (60, 55, 50),
            TileType::Dirt => (40, 35, 30),
            TileType::Wall => (130, 110, 90),
            TileType::FloorRoom => (160, 120, 60), // Ochre
            TileType::FloorCorridor => (90, 90, 90),
            TileType::Door => (139, 90, 43),
        }
    }
}
