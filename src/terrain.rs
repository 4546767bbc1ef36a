//! Terrain kinds, render symbols and sprite rotations.

use serde::{Deserialize, Serialize};

/// Field values below this are water
pub const WATER_THRESHOLD: f64 = 0.32;
/// Field values below this (and not water) are sand
pub const SAND_THRESHOLD: f64 = 0.45;
/// Field values below this (and not sand) are grass; the rest are trees
pub const GRASS_THRESHOLD: f64 = 0.6;

/// Base biome of a grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Deep water with a wave surface
    #[default]
    Water,
    Sand,
    Grass,
    Trees,
}

impl TerrainKind {
    pub const ALL: [TerrainKind; 4] = [
        TerrainKind::Water,
        TerrainKind::Sand,
        TerrainKind::Grass,
        TerrainKind::Trees,
    ];

    /// Classify an island-adjusted field value. Values outside [0, 1] are fine.
    pub fn classify(value: f64) -> Self {
        if value < WATER_THRESHOLD {
            TerrainKind::Water
        } else if value < SAND_THRESHOLD {
            TerrainKind::Sand
        } else if value < GRASS_THRESHOLD {
            TerrainKind::Grass
        } else {
            TerrainKind::Trees
        }
    }

    /// Water and trees block movement
    pub fn is_obstacle(self) -> bool {
        matches!(self, TerrainKind::Water | TerrainKind::Trees)
    }

    /// The kind this cell may never touch (orthogonally or diagonally).
    pub fn forbidden_neighbor(self) -> Option<TerrainKind> {
        match self {
            TerrainKind::Grass => Some(TerrainKind::Water),
            TerrainKind::Sand => Some(TerrainKind::Trees),
            TerrainKind::Water | TerrainKind::Trees => None,
        }
    }

    pub fn ascii_char(self) -> char {
        match self {
            TerrainKind::Water => '~',
            TerrainKind::Sand => '.',
            TerrainKind::Grass => ',',
            TerrainKind::Trees => 'T',
        }
    }

    pub fn from_ascii_char(c: char) -> Option<Self> {
        TerrainKind::ALL.into_iter().find(|k| k.ascii_char() == c)
    }

    /// Flat map colour (the tileset's base fills; trees a darker green)
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            TerrainKind::Water => (0x37, 0x49, 0x52),
            TerrainKind::Sand => (0x9d, 0x7e, 0x6a),
            TerrainKind::Grass => (0x2b, 0x44, 0x32),
            TerrainKind::Trees => (0x1a, 0x2e, 0x1f),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TerrainKind::Water => "water",
            TerrainKind::Sand => "sand",
            TerrainKind::Grass => "grass",
            TerrainKind::Trees => "trees",
        }
    }
}

impl std::fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Something the tileset can draw into a tile slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileSymbol {
    Water,
    Sand,
    Grass,
    Flowers,
    InnerCorner,
    OuterCorner,
    Border,
    Rocks,
    Waves,
    Trees,
}

/// Clockwise sprite rotation in quarter turns
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(TerrainKind::classify(-0.4), TerrainKind::Water);
        assert_eq!(TerrainKind::classify(0.3199), TerrainKind::Water);
        assert_eq!(TerrainKind::classify(0.32), TerrainKind::Sand);
        assert_eq!(TerrainKind::classify(0.45), TerrainKind::Grass);
        assert_eq!(TerrainKind::classify(0.5999), TerrainKind::Grass);
        assert_eq!(TerrainKind::classify(0.6), TerrainKind::Trees);
        assert_eq!(TerrainKind::classify(1.7), TerrainKind::Trees);
    }

    #[test]
    fn test_ascii_round_trip() {
        for kind in TerrainKind::ALL {
            assert_eq!(TerrainKind::from_ascii_char(kind.ascii_char()), Some(kind));
        }
        assert_eq!(TerrainKind::from_ascii_char('?'), None);
    }

    #[test]
    fn test_obstacles() {
        let blocking: Vec<_> = TerrainKind::ALL.into_iter().filter(|k| k.is_obstacle()).collect();
        assert_eq!(blocking, vec![TerrainKind::Water, TerrainKind::Trees]);
    }
}
