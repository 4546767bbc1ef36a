//! Map generation settings, persisted as JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{GenerationError, Result};

pub const DEFAULT_SEED: i64 = 8;
pub const DEFAULT_ISLAND_FACTOR: f64 = 0.5;
pub const DEFAULT_WORLD_SIZE: u32 = 640;
pub const DEFAULT_TILE_SIZE: u32 = 16;

/// Everything `generate_map` needs besides the drawing surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Master seed; 0 picks a random one
    pub seed: i64,
    /// Strength of the radial falloff that turns noise into an island
    pub island_factor: f64,
    /// World width in pixels
    pub world_width: u32,
    /// World height in pixels
    pub world_height: u32,
    pub tile_size: u32,
    /// Chance that a plain grass tile gets flowers
    pub flower_chance: f64,
    /// Chance that an open water tile gets wave foam
    pub foam_chance: f64,
    /// Chance that a sand tile gets rocks
    pub rock_chance: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            island_factor: DEFAULT_ISLAND_FACTOR,
            world_width: DEFAULT_WORLD_SIZE,
            world_height: DEFAULT_WORLD_SIZE,
            tile_size: DEFAULT_TILE_SIZE,
            flower_chance: 0.3,
            foam_chance: 0.1,
            rock_chance: 0.1,
        }
    }
}

impl MapConfig {
    /// Grid size in whole tiles; partial tiles at the right and bottom are dropped.
    pub fn tile_counts(&self) -> (usize, usize) {
        if self.tile_size == 0 {
            return (0, 0);
        }
        (
            (self.world_width / self.tile_size) as usize,
            (self.world_height / self.tile_size) as usize,
        )
    }

    /// Reject settings generation cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(GenerationError::InvalidTileSize);
        }
        let (tiles_x, tiles_y) = self.tile_counts();
        if tiles_x == 0 || tiles_y == 0 {
            return Err(GenerationError::EmptyGrid {
                width: self.world_width,
                height: self.world_height,
                tile_size: self.tile_size,
            });
        }
        if !self.island_factor.is_finite() {
            return Err(GenerationError::InvalidConfig(format!(
                "island_factor must be finite, got {}",
                self.island_factor
            )));
        }
        for (name, chance) in [
            ("flower_chance", self.flower_chance),
            ("foam_chance", self.foam_chance),
            ("rock_chance", self.rock_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(GenerationError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, chance
                )));
            }
        }
        Ok(())
    }

    /// Read a config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: MapConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MapConfig::default();
        assert_eq!(config.tile_counts(), (40, 40));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_tiles_dropped() {
        let config = MapConfig {
            world_width: 100,
            world_height: 47,
            tile_size: 16,
            ..Default::default()
        };
        assert_eq!(config.tile_counts(), (6, 2));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let too_small = MapConfig { world_width: 8, ..Default::default() };
        assert!(matches!(too_small.validate(), Err(GenerationError::EmptyGrid { width: 8, .. })));

        let no_tiles = MapConfig { tile_size: 0, ..Default::default() };
        assert!(matches!(no_tiles.validate(), Err(GenerationError::InvalidTileSize)));

        let chance = MapConfig { foam_chance: 1.5, ..Default::default() };
        assert!(matches!(chance.validate(), Err(GenerationError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_fields_default() {
        let config: MapConfig = serde_json::from_str(r#"{"seed": 42, "tile_size": 32}"#).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.tile_size, 32);
        assert_eq!(config.island_factor, DEFAULT_ISLAND_FACTOR);
        assert_eq!(config.tile_counts(), (20, 20));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("island_config_{}.json", std::process::id()));
        let config = MapConfig {
            seed: -17,
            island_factor: 0.8,
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = MapConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
