//! Island tilemap generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod obstacles;
pub mod perlin;
pub mod permutation;
pub mod seeds;
pub mod terrain;
pub mod tilemap;
pub mod tileset;
pub mod viewer;

pub use config::MapConfig;
pub use error::{GenerationError, Result};
pub use generation::{generate_map, generate_map_async, GeneratedMap};
