//! Island map generation
//!
//! Pipeline: seed -> permutation table -> noise + radial mask -> raw grid ->
//! fixed relaxation schedule -> edge decoration -> draw calls, obstacles and
//! tree entities. Terrain depends only on the seed and sizes; the decorative
//! scatter uses a separate derived seed.

pub mod classify;
pub mod decoration;
pub mod relaxation;

use std::collections::BTreeSet;

use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::MapConfig;
use crate::error::{GenerationError, Result};
use crate::obstacles::{extract_obstacles, extract_trees, Obstacle, Tree};
use crate::perlin::GradientNoise;
use crate::seeds::MapSeeds;
use crate::terrain::{Rotation, TerrainKind, TileSymbol};
use crate::tilemap::Tilemap;
use crate::tileset::TileCanvas;

pub use classify::{classify_terrain, island_factor, terrain_value, NOISE_SCALE};
pub use decoration::{classify_decorations, classify_edge, Decorations, EdgeClass, Placement};
pub use relaxation::{
    adjacency_violations, relax, AdjacencyViolation, RelaxationPass, RelaxationReport, ViolationKind,
    RELAXATION_SCHEDULE,
};

/// Everything a finished generation run hands to the game loop.
#[derive(Clone, Debug)]
pub struct GeneratedMap {
    pub seeds: MapSeeds,
    pub tile_size: u32,
    /// Terrain after relaxation
    pub grid: Tilemap<TerrainKind>,
    /// Top-left pixel corners of water and trees tiles, row-major
    pub obstacles: Vec<Obstacle>,
    pub trees: Vec<Tree>,
    /// Water tiles touching sand
    pub shorelines: BTreeSet<(usize, usize)>,
    pub relaxation: RelaxationReport,
    /// Adjacency rules still broken after the fixed schedule
    pub violations: Vec<AdjacencyViolation>,
}

impl GeneratedMap {
    pub fn tiles_x(&self) -> usize {
        self.grid.width
    }

    pub fn tiles_y(&self) -> usize {
        self.grid.height
    }

    /// Number of cells of the given kind
    pub fn count(&self, kind: TerrainKind) -> usize {
        self.grid.iter().filter(|(_, _, k)| **k == kind).count()
    }

    pub fn world_width(&self) -> u32 {
        self.grid.width as u32 * self.tile_size
    }

    pub fn world_height(&self) -> u32 {
        self.grid.height as u32 * self.tile_size
    }
}

/// Generate an island map and draw it onto `canvas`.
///
/// The grid is `config.tile_counts()` tiles. Fails before drawing anything if
/// the config is invalid, its tile size differs from the canvas, or the canvas
/// has no surface.
pub fn generate_map<C: TileCanvas>(config: &MapConfig, canvas: &mut C) -> Result<GeneratedMap> {
    config.validate()?;
    let tile_size = config.tile_size;
    if canvas.tile_size() != tile_size {
        return Err(GenerationError::InvalidConfig(format!(
            "tile_size is {}px but the canvas draws {}px tiles",
            tile_size,
            canvas.tile_size()
        )));
    }
    if !canvas.has_surface() {
        return Err(GenerationError::NoSurface);
    }
    let (tiles_x, tiles_y) = config.tile_counts();

    let seeds = MapSeeds::from_master(config.seed);
    info!("Generating {}x{} tile island ({})", tiles_x, tiles_y, seeds);

    let noise = GradientNoise::from_seed(seeds.terrain);
    let mut grid = classify_terrain(&noise, tiles_x, tiles_y, config.island_factor);

    for (x, y, kind) in grid.iter() {
        canvas.draw_tile(base_symbol(*kind), x, y, Rotation::Deg0);
    }

    let relaxation = relax(&mut grid);
    let violations = adjacency_violations(&grid);
    if !violations.is_empty() {
        warn!(
            "{} adjacency violations remain after relaxation (seed {})",
            violations.len(),
            seeds.master
        );
    }

    let decorations = classify_decorations(&grid);
    let mut rng = ChaCha8Rng::seed_from_u64(seeds.decoration);
    draw_decorations(canvas, &decorations, config.flower_chance, &mut rng);
    draw_details(canvas, &grid, &decorations.shorelines, config, &mut rng);

    let obstacles = extract_obstacles(&grid, tile_size);
    let trees = extract_trees(&grid, tile_size);
    info!(
        "Map generated: {} obstacles, {} trees, {} relaxation changes",
        obstacles.len(),
        trees.len(),
        relaxation.total_changes()
    );

    Ok(GeneratedMap {
        seeds,
        tile_size,
        grid,
        obstacles,
        trees,
        shorelines: decorations.shorelines,
        relaxation,
        violations,
    })
}

/// `generate_map` for callers inside an async startup sequence. Runs to
/// completion on the calling task.
pub async fn generate_map_async<C: TileCanvas>(config: &MapConfig, canvas: &mut C) -> Result<GeneratedMap> {
    generate_map(config, canvas)
}

/// Flat fill for the first pass. Trees stand on grass.
fn base_symbol(kind: TerrainKind) -> TileSymbol {
    match kind {
        TerrainKind::Water => TileSymbol::Water,
        TerrainKind::Sand => TileSymbol::Sand,
        TerrainKind::Grass | TerrainKind::Trees => TileSymbol::Grass,
    }
}

fn draw_decorations<C: TileCanvas, R: Rng>(
    canvas: &mut C,
    decorations: &Decorations,
    flower_chance: f64,
    rng: &mut R,
) {
    for p in &decorations.outer_corners {
        canvas.draw_tile(TileSymbol::OuterCorner, p.x, p.y, p.rotation);
    }
    for p in &decorations.inner_corners {
        canvas.draw_tile(TileSymbol::InnerCorner, p.x, p.y, p.rotation);
    }
    for p in &decorations.borders {
        canvas.draw_tile(TileSymbol::Border, p.x, p.y, p.rotation);
    }
    for p in &decorations.plain_grass {
        let symbol = if rng.gen::<f64>() < flower_chance {
            TileSymbol::Flowers
        } else {
            TileSymbol::Grass
        };
        canvas.draw_tile(symbol, p.x, p.y, Rotation::Deg0);
    }
}

/// Second sweep: trees, foam on open water, sand with the odd rock.
fn draw_details<C: TileCanvas, R: Rng>(
    canvas: &mut C,
    grid: &Tilemap<TerrainKind>,
    shorelines: &BTreeSet<(usize, usize)>,
    config: &MapConfig,
    rng: &mut R,
) {
    for (x, y, kind) in grid.iter() {
        match kind {
            TerrainKind::Trees => canvas.draw_tile(TileSymbol::Trees, x, y, Rotation::Deg0),
            TerrainKind::Water => {
                let roll = rng.gen::<f64>();
                if roll < config.foam_chance && !shorelines.contains(&(x, y)) {
                    canvas.draw_tile(TileSymbol::Waves, x, y, Rotation::Deg0);
                }
            }
            TerrainKind::Sand => {
                canvas.draw_tile(TileSymbol::Sand, x, y, Rotation::Deg0);
                if rng.gen::<f64>() < config.rock_chance {
                    canvas.draw_tile(TileSymbol::Rocks, x, y, Rotation::Deg0);
                }
            }
            TerrainKind::Grass => {}
        }
    }
}
