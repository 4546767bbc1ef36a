use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;

use crate::error::Result;
use crate::generation::GeneratedMap;
use crate::obstacles::{Obstacle, Tree};
use crate::terrain::TerrainKind;
use crate::tilemap::Tilemap;
use crate::tileset::MapLayers;

/// Render the terrain grid with flat colours, `scale` pixels per tile.
pub fn render_terrain_map(grid: &Tilemap<TerrainKind>, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let mut img: RgbImage = ImageBuffer::new(grid.width as u32 * scale, grid.height as u32 * scale);
    for (x, y, kind) in grid.iter() {
        let (r, g, b) = kind.color();
        for sy in 0..scale {
            for sx in 0..scale {
                img.put_pixel(x as u32 * scale + sx, y as u32 * scale + sy, Rgb([r, g, b]));
            }
        }
    }
    img
}

/// Black for blocking tiles, white for walkable ones.
pub fn render_obstacle_mask(grid: &Tilemap<TerrainKind>) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(grid.width as u32, grid.height as u32);
    for (x, y, kind) in grid.iter() {
        let v = if kind.is_obstacle() { 0 } else { 255 };
        img.put_pixel(x as u32, y as u32, Rgb([v, v, v]));
    }
    img
}

/// Export the flat terrain map as a PNG.
pub fn export_terrain_map(grid: &Tilemap<TerrainKind>, scale: u32, path: impl AsRef<Path>) -> Result<()> {
    render_terrain_map(grid, scale).save(path)?;
    Ok(())
}

/// Paths written by `export_layers` for a given prefix
pub fn layer_paths(prefix: &str) -> [PathBuf; 3] {
    [
        PathBuf::from(format!("{}_ground.png", prefix)),
        PathBuf::from(format!("{}_overlay.png", prefix)),
        PathBuf::from(format!("{}_composite.png", prefix)),
    ]
}

/// Write the ground layer, the overlay (tree tops) and their composite.
pub fn export_layers(layers: &MapLayers, prefix: &str) -> Result<[PathBuf; 3]> {
    let paths = layer_paths(prefix);
    layers.ground().save(&paths[0])?;
    layers.overlay().save(&paths[1])?;
    layers.composite().save(&paths[2])?;
    Ok(paths)
}

/// JSON form of a generated map
#[derive(Serialize)]
pub struct MapExport<'a> {
    pub seed: i64,
    pub tile_size: u32,
    pub width: usize,
    pub height: usize,
    /// One string per row in the ASCII terrain alphabet
    pub rows: Vec<String>,
    pub obstacles: &'a [Obstacle],
    pub trees: &'a [Tree],
    pub shorelines: Vec<(usize, usize)>,
}

impl<'a> MapExport<'a> {
    pub fn new(map: &'a GeneratedMap) -> Self {
        Self {
            seed: map.seeds.master,
            tile_size: map.tile_size,
            width: map.tiles_x(),
            height: map.tiles_y(),
            rows: map
                .grid
                .rows()
                .map(|row| row.iter().map(|k| k.ascii_char()).collect())
                .collect(),
            obstacles: &map.obstacles,
            trees: &map.trees,
            shorelines: map.shorelines.iter().copied().collect(),
        }
    }
}

/// Export grid, obstacles and trees as pretty JSON.
pub fn export_map_json(map: &GeneratedMap, path: impl AsRef<Path>) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &MapExport::new(map))?;
    Ok(())
}
