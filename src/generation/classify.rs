//! Raw terrain classification: noise field minus a radial island mask.

use noise::NoiseFn;

use crate::terrain::TerrainKind;
use crate::tilemap::Tilemap;

/// Noise-space distance between neighbouring tiles
pub const NOISE_SCALE: f64 = 0.1;

/// Distance of tile (x, y) from the grid centre, as a fraction of the
/// half-diagonal. 0 at the centre, 1 at the corners.
pub fn island_factor(x: usize, y: usize, tiles_x: usize, tiles_y: usize) -> f64 {
    let half_w = tiles_x as f64 / 2.0;
    let half_h = tiles_y as f64 / 2.0;

    let dx = x as f64 - half_w;
    let dy = y as f64 - half_h;
    let distance = (dx * dx + dy * dy).sqrt();
    let max_distance = (half_w * half_w + half_h * half_h).sqrt();

    distance / max_distance
}

/// Island-adjusted field value for a tile: noise mapped to [0, 1], minus the
/// radial bias scaled by `island_constant`. May leave [0, 1].
pub fn terrain_value<N: NoiseFn<f64, 2>>(
    noise: &N,
    x: usize,
    y: usize,
    tiles_x: usize,
    tiles_y: usize,
    island_constant: f64,
) -> f64 {
    let sample = noise.get([x as f64 * NOISE_SCALE, y as f64 * NOISE_SCALE]);
    let normalized = (sample + 1.0) / 2.0;
    normalized - island_factor(x, y, tiles_x, tiles_y) * island_constant
}

/// Classify every tile of a `tiles_x` x `tiles_y` grid.
///
/// Pure function of its inputs; relaxation happens afterwards.
pub fn classify_terrain<N: NoiseFn<f64, 2>>(
    noise: &N,
    tiles_x: usize,
    tiles_y: usize,
    island_constant: f64,
) -> Tilemap<TerrainKind> {
    Tilemap::from_fn(tiles_x, tiles_y, |x, y| {
        TerrainKind::classify(terrain_value(noise, x, y, tiles_x, tiles_y, island_constant))
    })
}
