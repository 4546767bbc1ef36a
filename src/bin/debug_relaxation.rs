//! Debug tool: print the terrain grid after classification and after every
//! relaxation step, with per-step change counts.
//!
//! Usage: debug_relaxation [seed] [tiles_x] [tiles_y] [island_factor]

use island_generator::ascii::{render_ascii_map, AsciiMode};
use island_generator::generation::{adjacency_violations, classify_terrain, RELAXATION_SCHEDULE};
use island_generator::perlin::GradientNoise;
use island_generator::seeds::MapSeeds;
use log::info;
use std::env;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let seed: i64 = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(8);
    let tiles_x: usize = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(40);
    let tiles_y: usize = args.get(3).map(|s| s.parse()).transpose()?.unwrap_or(40);
    let island_factor: f64 = args.get(4).map(|s| s.parse()).transpose()?.unwrap_or(0.5);

    if tiles_x == 0 || tiles_y == 0 {
        return Err("grid needs at least one tile in each direction".into());
    }

    let seeds = MapSeeds::from_master(seed);
    info!("Relaxation debug for {} on {}x{} tiles", seeds, tiles_x, tiles_y);

    let noise = GradientNoise::from_seed(seeds.terrain);
    let mut grid = classify_terrain(&noise, tiles_x, tiles_y, island_factor);

    println!("=== RAW CLASSIFICATION (seed={}) ===", seeds.master);
    print!("{}", render_ascii_map(&grid, AsciiMode::Terrain));
    println!("violations: {}", adjacency_violations(&grid).len());

    for (step, pass) in RELAXATION_SCHEDULE.iter().enumerate() {
        let before = grid.clone();
        let changed = pass.apply(&mut grid);
        println!();
        println!("=== STEP {} : {} ({} cells changed) ===", step + 1, pass, changed);
        print!("{}", render_ascii_map(&grid, AsciiMode::Terrain));
        println!("diff vs previous step: {}", grid.diff_count(&before));
        println!("violations: {}", adjacency_violations(&grid).len());
    }

    let residual = adjacency_violations(&grid);
    println!();
    println!("=== EDGES ===");
    print!("{}", render_ascii_map(&grid, AsciiMode::Edges));
    for v in &residual {
        println!("residual {:?} at ({}, {})", v.kind, v.x, v.y);
    }

    Ok(())
}
