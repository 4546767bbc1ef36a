use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use island_generator::ascii;
use island_generator::config::MapConfig;
use island_generator::export;
use island_generator::generation::generate_map_async;
use island_generator::terrain::TerrainKind;
use island_generator::tileset::{Tileset, TilesetCanvas};
use island_generator::viewer;

#[derive(Parser, Debug)]
#[command(name = "island_generator")]
#[command(about = "Generate procedural island tilemaps")]
struct Args {
    /// Load settings from a JSON config file (flags below override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective settings to a JSON config file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Random seed (0 picks a random one)
    #[arg(short, long, allow_hyphen_values = true)]
    seed: Option<i64>,

    /// Strength of the radial island falloff
    #[arg(short = 'f', long)]
    island_factor: Option<f64>,

    /// World width in pixels
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// World height in pixels
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Tile size in pixels
    #[arg(short = 't', long)]
    tile_size: Option<u32>,

    /// Tileset sheet PNG (uses a generated placeholder sheet if not specified)
    #[arg(long)]
    tileset: Option<PathBuf>,

    /// Write ground, overlay and composite PNGs with this path prefix
    #[arg(short, long)]
    output: Option<String>,

    /// Export the flat terrain map to a PNG
    #[arg(long)]
    terrain_png: Option<PathBuf>,

    /// Pixels per tile in the flat terrain map
    #[arg(long, default_value = "4")]
    terrain_scale: u32,

    /// Export the map as an ASCII text file
    #[arg(long)]
    ascii: Option<PathBuf>,

    /// Export grid, obstacles and trees as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print the map to the terminal in colour
    #[arg(long)]
    print: bool,

    /// Open the interactive viewer
    #[arg(long)]
    view: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut MapConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(factor) = self.island_factor {
            config.island_factor = factor;
        }
        if let Some(width) = self.width {
            config.world_width = width;
        }
        if let Some(height) = self.height {
            config.world_height = height;
        }
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MapConfig::load(path)?,
        None => MapConfig::default(),
    };
    args.apply_overrides(&mut config);
    config.validate()?;

    if let Some(ref path) = args.save_config {
        config.save(path)?;
        println!("Saved config to: {}", path.display());
    }

    let tileset = match &args.tileset {
        Some(path) => Tileset::load(path, config.tile_size)?,
        None => Tileset::placeholder(config.tile_size)?,
    };

    let (tiles_x, tiles_y) = config.tile_counts();
    println!("Generating island with seed: {}", config.seed);
    println!("Map size: {}x{} px ({}x{} tiles of {}px)", config.world_width, config.world_height, tiles_x, tiles_y, config.tile_size);

    let mut canvas = TilesetCanvas::new(tileset.clone(), config.world_width, config.world_height);
    let map = pollster::block_on(generate_map_async(&config, &mut canvas))?;

    let total = map.grid.len();
    println!("Seed: {}", map.seeds);
    for kind in TerrainKind::ALL {
        let count = map.count(kind);
        println!("  {:6} {:>6} ({:.1}%)", kind.name(), count, 100.0 * count as f64 / total as f64);
    }
    println!("Obstacles: {}, trees: {}, shoreline tiles: {}", map.obstacles.len(), map.trees.len(), map.shorelines.len());
    println!("Relaxation rewrote {} cells", map.relaxation.total_changes());
    if !map.violations.is_empty() {
        println!("Residual adjacency violations: {}", map.violations.len());
    }

    if args.print {
        ascii::print_colored_ascii_map(&map.grid);
    }

    if let Some(ref prefix) = args.output {
        let layers = canvas.layers().ok_or("no raster layers to export")?;
        let paths = export::export_layers(layers, prefix)?;
        for path in &paths {
            println!("Exported layer to: {}", path.display());
        }
    }

    if let Some(ref path) = args.terrain_png {
        export::export_terrain_map(&map.grid, args.terrain_scale, path)?;
        println!("Exported terrain map to: {}", path.display());
    }

    if let Some(ref path) = args.ascii {
        ascii::export_map_file(&map, path)?;
        println!("Exported ASCII map to: {}", path.display());
    }

    if let Some(ref path) = args.json {
        export::export_map_json(&map, path)?;
        println!("Exported map data to: {}", path.display());
    }

    if args.view {
        config.seed = map.seeds.master;
        viewer::run_viewer(config, tileset)?;
    }

    Ok(())
}
