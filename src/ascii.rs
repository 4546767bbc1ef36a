//! ASCII rendering and export for generated island maps
//!
//! Renders the terrain grid, its edge decoration classes or its obstacle mask
//! as text, and writes a map file with header, legend and statistics.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use chrono::Local;

use crate::generation::{classify_edge, EdgeClass, GeneratedMap};
use crate::terrain::{Rotation, TerrainKind};
use crate::tilemap::Tilemap;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AsciiMode {
    /// One character per terrain kind
    Terrain,
    /// Edge classes with rotation hints
    Edges,
    /// Blocking tiles only
    Obstacles,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Terrain => "Terrain",
            AsciiMode::Edges => "Edges",
            AsciiMode::Obstacles => "Obstacles",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Terrain, AsciiMode::Edges, AsciiMode::Obstacles]
    }
}

/// Character for an edge class. Inner corners use the keyboard corner keys
/// (q p z m) for the quadrant holding the sand.
pub fn edge_char(class: EdgeClass, rotation: Rotation) -> char {
    match (class, rotation) {
        (EdgeClass::InnerCorner, Rotation::Deg0) => 'z',
        (EdgeClass::InnerCorner, Rotation::Deg90) => 'q',
        (EdgeClass::InnerCorner, Rotation::Deg180) => 'p',
        (EdgeClass::InnerCorner, Rotation::Deg270) => 'm',
        (EdgeClass::OuterCorner, Rotation::Deg0) => 'L',
        (EdgeClass::OuterCorner, Rotation::Deg90) => 'F',
        (EdgeClass::OuterCorner, Rotation::Deg180) => '7',
        (EdgeClass::OuterCorner, Rotation::Deg270) => 'J',
        (EdgeClass::Border, Rotation::Deg0) => '[',
        (EdgeClass::Border, Rotation::Deg90) => '^',
        (EdgeClass::Border, Rotation::Deg180) => ']',
        (EdgeClass::Border, Rotation::Deg270) => '_',
        (EdgeClass::Plain, _) => ' ',
    }
}

/// Render a grid to an ASCII string, one line per row
pub fn render_ascii_map(grid: &Tilemap<TerrainKind>, mode: AsciiMode) -> String {
    let mut result = String::with_capacity((grid.width + 1) * grid.height);

    for y in 0..grid.height {
        for x in 0..grid.width {
            let kind = *grid.get(x, y);
            let ch = match mode {
                AsciiMode::Terrain => kind.ascii_char(),
                AsciiMode::Edges => match classify_edge(grid, x, y) {
                    Some((class, rotation)) => edge_char(class, rotation),
                    None => kind.ascii_char(),
                },
                AsciiMode::Obstacles => {
                    if kind.is_obstacle() {
                        '#'
                    } else {
                        ' '
                    }
                }
            };
            result.push(ch);
        }
        result.push('\n');
    }

    result
}

/// Parse a terrain rendering back into a grid. `None` on unknown characters
/// or ragged rows.
pub fn parse_ascii_map(text: &str) -> Option<Tilemap<TerrainKind>> {
    let rows = text
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| line.chars().map(TerrainKind::from_ascii_char).collect::<Option<Vec<_>>>())
        .collect::<Option<Vec<_>>>()?;
    Tilemap::from_rows(rows)
}

/// Legend for terrain characters
pub fn terrain_legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== TERRAIN LEGEND ===\n");
    for kind in TerrainKind::ALL {
        let blocking = if kind.is_obstacle() { " (blocking)" } else { "" };
        legend.push_str(&format!("  {} {}{}\n", kind.ascii_char(), kind, blocking));
    }
    legend
}

pub fn calculate_terrain_stats(grid: &Tilemap<TerrainKind>) -> HashMap<TerrainKind, usize> {
    let mut stats = HashMap::new();
    for (_, _, &kind) in grid.iter() {
        *stats.entry(kind).or_insert(0) += 1;
    }
    stats
}

/// Write the map file: header, terrain view, legend and statistics.
pub fn export_map_file(map: &GeneratedMap, path: impl AsRef<Path>) -> io::Result<()> {
    let mut file = File::create(path)?;
    let total = map.grid.len();

    // Header
    writeln!(file, "=== ISLAND GENERATOR MAP FILE ===")?;
    writeln!(file, "Seed: {}", map.seeds.master)?;
    writeln!(file, "Size: {}x{} tiles ({}x{}px)", map.tiles_x(), map.tiles_y(), map.world_width(), map.world_height())?;
    writeln!(file, "Tile size: {}px", map.tile_size)?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== MAP (Terrain View) ===")?;
    write!(file, "{}", render_ascii_map(&map.grid, AsciiMode::Terrain))?;
    writeln!(file)?;

    write!(file, "{}", terrain_legend())?;
    writeln!(file)?;

    // Statistics
    writeln!(file, "=== STATISTICS ===")?;
    writeln!(file, "Total tiles: {}", total)?;
    let stats = calculate_terrain_stats(&map.grid);
    for kind in TerrainKind::ALL {
        let count = stats.get(&kind).copied().unwrap_or(0);
        let pct = 100.0 * count as f64 / total.max(1) as f64;
        writeln!(file, "  {:8} {} {:>6} ({:>5.1}%)", kind.name(), kind.ascii_char(), count, pct)?;
    }
    writeln!(file, "Obstacles: {}", map.obstacles.len())?;
    writeln!(file, "Shoreline tiles: {}", map.shorelines.len())?;
    writeln!(file)?;

    writeln!(file, "=== RELAXATION ===")?;
    for (pass, changed) in &map.relaxation.steps {
        writeln!(file, "  {:20} {:>5}", pass.name(), changed)?;
    }
    writeln!(file, "Residual violations: {}", map.violations.len())?;

    Ok(())
}

/// Format a single character with ANSI true color background
pub fn ansi_colored_char(ch: char, fg: (u8, u8, u8), bg: (u8, u8, u8)) -> String {
    format!(
        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{}\x1b[0m",
        fg.0, fg.1, fg.2,
        bg.0, bg.1, bg.2,
        ch
    )
}

/// Terrain view with each cell tinted by its map colour
pub fn render_colored_ascii_map(grid: &Tilemap<TerrainKind>) -> String {
    let mut result = String::new();
    for row in grid.rows() {
        for &kind in row {
            let bg = kind.color();
            let fg = (bg.0.saturating_add(80), bg.1.saturating_add(80), bg.2.saturating_add(80));
            result.push_str(&ansi_colored_char(kind.ascii_char(), fg, bg));
        }
        result.push('\n');
    }
    result
}

pub fn print_colored_ascii_map(grid: &Tilemap<TerrainKind>) {
    print!("{}", render_colored_ascii_map(grid));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &str) -> Tilemap<TerrainKind> {
        parse_ascii_map(rows).unwrap()
    }

    #[test]
    fn test_terrain_render_round_trips() {
        let text = "~~..\n~.,,\n..,T\n";
        let g = grid(text);
        assert_eq!((g.width, g.height), (4, 3));
        assert_eq!(render_ascii_map(&g, AsciiMode::Terrain), text);
    }

    #[test]
    fn test_obstacle_mode() {
        let g = grid("~.\n,T\n");
        assert_eq!(render_ascii_map(&g, AsciiMode::Obstacles), "# \n #\n");
    }

    #[test]
    fn test_edge_mode_marks_border() {
        let g = grid("...\n.,.\n...\n");
        let rendered = render_ascii_map(&g, AsciiMode::Edges);
        // lone grass surrounded by sand: west side wins the border tie-break
        assert_eq!(rendered, "...\n.[.\n...\n");
    }

    #[test]
    fn test_parse_rejects_unknown_and_ragged() {
        assert!(parse_ascii_map("~~\n~?\n").is_none());
        assert!(parse_ascii_map("~~\n~\n").is_none());
    }

    #[test]
    fn test_stats() {
        let stats = calculate_terrain_stats(&grid("~~.\n,,T\n"));
        assert_eq!(stats[&TerrainKind::Water], 2);
        assert_eq!(stats[&TerrainKind::Grass], 2);
        assert_eq!(stats.get(&TerrainKind::Sand), Some(&1));
    }

    #[test]
    fn test_legend_lists_every_kind() {
        let legend = terrain_legend();
        for kind in TerrainKind::ALL {
            assert!(legend.contains(kind.name()));
        }
        assert!(legend.contains("~ water (blocking)"));
    }
}
