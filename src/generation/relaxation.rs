//! Grid relaxation passes
//!
//! Each pass sweeps the grid once in row-major order and rewrites cells in
//! place, so later cells in the same sweep see earlier rewrites. The passes run
//! on a fixed schedule (`RELAXATION_SCHEDULE`) that does not iterate to a fixed
//! point; residual violations are reported by `adjacency_violations`.

use log::debug;

use crate::terrain::TerrainKind;
use crate::tilemap::{Direction, Tilemap};

use TerrainKind::{Grass, Sand, Trees, Water};

/// Order in which diagonal neighbours are probed.
const CORNER_PROBE_ORDER: [Direction; 4] = [Direction::SW, Direction::NW, Direction::SE, Direction::NE];

/// Each diagonal in probe order with the cells the corner-conflict pass checks
/// around it, as offsets. The order matters because a cell may flip between
/// probes.
const CORNER_PROBES: [(Direction, [(i64, i64); 4]); 4] = [
    (Direction::SW, [(-1, -1), (0, -1), (1, 0), (1, 1)]),
    (Direction::NW, [(-1, 0), (0, -1), (1, -1), (1, 0)]),
    (Direction::SE, [(1, -1), (1, 0), (0, 1), (-1, 1)]),
    (Direction::NE, [(1, 1), (1, 0), (-1, 0), (-1, -1)]),
];

/// Five-cell fan facing N, E, S and W, checked in that order.
const PROTRUSION_FANS: [[(i64, i64); 5]; 4] = [
    [(-1, 0), (-1, -1), (0, -1), (1, -1), (1, 0)],
    [(0, -1), (1, -1), (1, 0), (1, 1), (0, 1)],
    [(-1, 0), (-1, 1), (0, 1), (1, 1), (1, 0)],
    [(0, -1), (-1, -1), (-1, 0), (-1, 1), (0, 1)],
];

/// One relaxation rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelaxationPass {
    /// (a) Grass/water cells bridging two same-kind diagonals across sand
    DiagonalPaths,
    /// (b) Grass/water cells forming a one-tile-wide corridor
    SingleTilePaths,
    /// (c) Grass touching water, sand touching trees
    ForbiddenAdjacency,
    /// (d) Two-diagonal corners with no sprite
    CornerConflicts,
    /// (e) Tiles sticking out alone in some direction
    IsolatedTiles,
}

/// The fixed pass order: a, b, c, d, e, a, e.
pub const RELAXATION_SCHEDULE: [RelaxationPass; 7] = [
    RelaxationPass::DiagonalPaths,
    RelaxationPass::SingleTilePaths,
    RelaxationPass::ForbiddenAdjacency,
    RelaxationPass::CornerConflicts,
    RelaxationPass::IsolatedTiles,
    RelaxationPass::DiagonalPaths,
    RelaxationPass::IsolatedTiles,
];

impl RelaxationPass {
    pub fn name(&self) -> &'static str {
        match self {
            RelaxationPass::DiagonalPaths => "diagonal paths",
            RelaxationPass::SingleTilePaths => "single-tile paths",
            RelaxationPass::ForbiddenAdjacency => "forbidden adjacency",
            RelaxationPass::CornerConflicts => "corner conflicts",
            RelaxationPass::IsolatedTiles => "isolated tiles",
        }
    }

    /// The per-cell rule: the kind a cell becomes, or `None` to keep it.
    pub fn rule(&self) -> fn(&Tilemap<TerrainKind>, usize, usize) -> Option<TerrainKind> {
        match self {
            RelaxationPass::DiagonalPaths => diagonal_path_fix,
            RelaxationPass::SingleTilePaths => single_tile_path_fix,
            RelaxationPass::ForbiddenAdjacency => forbidden_adjacency_fix,
            RelaxationPass::CornerConflicts => corner_conflict_fix,
            RelaxationPass::IsolatedTiles => isolated_tile_fix,
        }
    }

    /// Run one sweep over the grid. Returns the number of cells rewritten.
    pub fn apply(&self, grid: &mut Tilemap<TerrainKind>) -> usize {
        sweep(grid, self.rule())
    }
}

impl std::fmt::Display for RelaxationPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Cells rewritten by each step of the schedule
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelaxationReport {
    pub steps: Vec<(RelaxationPass, usize)>,
}

impl RelaxationReport {
    pub fn total_changes(&self) -> usize {
        self.steps.iter().map(|(_, n)| n).sum()
    }
}

/// Run the full relaxation schedule in place.
pub fn relax(grid: &mut Tilemap<TerrainKind>) -> RelaxationReport {
    let mut report = RelaxationReport::default();
    for pass in RELAXATION_SCHEDULE {
        let changed = pass.apply(grid);
        debug!("Relaxation pass '{}' rewrote {} cells", pass, changed);
        report.steps.push((pass, changed));
    }
    report
}

/// Visit cells in row-major order, writing each rule result back immediately.
fn sweep(
    grid: &mut Tilemap<TerrainKind>,
    rule: fn(&Tilemap<TerrainKind>, usize, usize) -> Option<TerrainKind>,
) -> usize {
    let mut changed = 0;
    for y in 0..grid.height {
        for x in 0..grid.width {
            if let Some(kind) = rule(grid, x, y) {
                if kind != *grid.get(x, y) {
                    grid.set(x, y, kind);
                    changed += 1;
                }
            }
        }
    }
    changed
}

/// The kind a cell flips to when a pass rejects it.
fn paired_kind(kind: TerrainKind) -> Option<TerrainKind> {
    match kind {
        Grass | Water => Some(Sand),
        Sand => Some(Grass),
        Trees => None,
    }
}

// =============================================================================
// PER-CELL RULES
// =============================================================================

/// (a) A grass or water cell whose only same-kind diagonals are one opposite
/// pair, with sand on the other pair, becomes sand.
pub fn diagonal_path_fix(grid: &Tilemap<TerrainKind>, x: usize, y: usize) -> Option<TerrainKind> {
    let kind = *grid.get(x, y);
    if !matches!(kind, Grass | Water) {
        return None;
    }

    let same = grid.matching(x, y, &CORNER_PROBE_ORDER, &kind);
    if same.len() != 2 {
        return None;
    }
    let sand = grid.matching(x, y, &CORNER_PROBE_ORDER, &Sand);
    let both = |set: &[Direction], a: Direction, b: Direction| set.contains(&a) && set.contains(&b);

    let bridged = if both(&same[..], Direction::SW, Direction::NE) {
        both(&sand[..], Direction::NW, Direction::SE)
    } else if both(&same[..], Direction::NW, Direction::SE) {
        both(&sand[..], Direction::SW, Direction::NE)
    } else {
        false
    };

    bridged.then_some(Sand)
}

/// (b) A grass or water cell with exactly two same-kind orthogonal
/// neighbours on opposite sides becomes sand.
pub fn single_tile_path_fix(grid: &Tilemap<TerrainKind>, x: usize, y: usize) -> Option<TerrainKind> {
    let kind = *grid.get(x, y);
    if !matches!(kind, Grass | Water) {
        return None;
    }

    let same = grid.matching(x, y, &Direction::CARDINAL, &kind);
    if same.len() != 2 {
        return None;
    }
    let corridor = same[0].opposite() == same[1];
    corridor.then_some(Sand)
}

/// (c) Grass touching water becomes sand; sand touching trees becomes grass.
pub fn forbidden_adjacency_fix(grid: &Tilemap<TerrainKind>, x: usize, y: usize) -> Option<TerrainKind> {
    let kind = *grid.get(x, y);
    let forbidden = kind.forbidden_neighbor()?;

    let touches = grid.neighbors_8(x, y).any(|(_, &n)| n == forbidden);
    if touches {
        paired_kind(kind)
    } else {
        None
    }
}

/// (d) For a cell with exactly two same-kind diagonals, each of those corners
/// is checked in probe order against its surroundings; if none hold the
/// cell's current kind, grass becomes sand and anything else becomes grass.
/// The cell's kind can change between the two checks, so a water or trees
/// corner that fails a check ends up as grass or sand.
pub fn corner_conflict_fix(grid: &Tilemap<TerrainKind>, x: usize, y: usize) -> Option<TerrainKind> {
    let original = *grid.get(x, y);
    let corners: Vec<&[(i64, i64); 4]> = CORNER_PROBES
        .iter()
        .filter(|(dir, _)| grid.neighbor(x, y, *dir) == Some(&original))
        .map(|(_, around)| around)
        .collect();
    if corners.len() != 2 {
        return None;
    }

    let mut current = original;
    for around in corners {
        if !grid.any_at(x, y, around, &current) {
            current = if current == Grass { Sand } else { Grass };
        }
    }

    (current != original).then_some(current)
}

/// (e) Grass, sand and water cells are checked against the fan facing N, E,
/// S and W in turn. Whenever a fan holds none of the cell's current kind the
/// cell flips to its paired kind, and later fans test the new kind.
pub fn isolated_tile_fix(grid: &Tilemap<TerrainKind>, x: usize, y: usize) -> Option<TerrainKind> {
    let original = *grid.get(x, y);
    if !matches!(original, Grass | Sand | Water) {
        return None;
    }

    let mut current = original;
    for fan in &PROTRUSION_FANS {
        if !grid.any_at(x, y, fan, &current) {
            current = paired_kind(current)?;
        }
    }

    (current != original).then_some(current)
}

// =============================================================================
// VIOLATION SCAN
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    GrassTouchesWater,
    SandTouchesTrees,
    /// Grass or water with same-kind neighbours on exactly two opposite sides
    Corridor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdjacencyViolation {
    pub x: usize,
    pub y: usize,
    pub kind: ViolationKind,
}

/// Every cell breaking an adjacency rule the passes are meant to enforce.
pub fn adjacency_violations(grid: &Tilemap<TerrainKind>) -> Vec<AdjacencyViolation> {
    let mut violations = Vec::new();

    for (x, y, &kind) in grid.iter() {
        if let Some(forbidden) = kind.forbidden_neighbor() {
            if grid.neighbors_8(x, y).any(|(_, &n)| n == forbidden) {
                let kind = if kind == Grass {
                    ViolationKind::GrassTouchesWater
                } else {
                    ViolationKind::SandTouchesTrees
                };
                violations.push(AdjacencyViolation { x, y, kind });
            }
        }
        if single_tile_path_fix(grid, x, y).is_some() {
            violations.push(AdjacencyViolation { x, y, kind: ViolationKind::Corridor });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Tilemap<TerrainKind> {
        let rows = rows
            .iter()
            .map(|r| r.chars().map(|c| TerrainKind::from_ascii_char(c).unwrap()).collect())
            .collect();
        Tilemap::from_rows(rows).unwrap()
    }

    fn apply(pass: RelaxationPass, rows: &[&str]) -> (Vec<String>, usize) {
        let mut g = grid(rows);
        let changed = pass.apply(&mut g);
        let out = g.rows().map(|r| r.iter().map(|k| k.ascii_char()).collect()).collect();
        (out, changed)
    }

    #[test]
    fn test_schedule_order() {
        use RelaxationPass::*;
        assert_eq!(
            RELAXATION_SCHEDULE,
            [DiagonalPaths, SingleTilePaths, ForbiddenAdjacency, CornerConflicts, IsolatedTiles, DiagonalPaths, IsolatedTiles]
        );
    }

    #[test]
    fn test_diagonal_bridge_becomes_sand() {
        let (out, changed) = apply(RelaxationPass::DiagonalPaths, &["..,", ".,.", ",.."]);
        assert_eq!(out, vec!["..,", "...", ",.."]);
        assert_eq!(changed, 1);
    }

    #[test]
    fn test_diagonal_without_sand_corners_kept() {
        let g = grid(&["~~,", "~,~", ",~~"]);
        assert_eq!(diagonal_path_fix(&g, 1, 1), None);
    }

    #[test]
    fn test_corridor_becomes_sand() {
        let (out, changed) = apply(RelaxationPass::SingleTilePaths, &[".,.", ".,.", ".,."]);
        assert_eq!(out, vec![".,.", "...", ".,."]);
        assert_eq!(changed, 1);
    }

    #[test]
    fn test_bend_is_not_a_corridor() {
        let g = grid(&["~~~", "~~.", "..."]);
        assert_eq!(single_tile_path_fix(&g, 1, 1), None);
    }

    #[test]
    fn test_forbidden_adjacency_single_sweep() {
        // The sweep is not iterated: the sand that turns to grass at (1, 1)
        // ends up diagonal to water.
        let (out, changed) = apply(RelaxationPass::ForbiddenAdjacency, &["~,.", "..T"]);
        assert_eq!(out, vec!["~.,", ".,T"]);
        assert_eq!(changed, 3);
    }

    #[test]
    fn test_corner_conflict_flips_grass() {
        let (out, changed) = apply(
            RelaxationPass::CornerConflicts,
            &[".....", ".,...", "..,..", "...,.", "....."],
        );
        assert_eq!(out, vec![".....", ".,...", ".....", "...,.", "....."]);
        assert_eq!(changed, 1);
    }

    #[test]
    fn test_corner_conflict_water_ends_as_sand() {
        // water flips to grass at the NW probe, then grass finds no grass at SE
        let g = grid(&["~..", ".~.", "..~"]);
        assert_eq!(corner_conflict_fix(&g, 1, 1), Some(Sand));
    }

    #[test]
    fn test_corner_conflict_trees_become_grass() {
        let g = grid(&["T,,", ",T,", ",,T"]);
        assert_eq!(corner_conflict_fix(&g, 1, 1), Some(Grass));
    }

    #[test]
    fn test_probe_tables_follow_compass() {
        let dirs: Vec<Direction> = CORNER_PROBES.iter().map(|(d, _)| *d).collect();
        assert_eq!(dirs, CORNER_PROBE_ORDER);
        for (dir, around) in CORNER_PROBES {
            // the diagonal itself is never one of its own surroundings
            assert!(!around.contains(&dir.offset()));
        }
        for (fan, dir) in PROTRUSION_FANS.iter().zip(Direction::CARDINAL) {
            assert!(fan.contains(&dir.offset()), "{dir:?}");
        }
    }

    #[test]
    fn test_lone_sand_in_grass_becomes_grass() {
        let (out, changed) = apply(RelaxationPass::IsolatedTiles, &[",,,,,", ",,.,,", ",,,,,"]);
        assert_eq!(out, vec![",,,,,", ",,,,,", ",,,,,"]);
        assert_eq!(changed, 1);
    }

    #[test]
    fn test_isolated_tiles_see_earlier_rewrites() {
        let (out, changed) = apply(RelaxationPass::IsolatedTiles, &["...", ".,.", ",,,"]);
        assert_eq!(out, vec!["...", ",,,", ",,,"]);
        assert_eq!(changed, 2);
    }

    #[test]
    fn test_lone_sand_in_water_flips_back() {
        // Four flips, one per fan, land back on sand.
        let g = grid(&["~~~~", "~~~~", "~~.~", "~~~~"]);
        assert_eq!(isolated_tile_fix(&g, 2, 2), None);
    }

    #[test]
    fn test_lone_trees_kept() {
        let g = grid(&["...", ".T.", "..."]);
        for pass in RELAXATION_SCHEDULE {
            assert_eq!(pass.rule()(&g, 1, 1), None, "{pass}");
        }
    }

    #[test]
    fn test_violation_scan() {
        let g = grid(&["~,.", ".T.", ",,,"]);
        let found = adjacency_violations(&g);
        assert!(found.contains(&AdjacencyViolation { x: 1, y: 0, kind: ViolationKind::GrassTouchesWater }));
        assert!(found.contains(&AdjacencyViolation { x: 2, y: 0, kind: ViolationKind::SandTouchesTrees }));
        assert!(found.contains(&AdjacencyViolation { x: 1, y: 2, kind: ViolationKind::Corridor }));
    }

    #[test]
    fn test_relax_reports_every_step() {
        let mut g = grid(&[".,.", ".,.", ".,."]);
        let report = relax(&mut g);
        assert_eq!(report.steps.len(), RELAXATION_SCHEDULE.len());
        assert_eq!(report.steps[1], (RelaxationPass::SingleTilePaths, 1));
    }
}
