//! Edge classification for grass and water cells bordering sand
//!
//! Every grass or water cell is sorted into inner corner, outer corner,
//! border or plain by its sand neighbours, with the sprite rotation that
//! turns the sand side of the sprite towards the sand. Water cells on an edge
//! join the shoreline set, which keeps wave foam off the coast.

use std::collections::BTreeSet;

use crate::terrain::{Rotation, TerrainKind};
use crate::tilemap::{Direction, Tilemap};

/// Orthogonal directions in the order they win the border tie-break.
const BORDER_PRIORITY: [(Direction, Rotation); 4] = [
    (Direction::W, Rotation::Deg0),
    (Direction::S, Rotation::Deg270),
    (Direction::E, Rotation::Deg180),
    (Direction::N, Rotation::Deg90),
];

/// Recognised outer corners: two orthogonal sand sides plus the diagonal between them.
const OUTER_CORNERS: [(Direction, Direction, Direction, Rotation); 4] = [
    (Direction::W, Direction::S, Direction::SW, Rotation::Deg0),
    (Direction::W, Direction::N, Direction::NW, Rotation::Deg90),
    (Direction::E, Direction::N, Direction::NE, Rotation::Deg180),
    (Direction::E, Direction::S, Direction::SE, Rotation::Deg270),
];

const DIAGONAL_PROBE_ORDER: [Direction; 4] = [Direction::SW, Direction::NW, Direction::SE, Direction::NE];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeClass {
    /// Exactly one diagonal sand neighbour and no orthogonal ones
    InnerCorner,
    /// Sand on two adjacent sides and the diagonal between them
    OuterCorner,
    /// Sand on at least one side
    Border,
    /// No sand contact worth a sprite
    Plain,
}

/// A sprite placement in tile coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: usize,
    pub y: usize,
    pub rotation: Rotation,
}

/// Classified edge placements for a whole grid
#[derive(Clone, Debug, Default)]
pub struct Decorations {
    pub outer_corners: Vec<Placement>,
    pub inner_corners: Vec<Placement>,
    pub borders: Vec<Placement>,
    /// Grass cells with no sand contact (candidates for flowers)
    pub plain_grass: Vec<Placement>,
    /// Water cells touching sand
    pub shorelines: BTreeSet<(usize, usize)>,
}

/// Classify one cell. `None` for sand and trees.
pub fn classify_edge(grid: &Tilemap<TerrainKind>, x: usize, y: usize) -> Option<(EdgeClass, Rotation)> {
    let kind = *grid.get(x, y);
    if !matches!(kind, TerrainKind::Grass | TerrainKind::Water) {
        return None;
    }

    let sand = TerrainKind::Sand;
    let sides = grid.matching(x, y, &Direction::CARDINAL, &sand);
    let diagonals = grid.matching(x, y, &DIAGONAL_PROBE_ORDER, &sand);

    if diagonals.len() == 1 && sides.is_empty() {
        let rotation = match diagonals[0] {
            Direction::SW => Rotation::Deg0,
            Direction::NW => Rotation::Deg90,
            Direction::NE => Rotation::Deg180,
            _ => Rotation::Deg270,
        };
        return Some((EdgeClass::InnerCorner, rotation));
    }

    if !diagonals.is_empty() && sides.len() == 2 {
        let corner = OUTER_CORNERS.iter().find(|(a, b, diagonal, _)| {
            sides.contains(a) && sides.contains(b) && diagonals.contains(diagonal)
        });
        if let Some(&(_, _, _, rotation)) = corner {
            return Some((EdgeClass::OuterCorner, rotation));
        }
    }

    if let Some(&(_, rotation)) = BORDER_PRIORITY.iter().find(|(dir, _)| sides.contains(dir)) {
        return Some((EdgeClass::Border, rotation));
    }

    Some((EdgeClass::Plain, Rotation::Deg0))
}

/// Classify every grass and water cell in row-major order.
pub fn classify_decorations(grid: &Tilemap<TerrainKind>) -> Decorations {
    let mut decorations = Decorations::default();

    for (x, y, &kind) in grid.iter() {
        let Some((class, rotation)) = classify_edge(grid, x, y) else {
            continue;
        };
        let placement = Placement { x, y, rotation };

        if kind == TerrainKind::Water && class != EdgeClass::Plain {
            decorations.shorelines.insert((x, y));
        }

        match class {
            EdgeClass::InnerCorner => decorations.inner_corners.push(placement),
            EdgeClass::OuterCorner => decorations.outer_corners.push(placement),
            EdgeClass::Border => decorations.borders.push(placement),
            EdgeClass::Plain if kind == TerrainKind::Grass => decorations.plain_grass.push(placement),
            EdgeClass::Plain => {}
        }
    }

    decorations
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

    #[test]
    fn test_inner_corner() {
        let g = grid(&[",,,", ",,,", ".,,"]);
        assert_eq!(classify_edge(&g, 1, 1), Some((EdgeClass::InnerCorner, Rotation::Deg0)));

        let g = grid(&[",,.", ",,,", ",,,"]);
        assert_eq!(classify_edge(&g, 1, 1), Some((EdgeClass::InnerCorner, Rotation::Deg180)));
    }

    #[test]
    fn test_outer_corner() {
        let g = grid(&[",,,", ".,,", "..,"]);
        assert_eq!(classify_edge(&g, 1, 1), Some((EdgeClass::OuterCorner, Rotation::Deg0)));

        let g = grid(&[",..", ",,.", ",,,"]);
        assert_eq!(classify_edge(&g, 1, 1), Some((EdgeClass::OuterCorner, Rotation::Deg180)));
    }

    #[test]
    fn test_opposite_sides_fall_back_to_border() {
        let g = grid(&[",,.", ".,.", ",,,"]);
        assert_eq!(classify_edge(&g, 1, 1), Some((EdgeClass::Border, Rotation::Deg0)));
    }

    #[test]
    fn test_border_rotation_per_side() {
        let cases = [
            ([",.,", ",,,", ",,,"], Rotation::Deg90),
            ([",,,", ",,.", ",,,"], Rotation::Deg180),
            ([",,,", ",,,", ",.,"], Rotation::Deg270),
            ([",,,", ".,,", ",,,"], Rotation::Deg0),
        ];
        for (rows, rotation) in cases {
            let g = grid(&rows);
            assert_eq!(classify_edge(&g, 1, 1), Some((EdgeClass::Border, rotation)), "{rows:?}");
        }
    }

    #[test]
    fn test_sand_and_trees_unclassified() {
        let g = grid(&["...", ".T.", "..."]);
        assert_eq!(classify_edge(&g, 1, 1), None);
        assert_eq!(classify_edge(&g, 0, 0), None);
    }

    #[test]
    fn test_shoreline_collects_edge_water_only() {
        let g = grid(&["~~~~", "~~~~", "...."]);
        let decorations = classify_decorations(&g);

        let expected: BTreeSet<_> = (0..4).map(|x| (x, 1)).collect();
        assert_eq!(decorations.shorelines, expected);
        assert_eq!(decorations.borders.len(), 4);
        assert!(decorations.plain_grass.is_empty());
    }

    #[test]
    fn test_plain_grass_listed() {
        let g = grid(&[",,,", ",,,", ",,,"]);
        let decorations = classify_decorations(&g);
        assert_eq!(decorations.plain_grass.len(), 9);
        assert!(decorations.shorelines.is_empty());
    }
}
