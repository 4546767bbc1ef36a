//! Obstacles and tree entities derived from a finished terrain grid, plus
//! the viewport filters and collision tests the game loop runs against them.

use serde::{Deserialize, Serialize};

use crate::terrain::TerrainKind;
use crate::tilemap::Tilemap;

/// Top-left pixel corner of a blocking tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: u32,
    pub y: u32,
}

impl Obstacle {
    pub fn bounds(&self, tile_size: u32) -> Bounds {
        let (x, y, ts) = (self.x as f64, self.y as f64, tile_size as f64);
        Bounds::new(x, x + ts, y, y + ts)
    }
}

/// Axis-aligned rectangle in world pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self { left, right, top, bottom }
    }

    /// Rectangle of `width` x `height` starting at (x, y)
    pub fn from_origin(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, x + width, y, y + height)
    }

    /// Grow every side by `margin`
    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            self.left - margin,
            self.right + margin,
            self.top - margin,
            self.bottom + margin,
        )
    }

    /// Touching edges count as overlap.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        !(self.left > other.right
            || self.right < other.left
            || self.top > other.bottom
            || self.bottom < other.top)
    }
}

/// Anything the game loop updates and can hit.
pub trait Collidable {
    fn update(&mut self, dt: f64);

    fn bounds(&self) -> Bounds;

    fn take_damage(&mut self, amount: f64);
}

/// Collision circle for a trees cell
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Tree {
    /// Tree centred on tile (tile_x, tile_y)
    pub fn at_tile(tile_x: usize, tile_y: usize, tile_size: u32) -> Self {
        let ts = tile_size as f64;
        Self {
            x: tile_x as f64 * ts + ts / 2.0,
            y: tile_y as f64 * ts + ts / 2.0,
            radius: ts / 2.0,
        }
    }

    pub fn circle(&self) -> Circle {
        Circle { x: self.x, y: self.y, radius: self.radius }
    }
}

impl Collidable for Tree {
    fn update(&mut self, _dt: f64) {}

    fn bounds(&self) -> Bounds {
        Bounds::new(
            self.x - self.radius,
            self.x + self.radius,
            self.y - self.radius,
            self.y + self.radius,
        )
    }

    // Trees are indestructible.
    fn take_damage(&mut self, _amount: f64) {}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

// =============================================================================
// EXTRACTION
// =============================================================================

/// One obstacle per water or trees cell, row-major.
pub fn extract_obstacles(grid: &Tilemap<TerrainKind>, tile_size: u32) -> Vec<Obstacle> {
    grid.iter()
        .filter(|(_, _, kind)| kind.is_obstacle())
        .map(|(x, y, _)| Obstacle {
            x: x as u32 * tile_size,
            y: y as u32 * tile_size,
        })
        .collect()
}

/// One tree entity per trees cell, row-major.
pub fn extract_trees(grid: &Tilemap<TerrainKind>, tile_size: u32) -> Vec<Tree> {
    grid.iter()
        .filter(|(_, _, kind)| **kind == TerrainKind::Trees)
        .map(|(x, y, _)| Tree::at_tile(x, y, tile_size))
        .collect()
}

// =============================================================================
// FILTERS AND COLLISION
// =============================================================================

/// Obstacles whose tile rectangle overlaps `bounds`.
pub fn filter_obstacles(obstacles: &[Obstacle], bounds: &Bounds, tile_size: u32) -> Vec<Obstacle> {
    obstacles
        .iter()
        .filter(|o| o.bounds(tile_size).overlaps(bounds))
        .copied()
        .collect()
}

/// Collidables whose bounds overlap `bounds`.
pub fn filter_collidables<'a, C: Collidable>(items: &'a [C], bounds: &Bounds) -> Vec<&'a C> {
    items.iter().filter(|item| item.bounds().overlaps(bounds)).collect()
}

/// Circle against every obstacle tile. Grazing contact does not count.
pub fn circle_hits_obstacle(circle: &Circle, obstacles: &[Obstacle], tile_size: u32) -> bool {
    obstacles.iter().any(|o| {
        let rect = o.bounds(tile_size);
        let closest_x = circle.x.clamp(rect.left, rect.right);
        let closest_y = circle.y.clamp(rect.top, rect.bottom);
        let dx = circle.x - closest_x;
        let dy = circle.y - closest_y;
        dx * dx + dy * dy < circle.radius * circle.radius
    })
}

pub fn circles_overlap(a: &Circle, b: &Circle) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt() < a.radius + b.radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Tilemap<TerrainKind> {
        let rows = ["~..", ".,T", "~T,"]
            .iter()
            .map(|r| r.chars().map(|c| TerrainKind::from_ascii_char(c).unwrap()).collect())
            .collect();
        Tilemap::from_rows(rows).unwrap()
    }

    #[test]
    fn test_extract_obstacles_row_major() {
        let obstacles = extract_obstacles(&grid(), 16);
        assert_eq!(
            obstacles,
            vec![
                Obstacle { x: 0, y: 0 },
                Obstacle { x: 32, y: 16 },
                Obstacle { x: 0, y: 32 },
                Obstacle { x: 16, y: 32 },
            ]
        );
    }

    #[test]
    fn test_extract_trees_centred() {
        let trees = extract_trees(&grid(), 16);
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0], Tree { x: 40.0, y: 24.0, radius: 8.0 });
        assert_eq!(trees[1], Tree { x: 24.0, y: 40.0, radius: 8.0 });
    }

    #[test]
    fn test_filter_obstacles_inclusive_edges() {
        let obstacles = vec![Obstacle { x: 0, y: 0 }, Obstacle { x: 32, y: 0 }, Obstacle { x: 64, y: 0 }];
        // right edge of the view touches the second tile's left edge
        let view = Bounds::from_origin(0.0, 0.0, 32.0, 16.0);
        let visible = filter_obstacles(&obstacles, &view, 16);
        assert_eq!(visible, vec![Obstacle { x: 0, y: 0 }, Obstacle { x: 32, y: 0 }]);

        let wider = filter_obstacles(&obstacles, &view.expand(32.0), 16);
        assert_eq!(wider.len(), 3);
    }

    #[test]
    fn test_filter_collidables() {
        let trees = vec![Tree::at_tile(0, 0, 16), Tree::at_tile(10, 10, 16)];
        let view = Bounds::from_origin(0.0, 0.0, 100.0, 100.0);
        let hits = filter_collidables(&trees, &view);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].x, 8.0);
    }

    #[test]
    fn test_circle_against_tile() {
        let obstacles = vec![Obstacle { x: 16, y: 16 }];
        let inside = Circle { x: 24.0, y: 24.0, radius: 1.0 };
        let near = Circle { x: 10.0, y: 24.0, radius: 7.0 };
        let grazing = Circle { x: 10.0, y: 24.0, radius: 6.0 };
        assert!(circle_hits_obstacle(&inside, &obstacles, 16));
        assert!(circle_hits_obstacle(&near, &obstacles, 16));
        assert!(!circle_hits_obstacle(&grazing, &obstacles, 16));
        assert!(!circle_hits_obstacle(&inside, &[], 16));
    }

    #[test]
    fn test_circles_overlap() {
        let a = Circle { x: 0.0, y: 0.0, radius: 5.0 };
        let b = Circle { x: 8.0, y: 0.0, radius: 4.0 };
        let c = Circle { x: 9.0, y: 0.0, radius: 4.0 };
        assert!(circles_overlap(&a, &b));
        assert!(!circles_overlap(&a, &c));
    }

    #[test]
    fn test_tree_is_inert() {
        let mut tree = Tree::at_tile(1, 1, 16);
        let before = tree;
        tree.update(0.5);
        tree.take_damage(100.0);
        assert_eq!(tree, before);
    }
}
