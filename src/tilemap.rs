use serde::{Deserialize, Serialize};

/// A bounded 2D tile grid stored row-major. Lookups outside the grid return
/// `None`; nothing wraps, since island maps have a hard water border.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Build a grid by evaluating `f(x, y)` for every cell in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
    }

    /// Build a grid from rows of equal length. Returns `None` for ragged input.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            data: rows.into_iter().flatten().collect(),
        })
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "tile ({}, {}) outside {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Cell at `(x, y)`. Panics outside the grid; use `get_signed` for
    /// lookups that may fall off the edge.
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Signed lookup; `None` outside the grid.
    pub fn get_signed(&self, x: i64, y: i64) -> Option<&T> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.get(x as usize, y as usize))
    }

    /// Value at `(x + dx, y + dy)`, or `None` past the edge.
    pub fn offset(&self, x: usize, y: usize, (dx, dy): (i64, i64)) -> Option<&T> {
        self.get_signed(x as i64 + dx, y as i64 + dy)
    }

    /// Value of the neighbour in `dir`, or `None` past the edge.
    pub fn neighbor(&self, x: usize, y: usize, dir: Direction) -> Option<&T> {
        self.offset(x, y, dir.offset())
    }

    /// Neighbour values (up to 8) that exist around a cell.
    pub fn neighbors_8(&self, x: usize, y: usize) -> impl Iterator<Item = (Direction, &T)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbor(x, y, dir).map(|v| (dir, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.width.max(1))
    }
}

impl<T: PartialEq + Clone> Tilemap<T> {
    /// Directions from `dirs` whose neighbour equals `target`, in the order given.
    pub fn matching(&self, x: usize, y: usize, dirs: &[Direction], target: &T) -> Vec<Direction> {
        dirs.iter()
            .copied()
            .filter(|&dir| self.neighbor(x, y, dir) == Some(target))
            .collect()
    }

    /// True if any of the given offsets holds `target`.
    pub fn any_at(&self, x: usize, y: usize, offsets: &[(i64, i64)], target: &T) -> bool {
        offsets.iter().any(|&o| self.offset(x, y, o) == Some(target))
    }

    /// Number of cells that differ from `other` (grids of equal size).
    pub fn diff_count(&self, other: &Self) -> usize {
        self.data.iter().zip(&other.data).filter(|(a, b)| a != b).count()
    }
}

// =============================================================================
// COMPASS DIRECTIONS
// =============================================================================

/// Compass direction on the grid. North is towards y = 0, east towards +x.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    pub const CARDINAL: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

    /// (dx, dy) step for this direction
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::N => (0, -1),
            Direction::NE => (1, -1),
            Direction::E => (1, 0),
            Direction::SE => (1, 1),
            Direction::S => (0, 1),
            Direction::SW => (-1, 1),
            Direction::W => (-1, 0),
            Direction::NW => (-1, -1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::N => Direction::S,
            Direction::NE => Direction::SW,
            Direction::E => Direction::W,
            Direction::SE => Direction::NW,
            Direction::S => Direction::N,
            Direction::SW => Direction::NE,
            Direction::W => Direction::E,
            Direction::NW => Direction::SE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_iteration() {
        let map = Tilemap::from_fn(3, 2, |x, y| x + 10 * y);
        let cells: Vec<_> = map.iter().map(|(x, y, &v)| (x, y, v)).collect();
        assert_eq!(cells[0], (0, 0, 0));
        assert_eq!(cells[2], (2, 0, 2));
        assert_eq!(cells[3], (0, 1, 10));
        assert_eq!(map.rows().count(), 2);
    }

    #[test]
    fn test_edges_do_not_wrap() {
        let map = Tilemap::from_fn(4, 4, |x, y| (x, y));
        assert_eq!(map.neighbor(0, 0, Direction::W), None);
        assert_eq!(map.neighbor(0, 0, Direction::N), None);
        assert_eq!(map.neighbor(3, 3, Direction::SE), None);
        assert_eq!(map.neighbor(1, 1, Direction::NE), Some(&(2, 0)));
        assert_eq!(map.neighbors_8(0, 0).count(), 3);
        assert_eq!(map.neighbors_8(2, 2).count(), 8);
    }

    #[test]
    fn test_matching_keeps_requested_order() {
        let map = Tilemap::from_rows(vec![
            vec![1, 0, 1],
            vec![0, 0, 0],
            vec![1, 0, 0],
        ])
        .unwrap();
        let dirs = [Direction::SW, Direction::NW, Direction::SE, Direction::NE];
        assert_eq!(map.matching(1, 1, &dirs, &1), vec![Direction::SW, Direction::NW, Direction::NE]);
    }

    #[test]
    #[should_panic(expected = "outside 3x2 grid")]
    fn test_get_past_row_end_panics() {
        let map = Tilemap::from_fn(3, 2, |x, y| x + 10 * y);
        // would alias (0, 1) without the column check
        map.get(3, 0);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(Tilemap::from_rows(vec![vec![1, 2], vec![3]]).is_none());
    }

    #[test]
    fn test_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dy) = dir.offset();
            assert_eq!(dir.opposite().offset(), (-dx, -dy));
        }
    }
}
