//! 2D gradient (Perlin-style) noise over a seeded permutation table
//!
//! Corner gradients come from the 12-vector set of 3D improved Perlin noise,
//! projected onto the XY plane. Corner contributions are blended with plain
//! linear interpolation (no fade curve), which gives the blocky, angular
//! coastlines the island maps are tuned for.

use noise::NoiseFn;

use crate::permutation::{PermutationTable, TABLE_LEN};

/// Gradient set; only the x and y components take part in 2D sampling.
const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Gradient noise sampler. Pure: the same point always yields the same value.
#[derive(Clone, Debug)]
pub struct GradientNoise {
    perm: PermutationTable,
}

impl GradientNoise {
    pub fn new(perm: PermutationTable) -> Self {
        Self { perm }
    }

    pub fn from_seed(seed: i64) -> Self {
        Self::new(PermutationTable::from_seed(seed))
    }

    pub fn permutation(&self) -> &PermutationTable {
        &self.perm
    }

    /// Sample the field at (x, y). Nominally in [-1, 1], not clamped.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let x1 = x0 + 1;
        let y1 = y0 + 1;

        let sx = x - x0 as f64;
        let sy = y - y0 as f64;

        let n0 = self.dot_grid_gradient(x0, y0, x, y);
        let n1 = self.dot_grid_gradient(x1, y0, x, y);
        let ix0 = lerp(n0, n1, sx);

        let n0 = self.dot_grid_gradient(x0, y1, x, y);
        let n1 = self.dot_grid_gradient(x1, y1, x, y);
        let ix1 = lerp(n0, n1, sx);

        lerp(ix0, ix1, sy)
    }

    /// Dot product of the lattice point's gradient with the offset to (x, y).
    fn dot_grid_gradient(&self, ix: i64, iy: i64, x: f64, y: f64) -> f64 {
        let len = TABLE_LEN as i64;
        let px = ix.rem_euclid(len) as usize;
        let py = iy.rem_euclid(len);
        let index = (self.perm.get(px) as i64 + py).rem_euclid(len) as usize;
        let grad = &GRAD3[index % GRAD3.len()];

        let dx = x - ix as f64;
        let dy = y - iy as f64;
        dx * grad[0] + dy * grad[1]
    }
}

impl NoiseFn<f64, 2> for GradientNoise {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.sample(point[0], point[1])
    }
}

#[inline]
fn lerp(a0: f64, a1: f64, w: f64) -> f64 {
    (1.0 - w) * a0 + w * a1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_on_lattice_points() {
        let noise = GradientNoise::from_seed(8);
        for y in -5..5 {
            for x in -5..5 {
                assert_eq!(noise.sample(x as f64, y as f64), 0.0);
            }
        }
    }

    #[test]
    fn test_known_values_seed_8() {
        let noise = GradientNoise::from_seed(8);
        assert!((noise.sample(0.5, 0.5) - 0.25).abs() < 1e-12);
        assert!((noise.sample(-1.3, 2.7) - -0.042).abs() < 1e-9);
    }

    #[test]
    fn test_referentially_transparent() {
        let a = GradientNoise::from_seed(77);
        let b = GradientNoise::from_seed(77);
        for i in 0..200 {
            let x = i as f64 * 0.37 - 40.0;
            let y = i as f64 * -0.21 + 13.0;
            assert_eq!(a.sample(x, y), a.sample(x, y));
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
    }

    #[test]
    fn test_noise_fn_matches_sample() {
        let noise = GradientNoise::from_seed(3);
        assert_eq!(noise.get([1.25, -3.75]), noise.sample(1.25, -3.75));
    }

    #[test]
    fn test_values_stay_near_unit_range() {
        let noise = GradientNoise::from_seed(1234);
        for y in 0..100 {
            for x in 0..100 {
                let v = noise.sample(x as f64 * 0.1, y as f64 * 0.1);
                assert!(v.is_finite());
                assert!((-1.5..=1.5).contains(&v));
            }
        }
    }
}
