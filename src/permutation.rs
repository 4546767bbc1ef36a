//! Seeded permutation table for the gradient noise function.

use crate::seeds::SeededRng;

/// Number of distinct entries in the shuffled permutation
pub const PERMUTATION_SIZE: usize = 256;

/// Length of the lookup table (the permutation tiled twice for wrap-around)
pub const TABLE_LEN: usize = PERMUTATION_SIZE * 2;

/// A 512-entry lookup table holding a shuffle of 0..=255 twice over.
///
/// Invariant: `table[i] == table[i + 256]` for every `i < 256`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermutationTable {
    values: [u8; TABLE_LEN],
}

impl PermutationTable {
    /// Build the table for a seed (zero picks a random seed).
    pub fn from_seed(seed: i64) -> Self {
        Self::from_rng(&mut SeededRng::new(seed))
    }

    /// Build the table from an existing random stream.
    ///
    /// Durstenfeld shuffle of the identity permutation, walking `i` from 255
    /// down to 1 and swapping with `floor(next() * (i + 1))`.
    pub fn from_rng(rng: &mut SeededRng) -> Self {
        let mut perm: Vec<u8> = (0..=255).collect();

        for i in (1..PERMUTATION_SIZE).rev() {
            let j = (rng.next_f64() * (i + 1) as f64).floor() as usize;
            perm.swap(i, j);
        }

        let mut values = [0u8; TABLE_LEN];
        for (i, value) in values.iter_mut().enumerate() {
            *value = perm[i & (PERMUTATION_SIZE - 1)];
        }

        Self { values }
    }

    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.values[index]
    }

    pub fn len(&self) -> usize {
        TABLE_LEN
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_value_appears_twice() {
        for seed in [1, 8, 42, -7, 123_456_789] {
            let table = PermutationTable::from_seed(seed);
            let mut counts = [0usize; PERMUTATION_SIZE];
            for &v in table.as_slice() {
                counts[v as usize] += 1;
            }
            assert!(counts.iter().all(|&c| c == 2), "seed {seed}");

            for i in 0..PERMUTATION_SIZE {
                assert_eq!(table.get(i), table.get(i + PERMUTATION_SIZE));
            }
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(PermutationTable::from_seed(8), PermutationTable::from_seed(8));
        assert_ne!(PermutationTable::from_seed(8), PermutationTable::from_seed(9));
    }

    #[test]
    fn test_seed_8_prefix() {
        let table = PermutationTable::from_seed(8);
        assert_eq!(&table.as_slice()[..8], &[41, 238, 197, 194, 69, 94, 253, 63]);
        assert_eq!(table.len(), TABLE_LEN);
    }
}
