//! Seed management and the deterministic random stream used by map generation
//!
//! Terrain generation draws from a linear congruential generator so that the
//! same seed always yields the same permutation table on every platform.
//! Decorative scatter (flowers, foam, rocks) gets its own derived seed so it can
//! be varied without touching the terrain.

use rand::Rng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// LCG multiplier (glibc constants)
pub const LCG_MULTIPLIER: u64 = 1_103_515_245;
/// LCG increment
pub const LCG_INCREMENT: u64 = 12_345;
/// LCG modulus, 2^31
pub const LCG_MODULUS: u64 = 1 << 31;

/// Linear congruential generator producing floats in [0, 1).
///
/// `state = (a * state + c) mod 2^31`. The state stays below 2^31, so the
/// product fits in a u64 without overflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a generator from a seed. A zero seed is replaced by a random one.
    pub fn new(seed: i64) -> Self {
        Self::from_resolved(resolve_seed(seed))
    }

    /// Create a generator from a seed exactly as given, zero included.
    pub fn from_resolved(seed: i64) -> Self {
        Self {
            state: normalize_seed(seed),
        }
    }

    /// Advance the state and return the next value in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.state = (LCG_MULTIPLIER * self.state + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }

    /// Current internal state
    pub fn state(&self) -> u64 {
        self.state
    }
}

/// Map a seed of any sign into the generator's state space.
pub fn normalize_seed(seed: i64) -> u64 {
    seed.rem_euclid(LCG_MODULUS as i64) as u64
}

/// Replace an unset (zero) seed with an unpredictable non-zero one.
///
/// This is the only place non-determinism enters generation.
pub fn resolve_seed(seed: i64) -> i64 {
    if seed != 0 {
        return seed;
    }
    rand::thread_rng().gen_range(1..LCG_MODULUS as i64)
}

/// Seeds for each randomised stage of map generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapSeeds {
    /// Master seed after resolution (never zero)
    pub master: i64,
    /// Seed for the permutation table, and therefore the terrain
    pub terrain: i64,
    /// Seed for decorative scatter on the raster layers
    pub decoration: u64,
}

impl MapSeeds {
    /// Derive all seeds from a master seed. Zero picks a random master.
    pub fn from_master(master: i64) -> Self {
        let master = resolve_seed(master);
        Self {
            master,
            terrain: master,
            decoration: derive_seed(master, "decoration"),
        }
    }

    pub fn builder(master: i64) -> MapSeedsBuilder {
        MapSeedsBuilder::new(master)
    }
}

/// Builder for overriding individual seeds while deriving the rest
pub struct MapSeedsBuilder {
    seeds: MapSeeds,
}

impl MapSeedsBuilder {
    pub fn new(master: i64) -> Self {
        Self {
            seeds: MapSeeds::from_master(master),
        }
    }

    /// Override the decoration seed
    pub fn decoration(mut self, seed: u64) -> Self {
        self.seeds.decoration = seed;
        self
    }

    pub fn build(self) -> MapSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and a stage name.
fn derive_seed(master: i64, stage: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    stage.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for MapSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MapSeeds {{ master: {}, terrain: {}, decoration: {} }}",
            self.master, self.terrain, self.decoration
        )
    }
}
