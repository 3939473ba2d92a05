//! Production implementation of RandomSource using OS entropy.

use crate::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Production random source seeded from OS entropy.
///
/// Draws are not reproducible until `reseed` is called, after which the
/// source behaves like any seeded `StdRng`.
pub struct EntropySource {
    rng: StdRng,

    /// Seed installed by `reseed`, if any
    seed: Option<u64>,
}

impl EntropySource {
    /// Creates a new source from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropySource {
    fn choice(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    fn rand(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.seed = Some(seed);
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }
}
