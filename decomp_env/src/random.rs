//! Random source abstraction for environment instances.

/// The only source of randomness an environment may use.
///
/// # Implementations
///
/// - **Production**: `EntropySource` - OS-seeded `StdRng`
/// - **Reproducible**: `SeededSource` - `ChaCha8Rng(seed)`
///
/// # Determinism
///
/// Two sources constructed with the same seed must yield identical draws
/// for identical call sequences. Reseeding replaces the generator state in
/// place; the owning environment is not rebuilt.
pub trait RandomSource {
    /// Uniform integer in `[0, n)`.
    ///
    /// Callers must not pass `n == 0`.
    fn choice(&mut self, n: usize) -> usize;

    /// Uniform float in `[0, 1)`.
    fn rand(&mut self) -> f64;

    /// Replaces the generator state with one derived from `seed`.
    fn reseed(&mut self, seed: u64);

    /// Returns the seed in effect, if the source was seeded explicitly.
    fn seed(&self) -> Option<u64>;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn choice(&mut self, n: usize) -> usize {
        (**self).choice(n)
    }

    fn rand(&mut self) -> f64 {
        (**self).rand()
    }

    fn reseed(&mut self, seed: u64) {
        (**self).reseed(seed)
    }

    fn seed(&self) -> Option<u64> {
        (**self).seed()
    }
}
