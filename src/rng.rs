//! Random number source for dungeon generation
//!
//! Wraps a seeded ChaCha RNG so that a given seed always produces the same
//! dungeon, on every platform.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Upper bound (exclusive) of the increment folded into the chained seed on every draw
const SEED_CHAIN_STEP: u64 = 1000;

/// Deterministic integer source used by every generation step
///
/// Each draw also advances a chained seed value. The chain never feeds back
/// into the returned numbers; it only records how far the source has advanced.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
    seed: u64,
    chained_seed: u64,
}

impl RandomSource {
    /// Create a new source with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            chained_seed: 0,
        }
    }

    /// Create a new source with a random seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Restart the sequence from a new seed
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    /// The seed this source was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Running total of the per-draw chain increments
    pub fn chained_seed(&self) -> u64 {
        self.chained_seed
    }

    /// Returns a value in `min..=max`
    ///
    /// # Panics
    ///
    /// Panics if `max < min`.
    pub fn next_in_range(&mut self, min: i32, max: i32) -> i32 {
        assert!(max >= min, "invalid range {min}..={max}");

        let step = self.rng.gen_range(0..SEED_CHAIN_STEP);
        self.chained_seed = self.chained_seed.wrapping_add(step);

        self.rng.gen_range(min..=max)
    }

    /// Percentile roll in `0..=100`
    pub fn roll_percent(&mut self) -> i32 {
        self.next_in_range(0, 100)
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_inclusive() {
        let mut rng = RandomSource::new(7);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..500 {
            let n = rng.next_in_range(2, 5);
            assert!((2..=5).contains(&n));
            seen_min |= n == 2;
            seen_max |= n == 5;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = RandomSource::new(1);
        assert_eq!(rng.next_in_range(4, 4), 4);
        assert_eq!(rng.next_in_range(-3, -3), -3);
    }

    #[test]
    #[should_panic]
    fn test_inverted_range_panics() {
        let mut rng = RandomSource::new(1);
        rng.next_in_range(5, 4);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomSource::new(42);
        let mut b = RandomSource::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_in_range(0, 1000), b.next_in_range(0, 1000));
        }
        assert_eq!(a.chained_seed(), b.chained_seed());
    }

    #[test]
    fn test_chain_advances_and_reseed_resets() {
        let mut rng = RandomSource::new(3);
        let first: Vec<i32> = (0..10).map(|_| rng.next_in_range(0, 99)).collect();
        // 10 draws of at most 999 each
        assert!(rng.chained_seed() <= 10 * 999);

        rng.reseed(3);
        assert_eq!(rng.chained_seed(), 0);
        let again: Vec<i32> = (0..10).map(|_| rng.next_in_range(0, 99)).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn test_roll_percent_bounds() {
        let mut rng = RandomSource::new(9);
        for _ in 0..1000 {
            let roll = rng.roll_percent();
            assert!((0..=100).contains(&roll));
        }
    }
}
