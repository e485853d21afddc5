//! Random starting distributions for a fresh tally.

use quiz_core::SeedProvider;
use quiz_core::model::ResultCode;
use quiz_core::seed::{SEED_MAX, SEED_MIN};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws every count from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandomSeed;

impl SeedProvider for ThreadRandomSeed {
    fn initial_count(&mut self, _code: ResultCode) -> u64 {
        rand::rng().random_range(SEED_MIN..SEED_MAX)
    }
}

/// Reproducible counts from a `u64` seed.
#[derive(Debug, Clone)]
pub struct StdRngSeed {
    rng: StdRng,
}

impl StdRngSeed {
    #[must_use]
    pub fn from_u64(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl SeedProvider for StdRngSeed {
    fn initial_count(&mut self, _code: ResultCode) -> u64 {
        self.rng.random_range(SEED_MIN..SEED_MAX)
    }
}
