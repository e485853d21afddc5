//! Starting distribution for a brand-new tally.
//!
//! A device with no stored statistics shows a pre-populated chart instead of
//! an empty one. Where those numbers come from is pluggable so tests can pin
//! them down.

use crate::model::ResultCode;

/// Lowest count a seeded code can start with (inclusive).
pub const SEED_MIN: u64 = 100;
/// Upper bound for a seeded count (exclusive).
pub const SEED_MAX: u64 = 600;

/// Supplies the initial count for each result code.
pub trait SeedProvider {
    fn initial_count(&mut self, code: ResultCode) -> u64;
}

impl<F> SeedProvider for F
where
    F: FnMut(ResultCode) -> u64,
{
    fn initial_count(&mut self, code: ResultCode) -> u64 {
        self(code)
    }
}

/// Deterministic seed, mostly for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSeed {
    counts: [u64; 16],
}

impl FixedSeed {
    /// Same starting count for every code.
    #[must_use]
    pub fn uniform(count: u64) -> Self {
        Self { counts: [count; 16] }
    }

    /// Explicit counts in [`ResultCode::ALL`] order.
    #[must_use]
    pub fn from_counts(counts: [u64; 16]) -> Self {
        Self { counts }
    }
}

impl SeedProvider for FixedSeed {
    fn initial_count(&mut self, code: ResultCode) -> u64 {
        self.counts[code.index()]
    }
}
