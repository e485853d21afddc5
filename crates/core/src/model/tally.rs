use thiserror::Error;

use crate::model::ResultCode;
use crate::seed::SeedProvider;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TallyError {
    #[error("total count ({total}) does not match distribution sum ({sum})")]
    CountMismatch { total: u64, sum: u64 },

    #[error("distribution is missing a count for {0}")]
    MissingCode(ResultCode),

    #[error("distribution lists {0} more than once")]
    DuplicateCode(ResultCode),

    #[error("tally overflowed")]
    Overflow,
}

/// One row of a ranked distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TallyEntry {
    pub code: ResultCode,
    pub count: u64,
    pub percentage: f64,
    pub rank: usize,
}

/// Device-local histogram of how often each result code was produced.
///
/// `total_count` always equals the sum of the sixteen per-code counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTally {
    total_count: u64,
    counts: [u64; 16],
}

impl ResultTally {
    /// Build a tally from per-code counts in [`ResultCode::ALL`] order.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::Overflow` if the counts cannot be summed.
    pub fn from_counts(counts: [u64; 16]) -> Result<Self, TallyError> {
        let total_count = counts
            .iter()
            .try_fold(0_u64, |acc, c| acc.checked_add(*c))
            .ok_or(TallyError::Overflow)?;
        Ok(Self {
            total_count,
            counts,
        })
    }

    /// Draw a fresh starting distribution from `seed`.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::Overflow` if the seeded counts cannot be summed.
    pub fn seeded(seed: &mut dyn SeedProvider) -> Result<Self, TallyError> {
        Self::from_counts(ResultCode::ALL.map(|code| seed.initial_count(code)))
    }

    /// Rehydrate a tally from persisted storage.
    ///
    /// Every code must appear exactly once and the counts must add up to `total_count`.
    ///
    /// # Errors
    ///
    /// Returns `TallyError` describing the first inconsistency found.
    pub fn from_persisted(
        total_count: u64,
        distribution: impl IntoIterator<Item = (ResultCode, u64)>,
    ) -> Result<Self, TallyError> {
        let mut counts: [Option<u64>; 16] = [None; 16];
        for (code, count) in distribution {
            let slot = &mut counts[code.index()];
            if slot.is_some() {
                return Err(TallyError::DuplicateCode(code));
            }
            *slot = Some(count);
        }

        let mut resolved = [0_u64; 16];
        for (code, (out, count)) in ResultCode::ALL.iter().zip(resolved.iter_mut().zip(counts)) {
            *out = count.ok_or(TallyError::MissingCode(*code))?;
        }

        let tally = Self::from_counts(resolved)?;
        if tally.total_count != total_count {
            return Err(TallyError::CountMismatch {
                total: total_count,
                sum: tally.total_count,
            });
        }
        Ok(tally)
    }

    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    #[must_use]
    pub fn count(&self, code: ResultCode) -> u64 {
        self.counts[code.index()]
    }

    /// Per-code counts in canonical order.
    pub fn distribution(&self) -> impl Iterator<Item = (ResultCode, u64)> + '_ {
        ResultCode::ALL.into_iter().zip(self.counts.iter().copied())
    }

    /// Record one more occurrence of `code`.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::Overflow` if either counter would wrap; the tally is unchanged.
    pub fn increment(&mut self, code: ResultCode) -> Result<(), TallyError> {
        let idx = code.index();
        let count = self.counts[idx].checked_add(1).ok_or(TallyError::Overflow)?;
        let total = self.total_count.checked_add(1).ok_or(TallyError::Overflow)?;
        self.counts[idx] = count;
        self.total_count = total;
        Ok(())
    }

    /// Share of `code` in percent, rounded to one decimal. `0.0` for an empty tally.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self, code: ResultCode) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        round1(self.count(code) as f64 / self.total_count as f64 * 100.0)
    }

    /// 1-based rank of `code` by count, most common first.
    ///
    /// Equal counts keep canonical code order.
    #[must_use]
    pub fn rank(&self, code: ResultCode) -> usize {
        let own = self.count(code);
        let ahead = self
            .distribution()
            .filter(|(other, count)| *count > own || (*count == own && other.index() < code.index()))
            .count();
        ahead + 1
    }

    /// Full distribution sorted by count descending (stable on canonical order).
    #[must_use]
    pub fn rankings(&self) -> Vec<TallyEntry> {
        let mut ordered: Vec<(ResultCode, u64)> = self.distribution().collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1));
        ordered
            .into_iter()
            .enumerate()
            .map(|(i, (code, count))| TallyEntry {
                code,
                count,
                percentage: self.percentage(code),
                rank: i + 1,
            })
            .collect()
    }

    /// The `n` most common codes.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<TallyEntry> {
        let mut rankings = self.rankings();
        rankings.truncate(n);
        rankings
    }

    /// The `n` least common codes, rarest first.
    #[must_use]
    pub fn bottom(&self, n: usize) -> Vec<TallyEntry> {
        self.rankings().into_iter().rev().take(n).collect()
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::FixedSeed;

    fn code(raw: &str) -> ResultCode {
        raw.parse().unwrap()
    }

    fn flat(count: u64) -> ResultTally {
        ResultTally::from_counts([count; 16]).unwrap()
    }

    #[test]
    fn increment_keeps_sum_equal_to_total() {
        let mut tally = flat(10);
        for raw in ["ENFP", "ENFP", "ISTJ", "INTP", "ESFJ"] {
            tally.increment(code(raw)).unwrap();
            let sum: u64 = tally.distribution().map(|(_, c)| c).sum();
            assert_eq!(sum, tally.total_count());
        }
        assert_eq!(tally.total_count(), 165);
        assert_eq!(tally.count(code("ENFP")), 12);
    }

    #[test]
    fn increment_rejects_overflow_without_mutation() {
        let mut counts = [0_u64; 16];
        counts[0] = u64::MAX;
        let mut tally = ResultTally::from_counts(counts).unwrap();
        let before = tally.clone();
        assert_eq!(tally.increment(ResultCode::ALL[0]), Err(TallyError::Overflow));
        assert_eq!(tally, before);
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        let mut counts = [0_u64; 16];
        counts[code("INFJ").index()] = 1;
        counts[code("ENTP").index()] = 2;
        let tally = ResultTally::from_counts(counts).unwrap();
        assert!((tally.percentage(code("INFJ")) - 33.3).abs() < f64::EPSILON);
        assert!((tally.percentage(code("ENTP")) - 66.7).abs() < f64::EPSILON);
        assert!(tally.percentage(code("ESTJ")).abs() < f64::EPSILON);
    }

    #[test]
    fn percentage_of_empty_tally_is_zero() {
        let tally = flat(0);
        assert!(tally.percentage(code("ISTJ")).abs() < f64::EPSILON);
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let mut seed = FixedSeed::from_counts([
            120, 580, 333, 333, 101, 450, 599, 210, 210, 377, 480, 150, 222, 333, 100, 512,
        ]);
        let tally = ResultTally::seeded(&mut seed).unwrap();
        let sum: f64 = ResultCode::ALL.iter().map(|c| tally.percentage(*c)).sum();
        assert!((sum - 100.0).abs() <= 0.2, "sum was {sum}");
    }

    #[test]
    fn rank_orders_by_count_with_canonical_ties() {
        let mut counts = [5_u64; 16];
        counts[code("ENTJ").index()] = 50;
        counts[code("ISFP").index()] = 50;
        counts[code("INTP").index()] = 1;
        let tally = ResultTally::from_counts(counts).unwrap();

        // ISFP precedes ENTJ in canonical order
        assert_eq!(tally.rank(code("ISFP")), 1);
        assert_eq!(tally.rank(code("ENTJ")), 2);
        assert_eq!(tally.rank(code("ISTJ")), 3);
        assert_eq!(tally.rank(code("INTP")), 16);
    }

    #[test]
    fn rankings_agree_with_rank() {
        let mut seed = FixedSeed::from_counts([
            120, 580, 333, 333, 101, 450, 599, 210, 210, 377, 480, 150, 222, 333, 100, 512,
        ]);
        let tally = ResultTally::seeded(&mut seed).unwrap();
        for entry in tally.rankings() {
            assert_eq!(tally.rank(entry.code), entry.rank, "{}", entry.code);
        }
        assert_eq!(tally.top(1)[0].code, ResultCode::ALL[6]);
        let bottom = tally.bottom(3);
        assert_eq!(bottom[0].code, ResultCode::ALL[14]);
        assert_eq!(bottom[1].code, ResultCode::ALL[4]);
        assert_eq!(bottom[2].code, ResultCode::ALL[0]);
    }

    #[test]
    fn from_persisted_checks_invariants() {
        let pairs: Vec<(ResultCode, u64)> = ResultCode::ALL.iter().map(|c| (*c, 2)).collect();
        assert!(ResultTally::from_persisted(32, pairs.clone()).is_ok());
        assert_eq!(
            ResultTally::from_persisted(33, pairs.clone()),
            Err(TallyError::CountMismatch { total: 33, sum: 32 })
        );

        let missing = pairs[1..].to_vec();
        assert_eq!(
            ResultTally::from_persisted(30, missing),
            Err(TallyError::MissingCode(ResultCode::ALL[0]))
        );

        let mut duplicated = pairs;
        duplicated.push((ResultCode::ALL[3], 1));
        assert_eq!(
            ResultTally::from_persisted(33, duplicated),
            Err(TallyError::DuplicateCode(ResultCode::ALL[3]))
        );
    }
}
