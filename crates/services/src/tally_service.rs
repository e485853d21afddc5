use std::sync::Arc;

use quiz_core::SeedProvider;
use quiz_core::model::{ResultCode, ResultTally, TallyEntry};
use storage::repository::{StorageError, TallyRepository};

use crate::error::TallyServiceError;

/// Owns the device-local result tally and persists it after every change.
///
/// When the stored tally could not be read because the backend failed, the
/// service runs on an in-memory seed and never writes, so the stored counts
/// survive. An explicit [`TallyService::reseed`] lifts that.
pub struct TallyService {
    tallies: Arc<dyn TallyRepository>,
    tally: ResultTally,
    degraded: bool,
}

impl TallyService {
    /// Restore the saved tally, seeding a new one when there is none.
    ///
    /// An unreadable blob is replaced by a freshly seeded tally. A backend
    /// failure seeds in memory only.
    ///
    /// # Errors
    ///
    /// Returns `TallyServiceError::Tally` if the seeded counts overflow.
    pub async fn load_or_seed(
        tallies: Arc<dyn TallyRepository>,
        seed: &mut dyn SeedProvider,
    ) -> Result<Self, TallyServiceError> {
        let degraded = match tallies.load_tally().await {
            Ok(Some(tally)) => {
                tracing::debug!(total = tally.total_count(), "tally loaded");
                return Ok(Self {
                    tallies,
                    tally,
                    degraded: false,
                });
            }
            Ok(None) => false,
            Err(StorageError::Serialization(err)) => {
                tracing::warn!(error = %err, "saved tally is unreadable; reseeding");
                false
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "could not load saved tally; using an unsaved seed for this run"
                );
                true
            }
        };

        let service = Self {
            tallies,
            tally: ResultTally::seeded(seed)?,
            degraded,
        };
        tracing::info!(total = service.tally.total_count(), degraded, "seeded new tally");
        service.persist().await;
        Ok(service)
    }

    /// Throw away the current counts and start again from `seed`.
    ///
    /// # Errors
    ///
    /// Returns `TallyServiceError::Tally` if the seeded counts overflow.
    pub async fn reseed(&mut self, seed: &mut dyn SeedProvider) -> Result<(), TallyServiceError> {
        self.tally = ResultTally::seeded(seed)?;
        self.degraded = false;
        tracing::info!(total = self.tally.total_count(), "reseeded tally");
        self.persist().await;
        Ok(())
    }

    /// Count one more occurrence of `code` and save.
    ///
    /// # Errors
    ///
    /// Returns `TallyServiceError::Tally` if a counter would overflow.
    pub async fn record(&mut self, code: ResultCode) -> Result<(), TallyServiceError> {
        self.tally.increment(code)?;
        tracing::info!(%code, total = self.tally.total_count(), "result recorded");
        self.persist().await;
        Ok(())
    }

    /// `true` while the stored tally is being left alone after a failed load.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    #[must_use]
    pub fn tally(&self) -> &ResultTally {
        &self.tally
    }

    /// Number of participants, seeded counts included.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.tally.total_count()
    }

    #[must_use]
    pub fn percentage(&self, code: ResultCode) -> f64 {
        self.tally.percentage(code)
    }

    #[must_use]
    pub fn rank(&self, code: ResultCode) -> usize {
        self.tally.rank(code)
    }

    #[must_use]
    pub fn rankings(&self) -> Vec<TallyEntry> {
        self.tally.rankings()
    }

    #[must_use]
    pub fn top(&self, n: usize) -> Vec<TallyEntry> {
        self.tally.top(n)
    }

    #[must_use]
    pub fn bottom(&self, n: usize) -> Vec<TallyEntry> {
        self.tally.bottom(n)
    }

    async fn persist(&self) {
        if self.degraded {
            tracing::debug!("tally not saved; stored copy was never loaded");
            return;
        }
        if let Err(err) = self.tallies.save_tally(&self.tally).await {
            tracing::warn!(error = %err, "failed to save tally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::FixedSeed;
    use storage::blob::TALLY_KEY;
    use storage::repository::InMemoryRepository;

    fn code(raw: &str) -> ResultCode {
        raw.parse().unwrap()
    }

    #[tokio::test]
    async fn seeds_and_saves_when_nothing_is_stored() {
        let repo = InMemoryRepository::new();
        let service = TallyService::load_or_seed(
            Arc::new(repo.clone()),
            &mut FixedSeed::uniform(150),
        )
        .await
        .unwrap();

        assert_eq!(service.total_count(), 2400);
        assert!(repo.raw(TALLY_KEY).is_some());
    }

    #[tokio::test]
    async fn stored_tally_wins_over_seed() {
        let repo = InMemoryRepository::new();
        let mut first = TallyService::load_or_seed(
            Arc::new(repo.clone()),
            &mut FixedSeed::uniform(100),
        )
        .await
        .unwrap();
        first.record(code("ENFP")).await.unwrap();

        let second = TallyService::load_or_seed(
            Arc::new(repo.clone()),
            &mut FixedSeed::uniform(500),
        )
        .await
        .unwrap();
        assert_eq!(second.total_count(), 1601);
        assert_eq!(second.tally().count(code("ENFP")), 101);
        assert_eq!(second.rank(code("ENFP")), 1);
    }

    #[tokio::test]
    async fn unreadable_blob_is_reseeded() {
        let repo = InMemoryRepository::new();
        repo.put_raw(TALLY_KEY, r#"{"totalCount": 5, "distribution": {"ESTJ": 4}}"#);

        let service = TallyService::load_or_seed(
            Arc::new(repo.clone()),
            &mut FixedSeed::uniform(100),
        )
        .await
        .unwrap();
        assert_eq!(service.total_count(), 1600);
        assert!(repo.raw(TALLY_KEY).unwrap().contains("\"totalCount\":1600"));
    }

    #[tokio::test]
    async fn reseed_replaces_counts() {
        let repo = InMemoryRepository::new();
        let mut service = TallyService::load_or_seed(
            Arc::new(repo.clone()),
            &mut FixedSeed::uniform(100),
        )
        .await
        .unwrap();
        service.record(code("ISTP")).await.unwrap();

        service.reseed(&mut FixedSeed::uniform(200)).await.unwrap();
        assert_eq!(service.total_count(), 3200);
        assert_eq!(service.tally().count(code("ISTP")), 200);
    }

    #[tokio::test]
    async fn top_and_bottom_follow_counts() {
        let mut counts = [100_u64; 16];
        counts[code("INTJ").index()] = 300;
        counts[code("ESFP").index()] = 10;
        let service = TallyService::load_or_seed(
            Arc::new(InMemoryRepository::new()),
            &mut FixedSeed::from_counts(counts),
        )
        .await
        .unwrap();

        assert_eq!(service.top(1)[0].code, code("INTJ"));
        assert_eq!(service.bottom(1)[0].code, code("ESFP"));
        assert_eq!(service.rankings().len(), 16);
        assert_eq!(service.rank(code("ESFP")), 16);
    }
}
