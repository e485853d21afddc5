use async_trait::async_trait;
use quiz_core::model::{QuizSession, ResultTally};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::blob::{
    QUIZ_PROGRESS_KEY, TALLY_KEY, decode_progress, decode_tally, encode_progress, encode_tally,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Key/value text storage, one blob per key.
///
/// Both persisted stores sit on top of this; an adapter only has to move
/// strings around.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backend cannot be reached.
    async fn read_blob(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the write fails.
    async fn write_blob(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the blob under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the delete fails.
    async fn remove_blob(&self, key: &str) -> Result<(), StorageError>;
}

/// Repository contract for the in-progress quiz.
#[async_trait]
pub trait QuizProgressRepository: Send + Sync {
    /// Load the saved session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored blob is incompatible,
    /// or other storage errors.
    async fn load_progress(&self) -> Result<Option<QuizSession>, StorageError>;

    /// Persist the full session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    async fn save_progress(&self, session: &QuizSession) -> Result<(), StorageError>;

    /// Forget the saved session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the blob cannot be removed.
    async fn clear_progress(&self) -> Result<(), StorageError>;
}

/// Repository contract for the result tally.
#[async_trait]
pub trait TallyRepository: Send + Sync {
    /// Load the saved tally.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored blob is incompatible,
    /// or other storage errors.
    async fn load_tally(&self) -> Result<Option<ResultTally>, StorageError>;

    /// Persist the full tally.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the tally cannot be stored.
    async fn save_tally(&self, tally: &ResultTally) -> Result<(), StorageError>;
}

#[async_trait]
impl<T> QuizProgressRepository for T
where
    T: BlobStore + ?Sized,
{
    async fn load_progress(&self) -> Result<Option<QuizSession>, StorageError> {
        let Some(raw) = self.read_blob(QUIZ_PROGRESS_KEY).await? else {
            return Ok(None);
        };
        decode_progress(&raw).map(Some)
    }

    async fn save_progress(&self, session: &QuizSession) -> Result<(), StorageError> {
        let raw = encode_progress(session)?;
        self.write_blob(QUIZ_PROGRESS_KEY, &raw).await?;
        tracing::debug!(
            position = session.position(),
            answers = session.answered_count(),
            "saved quiz progress"
        );
        Ok(())
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        self.remove_blob(QUIZ_PROGRESS_KEY).await
    }
}

#[async_trait]
impl<T> TallyRepository for T
where
    T: BlobStore + ?Sized,
{
    async fn load_tally(&self) -> Result<Option<ResultTally>, StorageError> {
        let Some(raw) = self.read_blob(TALLY_KEY).await? else {
            return Ok(None);
        };
        decode_tally(&raw).map(Some)
    }

    async fn save_tally(&self, tally: &ResultTally) -> Result<(), StorageError> {
        let raw = encode_tally(tally)?;
        self.write_blob(TALLY_KEY, &raw).await?;
        tracing::debug!(total = tally.total_count(), "saved result tally");
        Ok(())
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            blobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Raw blob text under `key`, as a browser's storage inspector would show it.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.blobs.lock().ok()?.get(key).cloned()
    }

    /// Overwrite the raw blob text under `key`, bypassing encoding.
    pub fn put_raw(&self, key: &str, value: impl Into<String>) {
        if let Ok(mut guard) = self.blobs.lock() {
            guard.insert(key.to_owned(), value.into());
        }
    }
}

#[async_trait]
impl BlobStore for InMemoryRepository {
    async fn read_blob(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn write_blob(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove_blob(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates both repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn QuizProgressRepository>,
    pub tallies: Arc<dyn TallyRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_blob_store(InMemoryRepository::new())
    }

    /// Use one blob store for both repositories.
    #[must_use]
    pub fn from_blob_store<B>(store: B) -> Self
    where
        B: BlobStore + 'static,
    {
        let store = Arc::new(store);
        let progress: Arc<dyn QuizProgressRepository> = store.clone();
        let tallies: Arc<dyn TallyRepository> = store;
        Self { progress, tallies }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::FixedSeed;
    use quiz_core::model::{Answer, Choice, Dimension, QuestionId};

    #[tokio::test]
    async fn round_trips_progress() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_progress().await.unwrap().is_none());

        let mut session = QuizSession::new();
        session
            .add_answer(Answer::new(QuestionId::new(1), Choice::A, Dimension::E))
            .unwrap();
        session.calculate_result();
        repo.save_progress(&session).await.unwrap();

        let fetched = repo.load_progress().await.unwrap().unwrap();
        assert_eq!(fetched, session);

        repo.clear_progress().await.unwrap();
        assert!(repo.load_progress().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn round_trips_tally() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_tally().await.unwrap().is_none());

        let tally = ResultTally::seeded(&mut FixedSeed::uniform(100)).unwrap();
        repo.save_tally(&tally).await.unwrap();
        assert_eq!(repo.load_tally().await.unwrap(), Some(tally));
    }

    #[tokio::test]
    async fn stores_are_addressed_separately() {
        let repo = InMemoryRepository::new();
        let tally = ResultTally::seeded(&mut FixedSeed::uniform(1)).unwrap();
        repo.save_tally(&tally).await.unwrap();
        repo.save_progress(&QuizSession::new()).await.unwrap();

        repo.clear_progress().await.unwrap();
        assert!(repo.raw(QUIZ_PROGRESS_KEY).is_none());
        assert!(repo.raw(TALLY_KEY).is_some());
    }

    #[tokio::test]
    async fn corrupt_blob_surfaces_serialization_error() {
        let repo = InMemoryRepository::new();
        repo.put_raw(TALLY_KEY, r#"{"totalCount": 1, "distribution": {}}"#);
        assert!(matches!(
            repo.load_tally().await,
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn storage_handles_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Storage>();
        assert_send_sync::<InMemoryRepository>();
    }
}
