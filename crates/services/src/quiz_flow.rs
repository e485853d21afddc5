use std::sync::Arc;

use quiz_core::{QuestionCatalog, SeedProvider};
use quiz_core::model::ResultCode;
use storage::repository::Storage;

use crate::error::QuizFlowError;
use crate::quiz_service::QuizService;
use crate::tally_service::TallyService;

/// Result of finishing a quiz, with where it sits in the tally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizCompletion {
    pub code: ResultCode,
    pub percentage: f64,
    pub rank: usize,
    pub total_count: u64,
    /// `false` when the result was already recorded by an earlier finish.
    pub newly_recorded: bool,
}

/// Where a returning user lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// A finished quiz is on record.
    ShowResult(ResultCode),
    /// Answers exist but the quiz is not finished.
    Continue { position: usize },
    Start,
}

/// Binds the quiz and the tally so a finished quiz is counted exactly once.
pub struct QuizFlow {
    quiz: QuizService,
    tally: TallyService,
}

impl QuizFlow {
    /// Load both stores from `storage`, seeding the tally if needed.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::Tally` if seeding fails.
    pub async fn open(
        storage: &Storage,
        catalog: Arc<QuestionCatalog>,
        seed: &mut dyn SeedProvider,
    ) -> Result<Self, QuizFlowError> {
        let quiz = QuizService::load(catalog, Arc::clone(&storage.progress)).await;
        let tally = TallyService::load_or_seed(Arc::clone(&storage.tallies), seed).await?;
        Ok(Self { quiz, tally })
    }

    /// Open a flow backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError` if storage initialization or seeding fails.
    pub async fn new_sqlite(
        db_url: &str,
        catalog: Arc<QuestionCatalog>,
        seed: &mut dyn SeedProvider,
    ) -> Result<Self, QuizFlowError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::open(&storage, catalog, seed).await
    }

    #[must_use]
    pub fn quiz(&self) -> &QuizService {
        &self.quiz
    }

    pub fn quiz_mut(&mut self) -> &mut QuizService {
        &mut self.quiz
    }

    #[must_use]
    pub fn tally(&self) -> &TallyService {
        &self.tally
    }

    pub fn tally_mut(&mut self) -> &mut TallyService {
        &mut self.tally
    }

    #[must_use]
    pub fn landing(&self) -> Landing {
        if let Some(code) = self.quiz.completed_result() {
            return Landing::ShowResult(code);
        }
        let session = self.quiz.session();
        if session.answered_count() > 0 {
            Landing::Continue {
                position: session.position(),
            }
        } else {
            Landing::Start
        }
    }

    /// Score the quiz and count it in the tally.
    ///
    /// Only a session that had no result yet is counted; finishing again
    /// reports the stored result without touching the tally.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::Tally` if the tally cannot take another count.
    pub async fn finish(&mut self) -> Result<QuizCompletion, QuizFlowError> {
        let (code, newly_recorded) = self.quiz.complete().await;
        if newly_recorded {
            self.tally.record(code).await?;
        }
        Ok(QuizCompletion {
            code,
            percentage: self.tally.percentage(code),
            rank: self.tally.rank(code),
            total_count: self.tally.total_count(),
            newly_recorded,
        })
    }

    /// Forget the current quiz so the next one starts from the first question.
    pub async fn restart(&mut self) {
        self.quiz.reset().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::FixedSeed;
    use quiz_core::model::Choice;

    async fn open(storage: &Storage) -> QuizFlow {
        QuizFlow::open(
            storage,
            Arc::new(QuestionCatalog::standard()),
            &mut FixedSeed::uniform(100),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn landing_follows_session_state() {
        let storage = Storage::in_memory();
        let mut flow = open(&storage).await;
        assert_eq!(flow.landing(), Landing::Start);

        flow.quiz_mut().select(Choice::A).await.unwrap();
        assert_eq!(flow.landing(), Landing::Continue { position: 1 });

        let completion = flow.finish().await.unwrap();
        assert_eq!(flow.landing(), Landing::ShowResult(completion.code));

        flow.restart().await;
        assert_eq!(flow.landing(), Landing::Start);
    }

    #[tokio::test]
    async fn finishing_twice_counts_once() {
        let storage = Storage::in_memory();
        let mut flow = open(&storage).await;
        for _ in 0..12 {
            flow.quiz_mut().select(Choice::B).await.unwrap();
        }

        let first = flow.finish().await.unwrap();
        assert_eq!(first.code.to_string(), "INFP");
        assert!(first.newly_recorded);
        assert_eq!(first.total_count, 1601);
        assert_eq!(first.rank, 1);

        let second = flow.finish().await.unwrap();
        assert!(!second.newly_recorded);
        assert_eq!(second.total_count, 1601);
    }
}
