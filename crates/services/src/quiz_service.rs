use std::sync::Arc;

use quiz_core::QuestionCatalog;
use quiz_core::model::{Answer, Choice, Question, QuizSession, ResultCode};
use storage::repository::{QuizProgressRepository, StorageError};

use crate::error::QuizServiceError;

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub position: usize,
    pub is_complete: bool,
}

impl QuizProgress {
    /// Answered share in whole percent.
    #[must_use]
    pub fn percent(&self) -> usize {
        (self.answered.min(self.total) * 100)
            .checked_div(self.total)
            .unwrap_or(0)
    }
}

/// What a selection did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOutcome {
    /// `false` when an earlier answer for the question was replaced.
    pub added: bool,
    /// The last question of the catalog was the one answered.
    pub was_last: bool,
}

/// Owns the in-progress quiz and persists it after every change.
///
/// Save failures are logged and dropped; the in-memory session stays
/// authoritative for the rest of the run. If the backend failed while loading,
/// nothing is written until [`QuizService::reset`], so saved progress that
/// could not be read is kept.
pub struct QuizService {
    catalog: Arc<QuestionCatalog>,
    progress: Arc<dyn QuizProgressRepository>,
    session: QuizSession,
    degraded: bool,
}

impl QuizService {
    /// Restore the saved session, or start fresh when there is none.
    ///
    /// A blob that cannot be decoded or that does not fit `catalog` is treated
    /// as absent. A backend failure starts an unsaved session instead.
    pub async fn load(
        catalog: Arc<QuestionCatalog>,
        progress: Arc<dyn QuizProgressRepository>,
    ) -> Self {
        let mut degraded = false;
        let session = match progress.load_progress().await {
            Ok(Some(session)) if fits_catalog(&session, &catalog) => session,
            Ok(Some(session)) => {
                tracing::warn!(
                    position = session.position(),
                    answers = session.answered_count(),
                    "saved quiz does not match the question catalog; starting fresh"
                );
                QuizSession::new()
            }
            Ok(None) => QuizSession::new(),
            Err(StorageError::Serialization(err)) => {
                tracing::warn!(error = %err, "saved quiz is unreadable; starting fresh");
                QuizSession::new()
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "could not load saved quiz; this run will not be saved"
                );
                degraded = true;
                QuizSession::new()
            }
        };
        tracing::debug!(
            position = session.position(),
            completed = session.is_completed(),
            degraded,
            "quiz loaded"
        );
        Self {
            catalog,
            progress,
            session,
            degraded,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    /// `true` while saved progress is being left alone after a failed load.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Question at the current position; `None` once past the last one.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.catalog.get(self.session.position())
    }

    /// Choice previously made on the current question, if revisiting it.
    #[must_use]
    pub fn existing_choice(&self) -> Option<Choice> {
        let question = self.current_question()?;
        self.session
            .answer_for(question.id())
            .map(|answer| answer.selected)
    }

    /// Result of a completed quiz.
    #[must_use]
    pub fn completed_result(&self) -> Option<ResultCode> {
        self.session
            .is_completed()
            .then(|| self.session.result())
            .flatten()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.catalog.len();
        let answered = self.session.answered_count();
        QuizProgress {
            total,
            answered,
            position: self.session.position(),
            is_complete: answered >= total,
        }
    }

    /// Answer the current question.
    ///
    /// Re-selecting on a revisited question replaces the earlier answer and
    /// keeps the position; a first answer advances to the next question.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NoCurrentQuestion` once every question has
    /// been passed.
    pub async fn select(&mut self, choice: Choice) -> Result<SelectOutcome, QuizServiceError> {
        let question = self
            .current_question()
            .ok_or(QuizServiceError::NoCurrentQuestion)?;
        let id = question.id();
        let answer = Answer::select(question, choice);
        let was_last = self.session.position() + 1 == self.catalog.len();

        let added = if self.session.answer_for(id).is_some() {
            self.session.update_answer(id, answer)?;
            false
        } else {
            self.session.add_answer(answer)?;
            true
        };
        tracing::debug!(question = %id, %choice, added, "answer recorded");

        self.persist().await;
        Ok(SelectOutcome { added, was_last })
    }

    /// Step back one question. Returns `false` at the first question.
    pub async fn go_back(&mut self) -> bool {
        let position = self.session.position();
        if position == 0 {
            return false;
        }
        self.session.set_position(position - 1);
        self.persist().await;
        true
    }

    /// Step forward over an already answered question. Returns `false` when
    /// the current question still needs an answer.
    pub async fn go_forward(&mut self) -> bool {
        if self.existing_choice().is_none() {
            return false;
        }
        self.session.set_position(self.session.position() + 1);
        self.persist().await;
        true
    }

    /// Jump to a question by 0-based index, clamped to the catalog.
    pub async fn set_position(&mut self, index: usize) {
        self.session.set_position(index.min(self.catalog.len()));
        self.persist().await;
    }

    /// Stored result, or score the answers now.
    ///
    /// The flag is `true` when this call produced the result.
    pub async fn complete(&mut self) -> (ResultCode, bool) {
        if let Some(code) = self.session.result() {
            return (code, false);
        }
        let code = self.session.calculate_result();
        self.persist().await;
        (code, true)
    }

    /// Clear the session and the saved blob.
    pub async fn reset(&mut self) {
        self.session.reset();
        self.degraded = false;
        if let Err(err) = self.progress.clear_progress().await {
            tracing::warn!(error = %err, "failed to clear saved quiz");
        }
    }

    async fn persist(&self) {
        if self.degraded {
            tracing::debug!("quiz progress not saved; stored copy was never loaded");
            return;
        }
        if let Err(err) = self.progress.save_progress(&self.session).await {
            tracing::warn!(error = %err, "failed to save quiz progress");
        }
    }
}

fn fits_catalog(session: &QuizSession, catalog: &QuestionCatalog) -> bool {
    session.position() <= catalog.len()
        && session.answers().iter().all(|answer| {
            catalog.find(answer.question_id).is_some_and(|question| {
                question.option(answer.selected).dimension() == answer.dimension
            })
        })
}
