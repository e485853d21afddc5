//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{SessionError, TallyError};
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("every question has been answered")]
    NoCurrentQuestion,
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted by `TallyService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TallyServiceError {
    #[error(transparent)]
    Tally(#[from] TallyError),
}

/// Errors emitted while opening or finishing a quiz.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizFlowError {
    #[error(transparent)]
    Quiz(#[from] QuizServiceError),
    #[error(transparent)]
    Tally(#[from] TallyServiceError),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
