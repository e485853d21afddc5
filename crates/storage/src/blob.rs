//! Persisted JSON shapes for the two stored blobs.
//!
//! Records mirror the domain types so the domain layer never sees storage
//! concerns. Decoding validates everything; a blob that does not fit is
//! reported as a serialization error and callers treat it as absent.

use std::collections::BTreeMap;

use quiz_core::model::{Answer, QuizSession, ResultCode, ResultTally};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

/// Storage key of the in-progress quiz.
pub const QUIZ_PROGRESS_KEY: &str = "mbti-test-storage";
/// Storage key of the result tally.
pub const TALLY_KEY: &str = "mbti-stats";

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// `{ currentQuestion, answers, result, isCompleted }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizProgressRecord {
    pub current_question: usize,
    pub answers: Vec<Answer>,
    pub result: Option<ResultCode>,
    pub is_completed: bool,
}

impl QuizProgressRecord {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        Self {
            current_question: session.position(),
            answers: session.answers().to_vec(),
            result: session.result(),
            is_completed: session.is_completed(),
        }
    }

    /// Convert the record back into a domain `QuizSession`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the record breaks a session invariant.
    pub fn into_session(self) -> Result<QuizSession, StorageError> {
        QuizSession::from_persisted(
            self.current_question,
            self.answers,
            self.result,
            self.is_completed,
        )
        .map_err(ser)
    }
}

/// `{ totalCount, distribution: { CODE: count } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyRecord {
    pub total_count: u64,
    pub distribution: BTreeMap<String, u64>,
}

impl TallyRecord {
    #[must_use]
    pub fn from_tally(tally: &ResultTally) -> Self {
        Self {
            total_count: tally.total_count(),
            distribution: tally
                .distribution()
                .map(|(code, count)| (code.to_string(), count))
                .collect(),
        }
    }

    /// Convert the record back into a domain `ResultTally`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for unknown or missing codes and
    /// for a total that does not match the distribution.
    pub fn into_tally(self) -> Result<ResultTally, StorageError> {
        let mut pairs = Vec::with_capacity(self.distribution.len());
        for (raw, count) in self.distribution {
            let code: ResultCode = raw.parse().map_err(ser)?;
            pairs.push((code, count));
        }
        ResultTally::from_persisted(self.total_count, pairs).map_err(ser)
    }
}

pub(crate) fn encode_progress(session: &QuizSession) -> Result<String, StorageError> {
    serde_json::to_string(&QuizProgressRecord::from_session(session)).map_err(ser)
}

pub(crate) fn decode_progress(raw: &str) -> Result<QuizSession, StorageError> {
    serde_json::from_str::<QuizProgressRecord>(raw)
        .map_err(ser)?
        .into_session()
}

pub(crate) fn encode_tally(tally: &ResultTally) -> Result<String, StorageError> {
    serde_json::to_string(&TallyRecord::from_tally(tally)).map_err(ser)
}

pub(crate) fn decode_tally(raw: &str) -> Result<ResultTally, StorageError> {
    serde_json::from_str::<TallyRecord>(raw)
        .map_err(ser)?
        .into_tally()
}
