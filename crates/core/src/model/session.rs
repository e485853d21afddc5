use thiserror::Error;

use crate::model::{Answer, Dimension, DimensionPair, QuestionId, ResultCode};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question {0} already has an answer; update it instead")]
    DuplicateAnswer(QuestionId),

    #[error("answer for question {found} cannot replace question {expected}")]
    MismatchedQuestion {
        expected: QuestionId,
        found: QuestionId,
    },

    #[error("persisted session is completed but has no result")]
    MissingResult,

    #[error("persisted session has a result but is not completed")]
    UnexpectedResult,
}

//
// ─── SCORING ──────────────────────────────────────────────────────────────────
//

/// Per-letter answer counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DimensionCounts([u32; 8]);

impl DimensionCounts {
    #[must_use]
    pub fn from_answers(answers: &[Answer]) -> Self {
        let mut counts = Self::default();
        for answer in answers {
            let slot = &mut counts.0[Self::slot(answer.dimension)];
            *slot = slot.saturating_add(1);
        }
        counts
    }

    #[must_use]
    pub fn count(&self, dimension: Dimension) -> u32 {
        self.0[Self::slot(dimension)]
    }

    /// Letter with the larger count on `pair`; ties go to the pair's first letter.
    #[must_use]
    pub fn leading(&self, pair: DimensionPair) -> Dimension {
        if self.count(pair.first()) >= self.count(pair.second()) {
            pair.first()
        } else {
            pair.second()
        }
    }

    fn slot(dimension: Dimension) -> usize {
        let pair = dimension.pair();
        pair.slot() * 2 + usize::from(dimension != pair.first())
    }
}

/// Score a list of answers into a result code.
///
/// Any number of answers is accepted, including none; axes without a
/// majority resolve to `E`, `S`, `T` and `J`.
#[must_use]
pub fn score(answers: &[Answer]) -> ResultCode {
    let counts = DimensionCounts::from_answers(answers);
    ResultCode::from_axes(|pair| counts.leading(pair))
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// Progress of one run through the question catalog.
///
/// `position` is the 0-based index of the question being shown. Answers keep
/// the order they were given in, with at most one answer per question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizSession {
    position: usize,
    answers: Vec<Answer>,
    result: Option<ResultCode>,
    completed: bool,
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate a session from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DuplicateAnswer` if two answers share a question,
    /// or `MissingResult` / `UnexpectedResult` if the completion flag and result disagree.
    pub fn from_persisted(
        position: usize,
        answers: Vec<Answer>,
        result: Option<ResultCode>,
        completed: bool,
    ) -> Result<Self, SessionError> {
        let mut session = Self {
            position,
            answers: Vec::with_capacity(answers.len()),
            result: None,
            completed: false,
        };
        for answer in answers {
            if session.answer_for(answer.question_id).is_some() {
                return Err(SessionError::DuplicateAnswer(answer.question_id));
            }
            session.answers.push(answer);
        }
        match (completed, result) {
            (true, None) => return Err(SessionError::MissingResult),
            (false, Some(_)) => return Err(SessionError::UnexpectedResult),
            _ => {}
        }
        session.result = result;
        session.completed = completed;
        Ok(session)
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move to question index `index`.
    pub fn set_position(&mut self, index: usize) {
        self.position = index;
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn answer_for(&self, question_id: QuestionId) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    /// Append a first answer for its question and advance by one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DuplicateAnswer` if the question was already answered.
    pub fn add_answer(&mut self, answer: Answer) -> Result<(), SessionError> {
        if self.answer_for(answer.question_id).is_some() {
            return Err(SessionError::DuplicateAnswer(answer.question_id));
        }
        self.answers.push(answer);
        self.position += 1;
        Ok(())
    }

    /// Replace the answer recorded for `question_id`.
    ///
    /// Returns `false` and leaves the session untouched when the question has
    /// no answer yet. The position never changes.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MismatchedQuestion` if `answer` belongs to another question.
    pub fn update_answer(
        &mut self,
        question_id: QuestionId,
        answer: Answer,
    ) -> Result<bool, SessionError> {
        if answer.question_id != question_id {
            return Err(SessionError::MismatchedQuestion {
                expected: question_id,
                found: answer.question_id,
            });
        }
        match self
            .answers
            .iter_mut()
            .find(|a| a.question_id == question_id)
        {
            Some(slot) => {
                *slot = answer;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Score the current answers, store the code and mark the session completed.
    pub fn calculate_result(&mut self) -> ResultCode {
        let code = score(&self.answers);
        self.result = Some(code);
        self.completed = true;
        code
    }

    #[must_use]
    pub fn result(&self) -> Option<ResultCode> {
        self.result
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
