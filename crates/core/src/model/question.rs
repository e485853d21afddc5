use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::dimension::{Choice, Dimension, DimensionPair};
use crate::model::ids::QuestionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id}: text cannot be empty")]
    EmptyText { id: QuestionId },

    #[error("question {id}: option {choice} text cannot be empty")]
    EmptyOption { id: QuestionId, choice: Choice },

    #[error("question {id}: option {choice} awards {letter}, which is not on the {pair} axis")]
    OffAxis {
        id: QuestionId,
        choice: Choice,
        pair: DimensionPair,
        letter: Dimension,
    },

    #[error("question {id}: both options award {letter}")]
    SameLetter { id: QuestionId, letter: Dimension },
}

/// One side of a forced-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    text: String,
    #[serde(rename = "type")]
    dimension: Dimension,
}

impl QuestionOption {
    #[must_use]
    pub fn new(text: impl Into<String>, dimension: Dimension) -> Self {
        Self {
            text: text.into(),
            dimension,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The letter awarded when this option is picked.
    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }
}

/// A single forced-choice question measuring one axis.
///
/// The two options always award the opposite letters of the question's axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    id: QuestionId,
    #[serde(rename = "dimension")]
    pair: DimensionPair,
    text: String,
    option_a: QuestionOption,
    option_b: QuestionOption,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if any text is blank or the options do not
    /// award the two opposite letters of `pair`.
    pub fn new(
        id: QuestionId,
        pair: DimensionPair,
        text: impl Into<String>,
        option_a: QuestionOption,
        option_b: QuestionOption,
    ) -> Result<Self, QuestionError> {
        let question = Self {
            id,
            pair,
            text: text.into(),
            option_a,
            option_b,
        };
        question.validate()?;
        Ok(question)
    }

    /// Construct a row of the built-in catalog.
    pub(crate) fn from_static(
        id: QuestionId,
        pair: DimensionPair,
        text: &'static str,
        option_a: QuestionOption,
        option_b: QuestionOption,
    ) -> Self {
        let question = Self {
            id,
            pair,
            text: text.to_owned(),
            option_a,
            option_b,
        };
        debug_assert!(question.validate().is_ok(), "invalid built-in question {id}");
        question
    }

    /// Check the axis invariant on an already-built question (e.g. one read from JSON).
    ///
    /// # Errors
    ///
    /// See [`Question::new`].
    pub fn validate(&self) -> Result<(), QuestionError> {
        let id = self.id;
        if self.text.trim().is_empty() {
            return Err(QuestionError::EmptyText { id });
        }
        for (choice, option) in [(Choice::A, &self.option_a), (Choice::B, &self.option_b)] {
            if option.text.trim().is_empty() {
                return Err(QuestionError::EmptyOption { id, choice });
            }
            if !self.pair.contains(option.dimension) {
                return Err(QuestionError::OffAxis {
                    id,
                    choice,
                    pair: self.pair,
                    letter: option.dimension,
                });
            }
        }
        if self.option_a.dimension == self.option_b.dimension {
            return Err(QuestionError::SameLetter {
                id,
                letter: self.option_a.dimension,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    /// The axis this question measures.
    #[must_use]
    pub fn pair(&self) -> DimensionPair {
        self.pair
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn option_a(&self) -> &QuestionOption {
        &self.option_a
    }

    #[must_use]
    pub fn option_b(&self) -> &QuestionOption {
        &self.option_b
    }

    #[must_use]
    pub fn option(&self, choice: Choice) -> &QuestionOption {
        match choice {
            Choice::A => &self.option_a,
            Choice::B => &self.option_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(a: Dimension, b: Dimension) -> (QuestionOption, QuestionOption) {
        (QuestionOption::new("yes", a), QuestionOption::new("no", b))
    }

    #[test]
    fn accepts_opposite_letters_on_axis() {
        let (a, b) = options(Dimension::P, Dimension::J);
        let q = Question::new(QuestionId::new(1), DimensionPair::JP, "Plans?", a, b).unwrap();
        assert_eq!(q.option(Choice::A).dimension(), Dimension::P);
        assert_eq!(q.option(Choice::B).dimension(), Dimension::J);
    }

    #[test]
    fn rejects_letter_off_axis() {
        let (a, b) = options(Dimension::E, Dimension::N);
        let err = Question::new(QuestionId::new(2), DimensionPair::EI, "Party?", a, b).unwrap_err();
        assert_eq!(
            err,
            QuestionError::OffAxis {
                id: QuestionId::new(2),
                choice: Choice::B,
                pair: DimensionPair::EI,
                letter: Dimension::N,
            }
        );
    }

    #[test]
    fn rejects_same_letter_twice() {
        let (a, b) = options(Dimension::T, Dimension::T);
        let err = Question::new(QuestionId::new(3), DimensionPair::TF, "Why?", a, b).unwrap_err();
        assert!(matches!(err, QuestionError::SameLetter { .. }));
    }

    #[test]
    fn rejects_blank_text() {
        let (a, b) = options(Dimension::S, Dimension::N);
        let err = Question::new(QuestionId::new(4), DimensionPair::SN, "  ", a, b).unwrap_err();
        assert_eq!(err, QuestionError::EmptyText { id: QuestionId::new(4) });
    }

    #[test]
    fn reads_catalog_shaped_json() {
        let json = r#"{
            "id": 5,
            "dimension": "SN",
            "text": "Reading a recipe",
            "optionA": { "text": "Follow it exactly", "type": "S" },
            "optionB": { "text": "Improvise", "type": "N" }
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        q.validate().unwrap();
        assert_eq!(q.id(), QuestionId::new(5));
        assert_eq!(q.pair(), DimensionPair::SN);
        assert_eq!(q.option_b().text(), "Improvise");
    }
}
