use serde::{Deserialize, Serialize};

use crate::model::dimension::{Choice, Dimension};
use crate::model::ids::QuestionId;
use crate::model::question::Question;

/// A recorded selection for one question.
///
/// The awarded letter is copied from the chosen option when the answer is
/// made, so later catalog edits never rewrite history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: QuestionId,
    pub selected: Choice,
    pub dimension: Dimension,
}

impl Answer {
    #[must_use]
    pub fn new(question_id: QuestionId, selected: Choice, dimension: Dimension) -> Self {
        Self {
            question_id,
            selected,
            dimension,
        }
    }

    /// Record picking `choice` on `question`.
    #[must_use]
    pub fn select(question: &Question, choice: Choice) -> Self {
        Self::new(question.id(), choice, question.option(choice).dimension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DimensionPair, QuestionOption};

    #[test]
    fn select_copies_awarded_letter() {
        let question = Question::new(
            QuestionId::new(9),
            DimensionPair::TF,
            "Someone works inefficiently",
            QuestionOption::new("Show a better way", Dimension::T),
            QuestionOption::new("Respect their way", Dimension::F),
        )
        .unwrap();

        let answer = Answer::select(&question, Choice::B);
        assert_eq!(answer.question_id, QuestionId::new(9));
        assert_eq!(answer.selected, Choice::B);
        assert_eq!(answer.dimension, Dimension::F);
    }

    #[test]
    fn serializes_with_blob_field_names() {
        let answer = Answer::new(QuestionId::new(1), Choice::A, Dimension::E);
        let json = serde_json::to_value(answer).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "questionId": 1, "selected": "A", "dimension": "E" })
        );
    }
}
