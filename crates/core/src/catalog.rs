use std::collections::HashSet;

use thiserror::Error;

use crate::model::{
    Dimension, DimensionPair, Question, QuestionError, QuestionId, QuestionOption,
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog has no questions")]
    Empty,

    #[error("question id {0} appears more than once")]
    DuplicateId(QuestionId),

    #[error("question at position {index} has id {found}, expected {expected}")]
    OutOfSequence {
        index: usize,
        expected: QuestionId,
        found: QuestionId,
    },

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered, read-only list of quiz questions.
///
/// Ids run `1..=len` in catalog order and every question satisfies the
/// opposite-letters invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Validate and wrap a list of questions.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the list is empty, an id repeats or skips,
    /// or a question fails validation.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::with_capacity(questions.len());
        for (index, question) in questions.iter().enumerate() {
            question.validate()?;
            if !seen.insert(question.id()) {
                return Err(CatalogError::DuplicateId(question.id()));
            }
            let expected = u32::try_from(index + 1)
                .map(QuestionId::new)
                .unwrap_or(QuestionId::new(u32::MAX));
            if question.id() != expected {
                return Err(CatalogError::OutOfSequence {
                    index,
                    expected,
                    found: question.id(),
                });
            }
        }
        Ok(Self { questions })
    }

    /// Parse a catalog from a JSON array of questions.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Json` for malformed input, or any validation error from [`QuestionCatalog::new`].
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let questions: Vec<Question> = serde_json::from_str(raw)?;
        Self::new(questions)
    }

    /// The built-in twelve-question catalog.
    #[must_use]
    pub fn standard() -> Self {
        let questions = STANDARD
            .iter()
            .map(|row| row.build())
            .collect();
        Self { questions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Question shown at 0-based `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn find(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.find(id).is_some()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

impl Default for QuestionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

struct Row {
    id: u32,
    pair: DimensionPair,
    text: &'static str,
    a: (&'static str, Dimension),
    b: (&'static str, Dimension),
}

impl Row {
    fn build(&self) -> Question {
        Question::from_static(
            QuestionId::new(self.id),
            self.pair,
            self.text,
            QuestionOption::new(self.a.0, self.a.1),
            QuestionOption::new(self.b.0, self.b.1),
        )
    }
}

const STANDARD: [Row; 12] = [
    // E/I
    Row {
        id: 1,
        pair: DimensionPair::EI,
        text: "주말에 친구들이 갑자기 놀자고 할 때",
        a: ("좋아! 어디 가? 🎉", Dimension::E),
        b: ("음... 집이 최고야 🏠", Dimension::I),
    },
    Row {
        id: 2,
        pair: DimensionPair::EI,
        text: "새로운 모임에 갔을 때 나는",
        a: ("여기저기 돌아다니며 인사하기", Dimension::E),
        b: ("아는 사람 옆에 가만히 있기", Dimension::I),
    },
    Row {
        id: 3,
        pair: DimensionPair::EI,
        text: "에너지 충전 방법은?",
        a: ("사람들과 수다 떨기 ☕", Dimension::E),
        b: ("혼자만의 시간 갖기 🎧", Dimension::I),
    },
    // S/N
    Row {
        id: 4,
        pair: DimensionPair::SN,
        text: "친구가 \"너 내일 뭐 해?\" 물어보면",
        a: ("10시에 일어나서, 점심 먹고, 카페 가고...", Dimension::S),
        b: ("그냥 여유롭게~ 뭐 어떻게든 되겠지", Dimension::N),
    },
    Row {
        id: 5,
        pair: DimensionPair::SN,
        text: "영화나 드라마를 볼 때 나는",
        a: ("스토리와 디테일에 집중한다", Dimension::S),
        b: ("숨겨진 의미나 복선을 찾는다", Dimension::N),
    },
    Row {
        id: 6,
        pair: DimensionPair::SN,
        text: "새로운 일을 시작할 때",
        a: ("매뉴얼대로 차근차근 📋", Dimension::S),
        b: ("일단 감으로 시작하고 보자 🚀", Dimension::N),
    },
    // T/F
    Row {
        id: 7,
        pair: DimensionPair::TF,
        text: "친구가 고민 상담을 할 때",
        a: ("해결책을 제시해준다 💡", Dimension::T),
        b: ("일단 공감하고 위로한다 🤗", Dimension::F),
    },
    Row {
        id: 8,
        pair: DimensionPair::TF,
        text: "중요한 결정을 내릴 때",
        a: ("장단점을 논리적으로 분석한다", Dimension::T),
        b: ("마음이 가는 대로 따른다", Dimension::F),
    },
    Row {
        id: 9,
        pair: DimensionPair::TF,
        text: "누군가 비효율적으로 일할 때",
        a: ("더 나은 방법을 알려준다", Dimension::T),
        b: ("그 사람 방식을 존중한다", Dimension::F),
    },
    // J/P
    Row {
        id: 10,
        pair: DimensionPair::JP,
        text: "여행 갈 때 나는",
        a: ("숙소, 맛집, 일정 다 짜놓는다 📝", Dimension::J),
        b: ("비행기만 끊고 나머지는 현지에서 🌴", Dimension::P),
    },
    Row {
        id: 11,
        pair: DimensionPair::JP,
        text: "과제나 업무 마감 스타일은?",
        a: ("미리미리 끝내놔야 마음이 편해", Dimension::J),
        b: ("마감 직전 몰아치기가 효율 최고", Dimension::P),
    },
    Row {
        id: 12,
        pair: DimensionPair::JP,
        text: "갑자기 계획이 바뀌면?",
        a: ("스트레스 받는다 😤", Dimension::J),
        b: ("오히려 좋아~ 새로운 모험! 😎", Dimension::P),
    },
];
