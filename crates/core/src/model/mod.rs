mod answer;
mod dimension;
mod ids;
mod question;
mod result_code;
mod session;
mod tally;

pub use ids::{ParseIdError, QuestionId};

pub use answer::Answer;
pub use dimension::{Choice, Dimension, DimensionError, DimensionPair};
pub use question::{Question, QuestionError, QuestionOption};
pub use result_code::{ResultCode, ResultCodeError};
pub use session::{DimensionCounts, QuizSession, SessionError, score};
pub use tally::{ResultTally, TallyEntry, TallyError};
