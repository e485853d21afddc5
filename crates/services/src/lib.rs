#![forbid(unsafe_code)]

pub mod error;
pub mod quiz_flow;
pub mod quiz_service;
pub mod seed;
pub mod tally_service;

pub use error::{QuizFlowError, QuizServiceError, TallyServiceError};
pub use quiz_flow::{Landing, QuizCompletion, QuizFlow};
pub use quiz_service::{QuizProgress, QuizService, SelectOutcome};
pub use seed::{StdRngSeed, ThreadRandomSeed};
pub use tally_service::TallyService;
