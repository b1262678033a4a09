mod category;
mod ids;
mod question;
mod session;
mod test;

pub use ids::{CategoryId, ParseIdError, QuestionId, TestId};

pub use category::{Category, CategoryError};
pub use question::{OPTION_COUNT, OptionIndex, Question, QuestionError};
pub use session::{AnswerRecord, CompletionReason, QuizResult, QuizResultError, round_percent};
pub use test::{Test, TestError, TimeLimit};
