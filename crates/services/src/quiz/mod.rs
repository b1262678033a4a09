mod provider;
mod timer;
mod workflow;

pub use provider::{QuestionSetProvider, StorageQuestionSet};
pub use timer::{TICK_PERIOD, TimerHandle};
pub use workflow::{ActiveQuiz, QuizSessionService, SessionObserver};
