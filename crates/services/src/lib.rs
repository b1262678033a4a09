#![forbid(unsafe_code)]

pub mod category_service;
pub mod error;
pub mod question_service;
pub mod quiz;
pub mod seed;
pub mod test_service;

pub use quiz_core::Clock;

pub use category_service::{CategoryDraft, CategoryService};
pub use error::{CatalogError, QuizError};
pub use question_service::{QuestionDraft, QuestionService};
pub use quiz::{
    ActiveQuiz, QuestionSetProvider, QuizSessionService, SessionObserver, StorageQuestionSet,
    TimerHandle,
};
pub use seed::{SeedOutcome, SeedReport, seed_sample_catalog};
pub use test_service::{TestDraft, TestService};
