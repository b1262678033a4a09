use thiserror::Error;

use crate::model::{CategoryError, QuestionError, TestError};

/// Validation failure for any catalog entity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error(transparent)]
    Test(#[from] TestError),
    #[error(transparent)]
    Question(#[from] QuestionError),
}

impl Error {
    /// Name of the field the failure refers to, for field-level error reporting.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Error::Category(CategoryError::EmptyName) | Error::Test(TestError::EmptyName) => "name",
            Error::Category(CategoryError::EmptyDescription) => "description",
            Error::Test(TestError::InvalidTimeLimit(_)) => "timeLimit",
            Error::Question(QuestionError::EmptyText) => "text",
            Error::Question(QuestionError::OptionCount { .. } | QuestionError::EmptyOption { .. }) => {
                "options"
            }
            Error::Question(QuestionError::CorrectOptionOutOfRange(_)) => "correctOption",
        }
    }
}
