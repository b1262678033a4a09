//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{CategoryId, QuestionId, TestId};
use quiz_core::session::SessionError;
use storage::repository::StorageError;

/// Errors emitted by the catalog services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] quiz_core::Error),

    #[error("category {0} not found")]
    CategoryNotFound(CategoryId),

    #[error("test {0} not found")]
    TestNotFound(TestId),

    #[error("question {0} not found")]
    QuestionNotFound(QuestionId),

    /// A test references a category that does not exist.
    #[error("category {0} does not exist")]
    UnknownCategory(CategoryId),

    /// A question references a test that does not exist.
    #[error("test {0} does not exist")]
    UnknownTest(TestId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while loading or driving a quiz session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("test {0} not found")]
    TestNotFound(TestId),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
