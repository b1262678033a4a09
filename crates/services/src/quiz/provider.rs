use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{Question, Test, TestId};
use storage::repository::{QuestionRepository, Storage, TestRepository};

use crate::error::QuizError;

/// Source of the ordered, read-only question set for a test.
#[async_trait]
pub trait QuestionSetProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns `QuizError::TestNotFound` if the test does not exist.
    async fn load_test(&self, test_id: TestId) -> Result<Test, QuizError>;

    /// Questions of the test in presentation order.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::TestNotFound` if the test does not exist.
    async fn load_questions(&self, test_id: TestId) -> Result<Vec<Question>, QuizError>;
}

/// Provider reading tests and questions from the catalog repositories.
#[derive(Clone)]
pub struct StorageQuestionSet {
    tests: Arc<dyn TestRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl StorageQuestionSet {
    #[must_use]
    pub fn new(tests: Arc<dyn TestRepository>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self { tests, questions }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(storage.tests.clone(), storage.questions.clone())
    }
}

#[async_trait]
impl QuestionSetProvider for StorageQuestionSet {
    async fn load_test(&self, test_id: TestId) -> Result<Test, QuizError> {
        self.tests
            .get_test(test_id)
            .await?
            .ok_or(QuizError::TestNotFound(test_id))
    }

    async fn load_questions(&self, test_id: TestId) -> Result<Vec<Question>, QuizError> {
        if self.tests.get_test(test_id).await?.is_none() {
            return Err(QuizError::TestNotFound(test_id));
        }
        Ok(self.questions.list_questions_by_test(test_id).await?)
    }
}
