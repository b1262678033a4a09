use std::sync::Arc;

use quiz_core::model::{OptionIndex, Question, QuestionId, TestId};
use storage::repository::{NewQuestionRecord, QuestionRepository, TestRepository};
use tracing::info;

use crate::error::CatalogError;

/// Fields accepted when creating or replacing a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub test_id: TestId,
    pub text: String,
    pub options: Vec<String>,
    pub correct_option: i64,
    pub explanation: Option<String>,
}

impl QuestionDraft {
    fn into_question(self, id: QuestionId) -> Result<Question, CatalogError> {
        let correct_option = OptionIndex::try_from(self.correct_option)
            .map_err(|e| CatalogError::Validation(e.into()))?;
        Question::new(
            id,
            self.test_id,
            self.text,
            self.options,
            correct_option,
            self.explanation,
        )
        .map_err(|e| CatalogError::Validation(e.into()))
    }
}

/// Orchestrates question validation and persistence.
#[derive(Clone)]
pub struct QuestionService {
    tests: Arc<dyn TestRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl QuestionService {
    #[must_use]
    pub fn new(tests: Arc<dyn TestRepository>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self { tests, questions }
    }

    /// List questions ordered by ID, optionally restricted to one test.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if repository access fails.
    pub async fn list_questions(
        &self,
        test_id: Option<TestId>,
    ) -> Result<Vec<Question>, CatalogError> {
        let questions = match test_id {
            Some(test_id) => self.questions.list_questions_by_test(test_id).await?,
            None => self.questions.list_questions().await?,
        };
        Ok(questions)
    }

    /// Fetch a question by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::QuestionNotFound` if no question has this id.
    pub async fn get_question(&self, id: QuestionId) -> Result<Question, CatalogError> {
        self.questions
            .get_question(id)
            .await?
            .ok_or(CatalogError::QuestionNotFound(id))
    }

    /// Validate and persist a new question.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for blank text, a wrong option count,
    /// a blank option, or an out-of-range correct option.
    /// Returns `CatalogError::UnknownTest` if the owning test does not exist.
    pub async fn create_question(&self, draft: QuestionDraft) -> Result<Question, CatalogError> {
        let question = draft.into_question(QuestionId::new(1))?;
        self.ensure_test(question.test_id()).await?;

        let id = self
            .questions
            .insert_new_question(NewQuestionRecord::from_question(&question))
            .await?;
        info!(question_id = %id, test_id = %question.test_id(), "question created");
        Ok(question.with_id(id))
    }

    /// Replace an existing question.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for invalid fields.
    /// Returns `CatalogError::QuestionNotFound` if no question has this id.
    /// Returns `CatalogError::UnknownTest` if the owning test does not exist.
    pub async fn update_question(
        &self,
        id: QuestionId,
        draft: QuestionDraft,
    ) -> Result<Question, CatalogError> {
        let updated = draft.into_question(id)?;
        self.get_question(id).await?;
        self.ensure_test(updated.test_id()).await?;

        self.questions.update_question(&updated).await?;
        info!(question_id = %id, "question updated");
        Ok(updated)
    }

    /// Delete a question.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::QuestionNotFound` if no question has this id.
    pub async fn delete_question(&self, id: QuestionId) -> Result<(), CatalogError> {
        if !self.questions.delete_question(id).await? {
            return Err(CatalogError::QuestionNotFound(id));
        }
        info!(question_id = %id, "question deleted");
        Ok(())
    }

    async fn ensure_test(&self, id: TestId) -> Result<(), CatalogError> {
        match self.tests.get_test(id).await? {
            Some(_) => Ok(()),
            None => Err(CatalogError::UnknownTest(id)),
        }
    }
}
