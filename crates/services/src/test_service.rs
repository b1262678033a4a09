use std::sync::Arc;

use quiz_core::model::{CategoryId, Test, TestId, TimeLimit};
use storage::repository::{CategoryRepository, NewTestRecord, TestRepository};
use tracing::info;

use crate::Clock;
use crate::error::CatalogError;

/// Fields accepted when creating or replacing a test.
///
/// `time_limit` is in minutes; `None`, zero or a negative value makes the test untimed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDraft {
    pub name: String,
    pub category_id: CategoryId,
    pub time_limit: Option<i64>,
}

impl TestDraft {
    fn time_limit(&self) -> Result<Option<TimeLimit>, CatalogError> {
        self.time_limit
            .map(TimeLimit::parse)
            .transpose()
            .map(Option::flatten)
            .map_err(|e| CatalogError::Validation(e.into()))
    }
}

/// Orchestrates test validation and persistence.
#[derive(Clone)]
pub struct TestService {
    clock: Clock,
    categories: Arc<dyn CategoryRepository>,
    tests: Arc<dyn TestRepository>,
}

impl TestService {
    #[must_use]
    pub fn new(
        clock: Clock,
        categories: Arc<dyn CategoryRepository>,
        tests: Arc<dyn TestRepository>,
    ) -> Self {
        Self {
            clock,
            categories,
            tests,
        }
    }

    /// List tests ordered by ID, optionally restricted to one category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if repository access fails.
    pub async fn list_tests(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<Test>, CatalogError> {
        let tests = match category_id {
            Some(category_id) => self.tests.list_tests_by_category(category_id).await?,
            None => self.tests.list_tests().await?,
        };
        Ok(tests)
    }

    /// Fetch a test by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::TestNotFound` if no test has this id.
    pub async fn get_test(&self, id: TestId) -> Result<Test, CatalogError> {
        self.tests
            .get_test(id)
            .await?
            .ok_or(CatalogError::TestNotFound(id))
    }

    /// Validate and persist a new test stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for a blank name or non-positive limit.
    /// Returns `CatalogError::UnknownCategory` if the category does not exist.
    pub async fn create_test(&self, draft: TestDraft) -> Result<Test, CatalogError> {
        let time_limit = draft.time_limit()?;
        let test = Test::new(
            TestId::new(1),
            draft.name,
            draft.category_id,
            self.clock.now(),
            time_limit,
        )
        .map_err(quiz_core::Error::from)?;
        self.ensure_category(test.category_id()).await?;

        let id = self.tests.insert_new_test(NewTestRecord::from_test(&test)).await?;
        info!(test_id = %id, category_id = %test.category_id(), timed = test.is_timed(), "test created");
        Ok(test.with_id(id))
    }

    /// Replace an existing test, keeping its original upload timestamp.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for a blank name or non-positive limit.
    /// Returns `CatalogError::TestNotFound` if no test has this id.
    /// Returns `CatalogError::UnknownCategory` if the category does not exist.
    pub async fn update_test(&self, id: TestId, draft: TestDraft) -> Result<Test, CatalogError> {
        let time_limit = draft.time_limit()?;
        let existing = self.get_test(id).await?;
        let updated = Test::new(
            id,
            draft.name,
            draft.category_id,
            existing.uploaded_at(),
            time_limit,
        )
        .map_err(quiz_core::Error::from)?;
        self.ensure_category(updated.category_id()).await?;

        self.tests.update_test(&updated).await?;
        info!(test_id = %id, "test updated");
        Ok(updated)
    }

    /// Delete a test along with its questions.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::TestNotFound` if no test has this id.
    pub async fn delete_test(&self, id: TestId) -> Result<(), CatalogError> {
        if !self.tests.delete_test(id).await? {
            return Err(CatalogError::TestNotFound(id));
        }
        info!(test_id = %id, "test deleted");
        Ok(())
    }

    async fn ensure_category(&self, id: CategoryId) -> Result<(), CatalogError> {
        match self.categories.get_category(id).await? {
            Some(_) => Ok(()),
            None => Err(CatalogError::UnknownCategory(id)),
        }
    }
}
