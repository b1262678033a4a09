use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{
    Category, CategoryId, OPTION_COUNT, OptionIndex, Question, QuestionId, Test, TestId,
    TimeLimit,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── INSERT RECORDS ────────────────────────────────────────────────────────────
//

/// Insert shape for a category whose id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewCategoryRecord {
    pub name: String,
    pub description: String,
}

impl NewCategoryRecord {
    #[must_use]
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name().to_owned(),
            description: category.description().to_owned(),
        }
    }
}

/// Insert shape for a test whose id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewTestRecord {
    pub name: String,
    pub category_id: CategoryId,
    pub uploaded_at: DateTime<Utc>,
    pub time_limit: Option<TimeLimit>,
}

impl NewTestRecord {
    #[must_use]
    pub fn from_test(test: &Test) -> Self {
        Self {
            name: test.name().to_owned(),
            category_id: test.category_id(),
            uploaded_at: test.uploaded_at(),
            time_limit: test.time_limit(),
        }
    }
}

/// Insert shape for a question whose id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewQuestionRecord {
    pub test_id: TestId,
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_option: OptionIndex,
    pub explanation: Option<String>,
}

impl NewQuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            test_id: question.test_id(),
            text: question.text().to_owned(),
            options: question.options().clone(),
            correct_option: question.correct_option(),
            explanation: question.explanation().map(str::to_owned),
        }
    }
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Repository contract for categories.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category and return the id assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the category cannot be stored.
    async fn insert_new_category(
        &self,
        category: NewCategoryRecord,
    ) -> Result<CategoryId, StorageError>;

    /// Replace an existing category.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no category has this id.
    async fn update_category(&self, category: &Category) -> Result<(), StorageError>;

    /// Fetch a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing row is `Ok(None)`.
    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StorageError>;

    /// List all categories ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError>;

    /// Delete a category together with its tests and their questions.
    ///
    /// Returns `false` if no category had this id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn delete_category(&self, id: CategoryId) -> Result<bool, StorageError>;
}

/// Repository contract for tests.
#[async_trait]
pub trait TestRepository: Send + Sync {
    /// Insert a test and return the id assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the owning category does not exist.
    async fn insert_new_test(&self, test: NewTestRecord) -> Result<TestId, StorageError>;

    /// Replace an existing test.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no test has this id.
    async fn update_test(&self, test: &Test) -> Result<(), StorageError>;

    /// Fetch a test by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing row is `Ok(None)`.
    async fn get_test(&self, id: TestId) -> Result<Option<Test>, StorageError>;

    /// List all tests ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_tests(&self) -> Result<Vec<Test>, StorageError>;

    /// List the tests of one category ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_tests_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Test>, StorageError>;

    /// Delete a test together with its questions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn delete_test(&self, id: TestId) -> Result<bool, StorageError>;
}

/// Repository contract for questions.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Insert a question and return the id assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the owning test does not exist.
    async fn insert_new_question(
        &self,
        question: NewQuestionRecord,
    ) -> Result<QuestionId, StorageError>;

    /// Replace an existing question.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no question has this id.
    async fn update_question(&self, question: &Question) -> Result<(), StorageError>;

    /// Fetch a question by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing row is `Ok(None)`.
    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError>;

    /// List all questions ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// List the questions of one test in presentation (id) order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_questions_by_test(&self, test_id: TestId)
    -> Result<Vec<Question>, StorageError>;

    /// Delete a question.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn delete_question(&self, id: QuestionId) -> Result<bool, StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Monotonic id generator; ids start at 1 and are never reused.
#[derive(Debug, Clone, Copy)]
struct Sequence(u64);

impl Default for Sequence {
    fn default() -> Self {
        Self(1)
    }
}

impl Sequence {
    fn next_id(&mut self) -> u64 {
        let id = self.0;
        self.0 += 1;
        id
    }
}

#[derive(Default)]
struct MemoryState {
    categories: BTreeMap<CategoryId, Category>,
    tests: BTreeMap<TestId, Test>,
    questions: BTreeMap<QuestionId, Question>,
    category_seq: Sequence,
    test_seq: Sequence,
    question_seq: Sequence,
}

impl MemoryState {
    fn remove_questions_of(&mut self, test_id: TestId) {
        self.questions.retain(|_, q| q.test_id() != test_id);
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

fn rebuild<T, E: std::fmt::Display>(res: Result<T, E>) -> Result<T, StorageError> {
    res.map_err(|e| StorageError::Serialization(e.to_string()))
}

#[async_trait]
impl CategoryRepository for InMemoryRepository {
    async fn insert_new_category(
        &self,
        category: NewCategoryRecord,
    ) -> Result<CategoryId, StorageError> {
        let mut guard = self.lock()?;
        let category = rebuild(Category::new(
            CategoryId::new(0),
            category.name,
            category.description,
        ))?;
        let id = CategoryId::new(guard.category_seq.next_id());
        guard.categories.insert(id, category.with_id(id));
        Ok(id)
    }

    async fn update_category(&self, category: &Category) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        let slot = guard
            .categories
            .get_mut(&category.id())
            .ok_or(StorageError::NotFound)?;
        *slot = category.clone();
        Ok(())
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.categories.values().cloned().collect())
    }

    async fn delete_category(&self, id: CategoryId) -> Result<bool, StorageError> {
        let mut guard = self.lock()?;
        if guard.categories.remove(&id).is_none() {
            return Ok(false);
        }
        let owned: Vec<TestId> = guard
            .tests
            .values()
            .filter(|t| t.category_id() == id)
            .map(Test::id)
            .collect();
        for test_id in owned {
            guard.tests.remove(&test_id);
            guard.remove_questions_of(test_id);
        }
        Ok(true)
    }
}

#[async_trait]
impl TestRepository for InMemoryRepository {
    async fn insert_new_test(&self, test: NewTestRecord) -> Result<TestId, StorageError> {
        let mut guard = self.lock()?;
        if !guard.categories.contains_key(&test.category_id) {
            return Err(StorageError::Conflict);
        }
        let test = rebuild(Test::new(
            TestId::new(0),
            test.name,
            test.category_id,
            test.uploaded_at,
            test.time_limit,
        ))?;
        let id = TestId::new(guard.test_seq.next_id());
        guard.tests.insert(id, test.with_id(id));
        Ok(id)
    }

    async fn update_test(&self, test: &Test) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if !guard.categories.contains_key(&test.category_id()) {
            return Err(StorageError::Conflict);
        }
        let slot = guard.tests.get_mut(&test.id()).ok_or(StorageError::NotFound)?;
        *slot = test.clone();
        Ok(())
    }

    async fn get_test(&self, id: TestId) -> Result<Option<Test>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.tests.get(&id).cloned())
    }

    async fn list_tests(&self) -> Result<Vec<Test>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.tests.values().cloned().collect())
    }

    async fn list_tests_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Test>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .tests
            .values()
            .filter(|t| t.category_id() == category_id)
            .cloned()
            .collect())
    }

    async fn delete_test(&self, id: TestId) -> Result<bool, StorageError> {
        let mut guard = self.lock()?;
        if guard.tests.remove(&id).is_none() {
            return Ok(false);
        }
        guard.remove_questions_of(id);
        Ok(true)
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn insert_new_question(
        &self,
        question: NewQuestionRecord,
    ) -> Result<QuestionId, StorageError> {
        let mut guard = self.lock()?;
        if !guard.tests.contains_key(&question.test_id) {
            return Err(StorageError::Conflict);
        }
        let question = rebuild(Question::new(
            QuestionId::new(0),
            question.test_id,
            question.text,
            question.options.into(),
            question.correct_option,
            question.explanation,
        ))?;
        let id = QuestionId::new(guard.question_seq.next_id());
        guard.questions.insert(id, question.with_id(id));
        Ok(id)
    }

    async fn update_question(&self, question: &Question) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if !guard.tests.contains_key(&question.test_id()) {
            return Err(StorageError::Conflict);
        }
        let slot = guard
            .questions
            .get_mut(&question.id())
            .ok_or(StorageError::NotFound)?;
        *slot = question.clone();
        Ok(())
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.questions.get(&id).cloned())
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.questions.values().cloned().collect())
    }

    async fn list_questions_by_test(
        &self,
        test_id: TestId,
    ) -> Result<Vec<Question>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .questions
            .values()
            .filter(|q| q.test_id() == test_id)
            .cloned()
            .collect())
    }

    async fn delete_question(&self, id: QuestionId) -> Result<bool, StorageError> {
        let mut guard = self.lock()?;
        Ok(guard.questions.remove(&id).is_some())
    }
}

/// Aggregates the catalog repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub categories: Arc<dyn CategoryRepository>,
    pub tests: Arc<dyn TestRepository>,
    pub questions: Arc<dyn QuestionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            categories: Arc::new(repo.clone()),
            tests: Arc::new(repo.clone()),
            questions: Arc::new(repo),
        }
    }
}
