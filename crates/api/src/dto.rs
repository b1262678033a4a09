//! JSON shapes of the catalog API.

use chrono::{DateTime, Utc};
use quiz_core::model::{Category, CategoryId, Question, QuestionId, Test, TestId};
use serde::{Deserialize, Serialize};
use services::{CategoryDraft, QuestionDraft, TestDraft};

// ─── Requests ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub description: String,
}

impl From<CategoryRequest> for CategoryDraft {
    fn from(req: CategoryRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRequest {
    pub name: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub time_limit: Option<i64>,
}

impl From<TestRequest> for TestDraft {
    fn from(req: TestRequest) -> Self {
        Self {
            name: req.name,
            category_id: req.category_id,
            time_limit: req.time_limit,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    pub test_id: TestId,
    pub text: String,
    pub options: Vec<String>,
    pub correct_option: i64,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl From<QuestionRequest> for QuestionDraft {
    fn from(req: QuestionRequest) -> Self {
        Self {
            test_id: req.test_id,
            text: req.text,
            options: req.options,
            correct_option: req.correct_option,
            explanation: req.explanation,
        }
    }
}

/// `?categoryId=` filter; an unparsable value lists every test.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestFilter {
    pub category_id: Option<String>,
}

impl TestFilter {
    #[must_use]
    pub fn category_id(&self) -> Option<CategoryId> {
        self.category_id.as_deref().and_then(|raw| raw.parse().ok())
    }
}

/// `?testId=` filter; an unparsable value lists every question.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionFilter {
    pub test_id: Option<String>,
}

impl QuestionFilter {
    #[must_use]
    pub fn test_id(&self) -> Option<TestId> {
        self.test_id.as_deref().and_then(|raw| raw.parse().ok())
    }
}

// ─── Responses ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id(),
            name: category.name().to_owned(),
            description: category.description().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResponse {
    pub id: TestId,
    pub name: String,
    pub category_id: CategoryId,
    pub upload_date: DateTime<Utc>,
    pub time_limit: Option<u32>,
}

impl From<Test> for TestResponse {
    fn from(test: Test) -> Self {
        Self {
            id: test.id(),
            name: test.name().to_owned(),
            category_id: test.category_id(),
            upload_date: test.uploaded_at(),
            time_limit: test.time_limit().map(u32::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: QuestionId,
    pub test_id: TestId,
    pub text: String,
    pub options: Vec<String>,
    pub correct_option: u8,
    pub explanation: Option<String>,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            id: question.id(),
            test_id: question.test_id(),
            text: question.text().to_owned(),
            options: question.options().to_vec(),
            correct_option: u8::from(question.correct_option()),
            explanation: question.explanation().map(str::to_owned),
        }
    }
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}
