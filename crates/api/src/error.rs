use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::CatalogError;
use thiserror::Error;
use tracing::error;

use crate::dto::{ErrorResponse, FieldError};

/// Failure of a catalog handler, rendered as a JSON error body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A path id was not a number; carries the entity kind.
    #[error("Invalid {0} ID")]
    InvalidId(&'static str),
    /// Carries the entity kind, capitalized.
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Validation error")]
    Validation(Vec<FieldError>),
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    fn field(field: &str, message: impl ToString) -> Self {
        Self::Validation(vec![FieldError {
            field: field.to_owned(),
            message: message.to_string(),
        }])
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(e) => Self::field(e.field(), &e),
            CatalogError::CategoryNotFound(_) => Self::NotFound("Category"),
            CatalogError::TestNotFound(_) => Self::NotFound("Test"),
            CatalogError::QuestionNotFound(_) => Self::NotFound("Question"),
            CatalogError::UnknownCategory(id) => {
                Self::field("categoryId", format!("category {id} does not exist"))
            }
            CatalogError::UnknownTest(id) => {
                Self::field("testId", format!("test {id} does not exist"))
            }
            other => {
                error!(error = %other, "catalog request failed");
                Self::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::field("body", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidId(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.to_string();
        let errors = match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        };
        (status, Json(ErrorResponse { message, errors })).into_response()
    }
}
