//! REST surface for managing the quiz catalog.
//!
//! # Endpoints
//!
//! All routes live under `/api` and speak camelCase JSON.
//!
//! - `GET|POST /api/categories`, `GET|PUT|DELETE /api/categories/{id}`
//! - `GET|POST /api/tests` (`?categoryId=`), `GET|PUT|DELETE /api/tests/{id}`
//! - `GET|POST /api/questions` (`?testId=`), `GET|PUT|DELETE /api/questions/{id}`

#![forbid(unsafe_code)]

pub mod dto;
mod error;
mod handlers;

use axum::{Router, routing::get};
use services::{CategoryService, Clock, QuestionService, TestService};
use storage::repository::Storage;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::ApiError;

/// Catalog services shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub categories: CategoryService,
    pub tests: TestService,
    pub questions: QuestionService,
}

impl AppState {
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        Self {
            categories: CategoryService::new(storage.categories.clone()),
            tests: TestService::new(clock, storage.categories.clone(), storage.tests.clone()),
            questions: QuestionService::new(storage.tests.clone(), storage.questions.clone()),
        }
    }
}

/// Build the router with tracing and permissive CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/categories/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/tests",
            get(handlers::list_tests).post(handlers::create_test),
        )
        .route(
            "/tests/{id}",
            get(handlers::get_test)
                .put(handlers::update_test)
                .delete(handlers::delete_test),
        )
        .route(
            "/questions",
            get(handlers::list_questions).post(handlers::create_question),
        )
        .route(
            "/questions/{id}",
            get(handlers::get_question)
                .put(handlers::update_question)
                .delete(handlers::delete_question),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
