use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use quiz_core::model::{CategoryId, QuestionId, TestId};

use crate::AppState;
use crate::dto::{
    CategoryRequest, CategoryResponse, QuestionFilter, QuestionRequest, QuestionResponse,
    TestFilter, TestRequest, TestResponse,
};
use crate::error::ApiError;

type ApiResult<T> = Result<T, ApiError>;

fn parse_id<T: FromStr>(raw: &str, kind: &'static str) -> ApiResult<T> {
    raw.parse().map_err(|_| ApiError::InvalidId(kind))
}

// ─── Categories ────────────────────────────────────────────────────────────────

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<CategoryResponse>>> {
    let categories = state.categories.list_categories().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<Json<CategoryResponse>> {
    let id: CategoryId = parse_id(&raw, "category")?;
    Ok(Json(state.categories.get_category(id).await?.into()))
}

pub async fn create_category(
    State(state): State<AppState>,
    body: Result<Json<CategoryRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CategoryResponse>)> {
    let Json(req) = body?;
    let category = state.categories.create_category(req.into()).await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    body: Result<Json<CategoryRequest>, JsonRejection>,
) -> ApiResult<Json<CategoryResponse>> {
    let id: CategoryId = parse_id(&raw, "category")?;
    let Json(req) = body?;
    Ok(Json(state.categories.update_category(id, req.into()).await?.into()))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<StatusCode> {
    let id: CategoryId = parse_id(&raw, "category")?;
    state.categories.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

pub async fn list_tests(
    State(state): State<AppState>,
    Query(filter): Query<TestFilter>,
) -> ApiResult<Json<Vec<TestResponse>>> {
    let tests = state.tests.list_tests(filter.category_id()).await?;
    Ok(Json(tests.into_iter().map(Into::into).collect()))
}

pub async fn get_test(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<Json<TestResponse>> {
    let id: TestId = parse_id(&raw, "test")?;
    Ok(Json(state.tests.get_test(id).await?.into()))
}

pub async fn create_test(
    State(state): State<AppState>,
    body: Result<Json<TestRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TestResponse>)> {
    let Json(req) = body?;
    let test = state.tests.create_test(req.into()).await?;
    Ok((StatusCode::CREATED, Json(test.into())))
}

pub async fn update_test(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    body: Result<Json<TestRequest>, JsonRejection>,
) -> ApiResult<Json<TestResponse>> {
    let id: TestId = parse_id(&raw, "test")?;
    let Json(req) = body?;
    Ok(Json(state.tests.update_test(id, req.into()).await?.into()))
}

pub async fn delete_test(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<StatusCode> {
    let id: TestId = parse_id(&raw, "test")?;
    state.tests.delete_test(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Questions ─────────────────────────────────────────────────────────────────

pub async fn list_questions(
    State(state): State<AppState>,
    Query(filter): Query<QuestionFilter>,
) -> ApiResult<Json<Vec<QuestionResponse>>> {
    let questions = state.questions.list_questions(filter.test_id()).await?;
    Ok(Json(questions.into_iter().map(Into::into).collect()))
}

pub async fn get_question(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<Json<QuestionResponse>> {
    let id: QuestionId = parse_id(&raw, "question")?;
    Ok(Json(state.questions.get_question(id).await?.into()))
}

pub async fn create_question(
    State(state): State<AppState>,
    body: Result<Json<QuestionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<QuestionResponse>)> {
    let Json(req) = body?;
    let question = state.questions.create_question(req.into()).await?;
    Ok((StatusCode::CREATED, Json(question.into())))
}

pub async fn update_question(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    body: Result<Json<QuestionRequest>, JsonRejection>,
) -> ApiResult<Json<QuestionResponse>> {
    let id: QuestionId = parse_id(&raw, "question")?;
    let Json(req) = body?;
    Ok(Json(state.questions.update_question(id, req.into()).await?.into()))
}

pub async fn delete_question(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ApiResult<StatusCode> {
    let id: QuestionId = parse_id(&raw, "question")?;
    state.questions.delete_question(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
