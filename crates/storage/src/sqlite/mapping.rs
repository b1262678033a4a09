use quiz_core::model::{
    Category, CategoryId, OptionIndex, Question, QuestionId, Test, TestId, TimeLimit,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Maps write failures; a violated foreign key means the parent row is missing.
pub(crate) fn write_err(e: sqlx::Error) -> StorageError {
    match e.as_database_error() {
        Some(db) if db.is_foreign_key_violation() => StorageError::Conflict,
        _ => StorageError::Connection(e.to_string()),
    }
}

pub(crate) fn conn_err(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn id_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn category_id_from_i64(v: i64) -> Result<CategoryId, StorageError> {
    Ok(CategoryId::new(i64_to_u64("category_id", v)?))
}

pub(crate) fn test_id_from_i64(v: i64) -> Result<TestId, StorageError> {
    Ok(TestId::new(i64_to_u64("test_id", v)?))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question_id", v)?))
}

pub(crate) fn time_limit_to_i64(limit: Option<TimeLimit>) -> Option<i64> {
    limit.map(|l| i64::from(l.minutes()))
}

pub(crate) fn map_category_row(row: &SqliteRow) -> Result<Category, StorageError> {
    Category::new(
        category_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get::<String, _>("description").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_test_row(row: &SqliteRow) -> Result<Test, StorageError> {
    let time_limit = row
        .try_get::<Option<i64>, _>("time_limit_minutes")
        .map_err(ser)?
        .map(|minutes| {
            TimeLimit::from_minutes(minutes).ok_or_else(|| {
                StorageError::Serialization(format!("invalid time limit: {minutes}"))
            })
        })
        .transpose()?;

    Test::new(
        test_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("name").map_err(ser)?,
        category_id_from_i64(row.try_get::<i64, _>("category_id").map_err(ser)?)?,
        row.try_get("uploaded_at").map_err(ser)?,
        time_limit,
    )
    .map_err(ser)
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<Question, StorageError> {
    let mut options = Vec::with_capacity(4);
    for column in ["option_a", "option_b", "option_c", "option_d"] {
        options.push(row.try_get::<String, _>(column).map_err(ser)?);
    }
    let correct_option =
        OptionIndex::try_from(row.try_get::<i64, _>("correct_option").map_err(ser)?)
            .map_err(ser)?;

    Question::new(
        question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        test_id_from_i64(row.try_get::<i64, _>("test_id").map_err(ser)?)?,
        row.try_get::<String, _>("text").map_err(ser)?,
        options,
        correct_option,
        row.try_get::<Option<String>, _>("explanation").map_err(ser)?,
    )
    .map_err(ser)
}
