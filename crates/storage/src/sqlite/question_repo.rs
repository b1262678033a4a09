use quiz_core::model::{Question, QuestionId, TestId};

use super::SqliteRepository;
use super::mapping::{
    conn_err, id_to_i64, map_question_row, question_id_from_i64, write_err,
};
use crate::repository::{NewQuestionRecord, QuestionRepository, StorageError};

const QUESTION_COLUMNS: &str = "id, test_id, text, option_a, option_b, option_c, option_d, \
                                correct_option, explanation";

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn insert_new_question(
        &self,
        question: NewQuestionRecord,
    ) -> Result<QuestionId, StorageError> {
        let [a, b, c, d] = question.options;
        let res = sqlx::query(
            r"
            INSERT INTO questions (test_id, text, option_a, option_b, option_c, option_d, correct_option, explanation)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(id_to_i64("test_id", question.test_id.value())?)
        .bind(question.text)
        .bind(a)
        .bind(b)
        .bind(c)
        .bind(d)
        .bind(i64::from(u8::from(question.correct_option)))
        .bind(question.explanation)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        question_id_from_i64(res.last_insert_rowid())
    }

    async fn update_question(&self, question: &Question) -> Result<(), StorageError> {
        let [a, b, c, d] = question.options();
        let res = sqlx::query(
            r"
            UPDATE questions
            SET test_id = ?2, text = ?3, option_a = ?4, option_b = ?5, option_c = ?6,
                option_d = ?7, correct_option = ?8, explanation = ?9
            WHERE id = ?1
            ",
        )
        .bind(id_to_i64("question_id", question.id().value())?)
        .bind(id_to_i64("test_id", question.test_id().value())?)
        .bind(question.text())
        .bind(a.as_str())
        .bind(b.as_str())
        .bind(c.as_str())
        .bind(d.as_str())
        .bind(i64::from(u8::from(question.correct_option())))
        .bind(question.explanation())
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?1"
        ))
        .bind(id_to_i64("question_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn_err)?;

        row.as_ref().map(map_question_row).transpose()
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(conn_err)?;

        rows.iter().map(map_question_row).collect()
    }

    async fn list_questions_by_test(
        &self,
        test_id: TestId,
    ) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE test_id = ?1 ORDER BY id ASC"
        ))
        .bind(id_to_i64("test_id", test_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(conn_err)?;

        rows.iter().map(map_question_row).collect()
    }

    async fn delete_question(&self, id: QuestionId) -> Result<bool, StorageError> {
        let res = sqlx::query("DELETE FROM questions WHERE id = ?1")
            .bind(id_to_i64("question_id", id.value())?)
            .execute(&self.pool)
            .await
            .map_err(conn_err)?;

        Ok(res.rows_affected() > 0)
    }
}
