use quiz_core::model::{CategoryId, Test, TestId};

use super::SqliteRepository;
use super::mapping::{
    conn_err, id_to_i64, map_test_row, test_id_from_i64, time_limit_to_i64, write_err,
};
use crate::repository::{NewTestRecord, StorageError, TestRepository};

const TEST_COLUMNS: &str = "id, name, category_id, uploaded_at, time_limit_minutes";

#[async_trait::async_trait]
impl TestRepository for SqliteRepository {
    async fn insert_new_test(&self, test: NewTestRecord) -> Result<TestId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO tests (name, category_id, uploaded_at, time_limit_minutes)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(test.name)
        .bind(id_to_i64("category_id", test.category_id.value())?)
        .bind(test.uploaded_at)
        .bind(time_limit_to_i64(test.time_limit))
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        test_id_from_i64(res.last_insert_rowid())
    }

    async fn update_test(&self, test: &Test) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE tests
            SET name = ?2, category_id = ?3, uploaded_at = ?4, time_limit_minutes = ?5
            WHERE id = ?1
            ",
        )
        .bind(id_to_i64("test_id", test.id().value())?)
        .bind(test.name())
        .bind(id_to_i64("category_id", test.category_id().value())?)
        .bind(test.uploaded_at())
        .bind(time_limit_to_i64(test.time_limit()))
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn get_test(&self, id: TestId) -> Result<Option<Test>, StorageError> {
        let row = sqlx::query(&format!("SELECT {TEST_COLUMNS} FROM tests WHERE id = ?1"))
            .bind(id_to_i64("test_id", id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn_err)?;

        row.as_ref().map(map_test_row).transpose()
    }

    async fn list_tests(&self) -> Result<Vec<Test>, StorageError> {
        let rows = sqlx::query(&format!("SELECT {TEST_COLUMNS} FROM tests ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(conn_err)?;

        rows.iter().map(map_test_row).collect()
    }

    async fn list_tests_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Test>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {TEST_COLUMNS} FROM tests WHERE category_id = ?1 ORDER BY id ASC"
        ))
        .bind(id_to_i64("category_id", category_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(conn_err)?;

        rows.iter().map(map_test_row).collect()
    }

    async fn delete_test(&self, id: TestId) -> Result<bool, StorageError> {
        let res = sqlx::query("DELETE FROM tests WHERE id = ?1")
            .bind(id_to_i64("test_id", id.value())?)
            .execute(&self.pool)
            .await
            .map_err(conn_err)?;

        Ok(res.rows_affected() > 0)
    }
}
