use quiz_core::model::{Category, CategoryId};

use super::SqliteRepository;
use super::mapping::{category_id_from_i64, conn_err, id_to_i64, map_category_row, write_err};
use crate::repository::{CategoryRepository, NewCategoryRecord, StorageError};

#[async_trait::async_trait]
impl CategoryRepository for SqliteRepository {
    async fn insert_new_category(
        &self,
        category: NewCategoryRecord,
    ) -> Result<CategoryId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO categories (name, description)
            VALUES (?1, ?2)
            ",
        )
        .bind(category.name)
        .bind(category.description)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        category_id_from_i64(res.last_insert_rowid())
    }

    async fn update_category(&self, category: &Category) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE categories SET name = ?2, description = ?3
            WHERE id = ?1
            ",
        )
        .bind(id_to_i64("category_id", category.id().value())?)
        .bind(category.name())
        .bind(category.description())
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StorageError> {
        let row = sqlx::query("SELECT id, name, description FROM categories WHERE id = ?1")
            .bind(id_to_i64("category_id", id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn_err)?;

        row.as_ref().map(map_category_row).transpose()
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        let rows = sqlx::query("SELECT id, name, description FROM categories ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(conn_err)?;

        rows.iter().map(map_category_row).collect()
    }

    async fn delete_category(&self, id: CategoryId) -> Result<bool, StorageError> {
        let res = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id_to_i64("category_id", id.value())?)
            .execute(&self.pool)
            .await
            .map_err(conn_err)?;

        Ok(res.rows_affected() > 0)
    }
}
