use std::sync::Arc;

use quiz_core::model::{Category, CategoryId};
use storage::repository::{CategoryRepository, NewCategoryRecord};
use tracing::info;

use crate::error::CatalogError;

/// Fields accepted when creating or replacing a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: String,
}

/// Orchestrates category validation and persistence.
#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    #[must_use]
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    /// List categories ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if repository access fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.categories.list_categories().await?)
    }

    /// Fetch a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryNotFound` if no category has this id.
    pub async fn get_category(&self, id: CategoryId) -> Result<Category, CatalogError> {
        self.categories
            .get_category(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    /// Validate and persist a new category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for blank fields.
    /// Returns `CatalogError::Storage` if persistence fails.
    pub async fn create_category(&self, draft: CategoryDraft) -> Result<Category, CatalogError> {
        let category = Category::new(CategoryId::new(1), draft.name, draft.description)
            .map_err(quiz_core::Error::from)?;
        let id = self
            .categories
            .insert_new_category(NewCategoryRecord::from_category(&category))
            .await?;
        info!(category_id = %id, name = category.name(), "category created");
        Ok(category.with_id(id))
    }

    /// Replace the name and description of an existing category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for blank fields.
    /// Returns `CatalogError::CategoryNotFound` if no category has this id.
    pub async fn update_category(
        &self,
        id: CategoryId,
        draft: CategoryDraft,
    ) -> Result<Category, CatalogError> {
        let updated =
            Category::new(id, draft.name, draft.description).map_err(quiz_core::Error::from)?;
        self.get_category(id).await?;
        self.categories.update_category(&updated).await?;
        info!(category_id = %id, "category updated");
        Ok(updated)
    }

    /// Delete a category along with its tests and their questions.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryNotFound` if no category has this id.
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), CatalogError> {
        if !self.categories.delete_category(id).await? {
            return Err(CatalogError::CategoryNotFound(id));
        }
        info!(category_id = %id, "category deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    fn service() -> CategoryService {
        CategoryService::new(Arc::new(InMemoryRepository::new()))
    }

    fn draft(name: &str, description: &str) -> CategoryDraft {
        CategoryDraft {
            name: name.into(),
            description: description.into(),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_trims() {
        let service = service();
        let created = service
            .create_category(draft("  History ", "Dates and empires"))
            .await
            .unwrap();
        assert_eq!(created.id(), CategoryId::new(1));
        assert_eq!(created.name(), "History");

        let fetched = service.get_category(created.id()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let err = service()
            .create_category(draft("  ", "Dates"))
            .await
            .unwrap_err();
        match err {
            CatalogError::Validation(e) => assert_eq!(e.field(), "name"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_missing_category_is_not_found() {
        let err = service()
            .update_category(CategoryId::new(7), draft("Sports", "Ball games"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::CategoryNotFound(id) if id == CategoryId::new(7)));
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let service = service();
        let created = service
            .create_category(draft("Sports", "Ball games"))
            .await
            .unwrap();
        service.delete_category(created.id()).await.unwrap();
        let err = service.delete_category(created.id()).await.unwrap_err();
        assert!(matches!(err, CatalogError::CategoryNotFound(_)));
    }
}
