use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::CategoryId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryError {
    #[error("category name cannot be empty")]
    EmptyName,

    #[error("category description cannot be empty")]
    EmptyDescription,
}

/// A named grouping of tests, e.g. "History" or "Sports".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
    description: String,
}

impl Category {
    /// Creates a category, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::EmptyName` or `CategoryError::EmptyDescription`
    /// if either field is blank.
    pub fn new(
        id: CategoryId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, CategoryError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(CategoryError::EmptyName);
        }
        let description = description.into().trim().to_owned();
        if description.is_empty() {
            return Err(CategoryError::EmptyDescription);
        }

        Ok(Self {
            id,
            name,
            description,
        })
    }

    /// Returns a copy with a storage-assigned identifier.
    #[must_use]
    pub fn with_id(mut self, id: CategoryId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn id(&self) -> CategoryId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_fields() {
        let category = Category::new(CategoryId::new(1), "  History ", " Past events ").unwrap();
        assert_eq!(category.name(), "History");
        assert_eq!(category.description(), "Past events");
    }

    #[test]
    fn rejects_blank_name() {
        let err = Category::new(CategoryId::new(1), "  ", "desc").unwrap_err();
        assert_eq!(err, CategoryError::EmptyName);
    }

    #[test]
    fn rejects_blank_description() {
        let err = Category::new(CategoryId::new(1), "Sports", "").unwrap_err();
        assert_eq!(err, CategoryError::EmptyDescription);
    }
}
