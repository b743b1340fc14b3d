//! Repository trait for titles.

use crate::domain::entities::{NewTitle, Title, TitleFilter, TitlePatch};
use crate::domain::repositories::Page;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for titles.
///
/// Every read returns the title with its category, genres and a freshly
/// aggregated rating.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TitleRepository: Send + Sync {
    /// Inserts a title and its genre links in one transaction.
    async fn create(&self, new_title: NewTitle) -> Result<Title, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Title>, AppError>;

    async fn exists(&self, id: i64) -> Result<bool, AppError>;

    /// Lists titles ordered by name (descending).
    async fn list(&self, filter: TitleFilter, page: Page) -> Result<Vec<Title>, AppError>;

    async fn count(&self, filter: TitleFilter) -> Result<i64, AppError>;

    /// Applies a partial update in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the title does not exist.
    async fn update(&self, id: i64, patch: TitlePatch) -> Result<Title, AppError>;

    /// Deletes a title with its reviews and comments.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the title does not exist.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
