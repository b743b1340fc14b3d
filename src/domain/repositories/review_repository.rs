//! Repository trait for reviews.

use crate::domain::entities::{NewReview, Review, ReviewPatch};
use crate::domain::repositories::Page;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for reviews of a title.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Inserts a review.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the author already reviewed the title.
    /// The storage-level unique constraint makes this hold under concurrent inserts.
    async fn create(&self, new_review: NewReview) -> Result<Review, AppError>;

    /// Finds a review belonging to the given title.
    async fn find(&self, title_id: i64, review_id: i64) -> Result<Option<Review>, AppError>;

    async fn exists_by_author(&self, title_id: i64, author_id: i64) -> Result<bool, AppError>;

    /// Lists reviews of a title, newest first.
    async fn list(&self, title_id: i64, page: Page) -> Result<Vec<Review>, AppError>;

    async fn count(&self, title_id: i64) -> Result<i64, AppError>;

    async fn update(&self, review_id: i64, patch: ReviewPatch) -> Result<Review, AppError>;

    /// Deletes a review with its comments.
    async fn delete(&self, review_id: i64) -> Result<(), AppError>;
}
