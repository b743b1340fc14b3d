//! Repository trait for comments.

use crate::domain::entities::{Comment, NewComment};
use crate::domain::repositories::Page;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for comments on a review.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, AppError>;

    /// Finds a comment belonging to the given review.
    async fn find(&self, review_id: i64, comment_id: i64) -> Result<Option<Comment>, AppError>;

    /// Lists comments of a review, newest first.
    async fn list(&self, review_id: i64, page: Page) -> Result<Vec<Comment>, AppError>;

    async fn count(&self, review_id: i64) -> Result<i64, AppError>;

    async fn update_text(&self, comment_id: i64, text: String) -> Result<Comment, AppError>;

    async fn delete(&self, comment_id: i64) -> Result<(), AppError>;
}
