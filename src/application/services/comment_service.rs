//! Comment service for discussion under a review.

use crate::domain::entities::{Comment, NewComment, User};
use crate::domain::permissions::{Access, IsAuthorOrStaffOrReadOnly, RequestContext, authorize_object};
use crate::domain::repositories::{CommentRepository, Page, ReviewRepository};
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;

pub struct CommentService<C: CommentRepository + ?Sized, R: ReviewRepository + ?Sized> {
    repository: Arc<C>,
    reviews: Arc<R>,
}

impl<C: CommentRepository + ?Sized, R: ReviewRepository + ?Sized> CommentService<C, R> {
    pub fn new(repository: Arc<C>, reviews: Arc<R>) -> Self {
        Self {
            repository,
            reviews,
        }
    }

    pub async fn list(
        &self,
        title_id: i64,
        review_id: i64,
        page: Page,
    ) -> Result<(Vec<Comment>, i64), AppError> {
        self.ensure_review(title_id, review_id).await?;

        tokio::try_join!(
            self.repository.list(review_id, page),
            self.repository.count(review_id)
        )
    }

    pub async fn get(
        &self,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
    ) -> Result<Comment, AppError> {
        self.ensure_review(title_id, review_id).await?;

        self.repository
            .find(review_id, comment_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Comment not found",
                    json!({ "review_id": review_id, "comment_id": comment_id }),
                )
            })
    }

    pub async fn create(
        &self,
        title_id: i64,
        review_id: i64,
        author: &User,
        text: String,
    ) -> Result<Comment, AppError> {
        self.ensure_review(title_id, review_id).await?;

        self.repository
            .create(NewComment {
                review_id,
                author_id: author.id,
                text,
            })
            .await
    }

    pub async fn update(
        &self,
        actor: &User,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
        text: String,
    ) -> Result<Comment, AppError> {
        let comment = self.get(title_id, review_id, comment_id).await?;
        authorize_object(
            &IsAuthorOrStaffOrReadOnly,
            &RequestContext::new(Access::Write, Some(actor)),
            &comment,
        )?;

        self.repository.update_text(comment.id, text).await
    }

    pub async fn delete(
        &self,
        actor: &User,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
    ) -> Result<(), AppError> {
        let comment = self.get(title_id, review_id, comment_id).await?;
        authorize_object(
            &IsAuthorOrStaffOrReadOnly,
            &RequestContext::new(Access::Write, Some(actor)),
            &comment,
        )?;

        self.repository.delete(comment.id).await
    }

    /// The review must exist and belong to the title in the path.
    async fn ensure_review(&self, title_id: i64, review_id: i64) -> Result<(), AppError> {
        match self.reviews.find(title_id, review_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(
                "Review not found",
                json!({ "title_id": title_id, "review_id": review_id }),
            )),
        }
    }
}
