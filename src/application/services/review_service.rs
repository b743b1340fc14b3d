//! Review service: one scored review per author and title.

use crate::domain::entities::review::{MAX_SCORE, MIN_SCORE};
use crate::domain::entities::{NewReview, Review, ReviewPatch, User};
use crate::domain::permissions::{Access, IsAuthorOrStaffOrReadOnly, RequestContext, authorize_object};
use crate::domain::repositories::{Page, ReviewRepository, TitleRepository};
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;

pub struct ReviewService<R: ReviewRepository + ?Sized, T: TitleRepository + ?Sized> {
    repository: Arc<R>,
    titles: Arc<T>,
}

impl<R: ReviewRepository + ?Sized, T: TitleRepository + ?Sized> ReviewService<R, T> {
    pub fn new(repository: Arc<R>, titles: Arc<T>) -> Self {
        Self { repository, titles }
    }

    /// Lists reviews of a title with the total count, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the title does not exist.
    pub async fn list(&self, title_id: i64, page: Page) -> Result<(Vec<Review>, i64), AppError> {
        self.ensure_title(title_id).await?;

        tokio::try_join!(
            self.repository.list(title_id, page),
            self.repository.count(title_id)
        )
    }

    pub async fn get(&self, title_id: i64, review_id: i64) -> Result<Review, AppError> {
        self.ensure_title(title_id).await?;

        self.repository
            .find(title_id, review_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Review not found",
                    json!({ "title_id": title_id, "review_id": review_id }),
                )
            })
    }

    /// Publishes the author's review of a title.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the title does not exist.
    /// Returns [`AppError::Validation`] if the score is out of range or the
    /// author already reviewed this title.
    pub async fn create(
        &self,
        title_id: i64,
        author: &User,
        text: String,
        score: i32,
    ) -> Result<Review, AppError> {
        self.ensure_title(title_id).await?;
        check_score(score)?;

        if self.repository.exists_by_author(title_id, author.id).await? {
            return Err(already_reviewed());
        }

        self.repository
            .create(NewReview {
                title_id,
                author_id: author.id,
                text,
                score,
            })
            .await
    }

    /// Edits a review. Allowed for its author, moderators and admins.
    pub async fn update(
        &self,
        actor: &User,
        title_id: i64,
        review_id: i64,
        patch: ReviewPatch,
    ) -> Result<Review, AppError> {
        if let Some(score) = patch.score {
            check_score(score)?;
        }

        let review = self.get(title_id, review_id).await?;
        authorize_object(
            &IsAuthorOrStaffOrReadOnly,
            &RequestContext::new(Access::Write, Some(actor)),
            &review,
        )?;

        self.repository.update(review.id, patch).await
    }

    /// Deletes a review with its comments. Allowed for its author, moderators and admins.
    pub async fn delete(&self, actor: &User, title_id: i64, review_id: i64) -> Result<(), AppError> {
        let review = self.get(title_id, review_id).await?;
        authorize_object(
            &IsAuthorOrStaffOrReadOnly,
            &RequestContext::new(Access::Write, Some(actor)),
            &review,
        )?;

        self.repository.delete(review.id).await
    }

    async fn ensure_title(&self, title_id: i64) -> Result<(), AppError> {
        if self.titles.exists(title_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Title not found", json!({ "id": title_id })))
        }
    }
}

fn check_score(score: i32) -> Result<(), AppError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(AppError::invalid_field(
            "score",
            format!("Score must be between {MIN_SCORE} and {MAX_SCORE}"),
        ))
    }
}

fn already_reviewed() -> AppError {
    AppError::bad_request(
        "You have already reviewed this title",
        json!({ "non_field_errors": ["You have already reviewed this title"] }),
    )
}
