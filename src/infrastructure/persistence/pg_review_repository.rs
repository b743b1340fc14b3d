//! PostgreSQL implementation of the review repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Authored, NewReview, Review, ReviewPatch};
use crate::domain::repositories::{Page, ReviewRepository};
use crate::error::AppError;
use crate::utils::db_error::{is_foreign_key_violation_on, is_unique_violation_on};

const REVIEW_COLUMNS: &str = "r.id, r.title_id, r.score, r.text, r.author_id, \
     u.username AS author, r.pub_date";

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    title_id: i64,
    score: i16,
    text: String,
    author_id: i64,
    author: String,
    pub_date: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            title_id: row.title_id,
            score: i32::from(row.score),
            body: Authored {
                text: row.text,
                author_id: row.author_id,
                author: row.author,
                pub_date: row.pub_date,
            },
        }
    }
}

fn score_column(score: i32) -> Result<i16, AppError> {
    i16::try_from(score)
        .map_err(|_| AppError::invalid_field("score", format!("Score {score} is out of range")))
}

pub struct PgReviewRepository {
    pool: Arc<PgPool>,
}

impl PgReviewRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn create(&self, new_review: NewReview) -> Result<Review, AppError> {
        let title_id = new_review.title_id;
        let sql = format!(
            r#"
            WITH r AS (
                INSERT INTO reviews (title_id, author_id, text, score)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT {REVIEW_COLUMNS}
            FROM r JOIN users u ON u.id = r.author_id
            "#
        );

        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(title_id)
            .bind(new_review.author_id)
            .bind(&new_review.text)
            .bind(score_column(new_review.score)?)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| {
                if is_unique_violation_on(&e, "unique_review") {
                    AppError::bad_request(
                        "You have already reviewed this title",
                        json!({ "non_field_errors": ["You have already reviewed this title"] }),
                    )
                } else if is_foreign_key_violation_on(&e, "reviews_title_id_fkey") {
                    AppError::not_found("Title not found", json!({ "id": title_id }))
                } else {
                    AppError::from(e)
                }
            })?;

        tracing::info!(
            review_id = row.id,
            title_id = row.title_id,
            author_id = row.author_id,
            "Review created"
        );

        Ok(row.into())
    }

    async fn find(&self, title_id: i64, review_id: i64) -> Result<Option<Review>, AppError> {
        let sql = format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews r JOIN users u ON u.id = r.author_id
            WHERE r.id = $1 AND r.title_id = $2
            "#
        );

        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(review_id)
            .bind(title_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Review::from))
    }

    async fn exists_by_author(&self, title_id: i64, author_id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2)",
        )
        .bind(title_id)
        .bind(author_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn list(&self, title_id: i64, page: Page) -> Result<Vec<Review>, AppError> {
        let sql = format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews r JOIN users u ON u.id = r.author_id
            WHERE r.title_id = $1
            ORDER BY r.pub_date DESC, r.id DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(title_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn count(&self, title_id: i64) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews WHERE title_id = $1")
                .bind(title_id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }

    async fn update(&self, review_id: i64, patch: ReviewPatch) -> Result<Review, AppError> {
        let score = patch.score.map(score_column).transpose()?;
        let sql = format!(
            r#"
            WITH r AS (
                UPDATE reviews SET
                    text  = COALESCE($2, text),
                    score = COALESCE($3, score)
                WHERE id = $1
                RETURNING *
            )
            SELECT {REVIEW_COLUMNS}
            FROM r JOIN users u ON u.id = r.author_id
            "#
        );

        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(review_id)
            .bind(patch.text)
            .bind(score)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("Review not found", json!({ "id": review_id })))?;

        tracing::info!(review_id, "Review updated");

        Ok(row.into())
    }

    async fn delete(&self, review_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Review not found",
                json!({ "id": review_id }),
            ));
        }

        tracing::info!(review_id, "Review deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_column_narrows_in_range_values() {
        assert_eq!(score_column(10).unwrap(), 10i16);
        assert!(score_column(i32::MAX).is_err());
    }
}
