//! PostgreSQL implementation of the comment repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Authored, Comment, NewComment};
use crate::domain::repositories::{CommentRepository, Page};
use crate::error::AppError;
use crate::utils::db_error::is_foreign_key_violation_on;

const COMMENT_COLUMNS: &str =
    "c.id, c.review_id, c.text, c.author_id, u.username AS author, c.pub_date";

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    review_id: i64,
    text: String,
    author_id: i64,
    author: String,
    pub_date: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            review_id: row.review_id,
            body: Authored {
                text: row.text,
                author_id: row.author_id,
                author: row.author,
                pub_date: row.pub_date,
            },
        }
    }
}

pub struct PgCommentRepository {
    pool: Arc<PgPool>,
}

impl PgCommentRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, AppError> {
        let review_id = new_comment.review_id;
        let sql = format!(
            r#"
            WITH c AS (
                INSERT INTO comments (review_id, author_id, text)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT {COMMENT_COLUMNS}
            FROM c JOIN users u ON u.id = c.author_id
            "#
        );

        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(review_id)
            .bind(new_comment.author_id)
            .bind(&new_comment.text)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| {
                if is_foreign_key_violation_on(&e, "comments_review_id_fkey") {
                    AppError::not_found("Review not found", json!({ "id": review_id }))
                } else {
                    AppError::from(e)
                }
            })?;

        tracing::info!(
            comment_id = row.id,
            review_id = row.review_id,
            author_id = row.author_id,
            "Comment created"
        );

        Ok(row.into())
    }

    async fn find(&self, review_id: i64, comment_id: i64) -> Result<Option<Comment>, AppError> {
        let sql = format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments c JOIN users u ON u.id = c.author_id
            WHERE c.id = $1 AND c.review_id = $2
            "#
        );

        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(comment_id)
            .bind(review_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Comment::from))
    }

    async fn list(&self, review_id: i64, page: Page) -> Result<Vec<Comment>, AppError> {
        let sql = format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments c JOIN users u ON u.id = c.author_id
            WHERE c.review_id = $1
            ORDER BY c.pub_date DESC, c.id DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(review_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn count(&self, review_id: i64) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE review_id = $1")
                .bind(review_id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }

    async fn update_text(&self, comment_id: i64, text: String) -> Result<Comment, AppError> {
        let sql = format!(
            r#"
            WITH c AS (
                UPDATE comments SET text = $2 WHERE id = $1 RETURNING *
            )
            SELECT {COMMENT_COLUMNS}
            FROM c JOIN users u ON u.id = c.author_id
            "#
        );

        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(comment_id)
            .bind(text)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found", json!({ "id": comment_id })))?;

        Ok(row.into())
    }

    async fn delete(&self, comment_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Comment not found",
                json!({ "id": comment_id }),
            ));
        }

        tracing::info!(comment_id, "Comment deleted");

        Ok(())
    }
}
