//! PostgreSQL implementation of the title repository.
//!
//! Every read aggregates `AVG(score)` over the title's reviews in the same
//! statement, so ratings are never stale. Genres are loaded with a second
//! query for the whole page at once.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{
    NewTitle, Taxon, Title, TitleFilter, TitlePatch, rating_from_average,
};
use crate::domain::repositories::{Page, TitleRepository};
use crate::error::AppError;
use crate::utils::db_error::{is_foreign_key_violation_on, violated_foreign_key};
use crate::utils::like_pattern::contains_pattern;

const TITLE_SELECT: &str = r#"
    SELECT t.id, t.name, t.year, t.description,
           c.id AS category_id, c.name AS category_name, c.slug AS category_slug,
           (SELECT AVG(r.score)::float8 FROM reviews r WHERE r.title_id = t.id) AS average_score
    FROM titles t
    JOIN categories c ON c.id = t.category_id
"#;

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::text IS NULL OR c.slug = $1)
      AND ($2::text IS NULL OR EXISTS (
            SELECT 1 FROM genre_title gt
            JOIN genres g ON g.id = gt.genre_id
            WHERE gt.title_id = t.id AND g.slug = $2))
      AND ($3::text IS NULL OR t.name ILIKE $3 ESCAPE '\')
      AND ($4::int IS NULL OR t.year = $4)
"#;

/// Maps a write that referenced a missing category or genre to a field error.
fn reference_error(e: sqlx::Error) -> AppError {
    match violated_foreign_key(&e) {
        Some("titles_category_id_fkey") => AppError::bad_request(
            "Category does not exist",
            json!({ "category": ["Category does not exist"] }),
        ),
        Some("genre_title_genre_id_fkey") => AppError::bad_request(
            "Genre does not exist",
            json!({ "genre": ["Genre does not exist"] }),
        ),
        _ => AppError::from(e),
    }
}

#[derive(sqlx::FromRow)]
struct TitleRow {
    id: i64,
    name: String,
    year: i32,
    description: String,
    category_id: i64,
    category_name: String,
    category_slug: String,
    average_score: Option<f64>,
}

impl TitleRow {
    fn into_title(self, genres: Vec<Taxon>) -> Title {
        Title {
            id: self.id,
            name: self.name,
            year: self.year,
            description: self.description,
            category: Taxon {
                id: self.category_id,
                name: self.category_name,
                slug: self.category_slug,
            },
            genres,
            rating: rating_from_average(self.average_score),
        }
    }
}

#[derive(sqlx::FromRow)]
struct GenreLinkRow {
    title_id: i64,
    id: i64,
    name: String,
    slug: String,
}

pub struct PgTitleRepository {
    pool: Arc<PgPool>,
}

impl PgTitleRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Loads genres for the given titles, keyed by title id.
    async fn genres_for(&self, title_ids: &[i64]) -> Result<HashMap<i64, Vec<Taxon>>, AppError> {
        let rows = sqlx::query_as::<_, GenreLinkRow>(
            r#"
            SELECT gt.title_id, g.id, g.name, g.slug
            FROM genre_title gt
            JOIN genres g ON g.id = gt.genre_id
            WHERE gt.title_id = ANY($1)
            ORDER BY g.name
            "#,
        )
        .bind(title_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut by_title: HashMap<i64, Vec<Taxon>> = HashMap::new();
        for row in rows {
            by_title.entry(row.title_id).or_default().push(Taxon {
                id: row.id,
                name: row.name,
                slug: row.slug,
            });
        }

        Ok(by_title)
    }

    async fn with_genres(&self, rows: Vec<TitleRow>) -> Result<Vec<Title>, AppError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut genres = self.genres_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let title_genres = genres.remove(&row.id).unwrap_or_default();
                row.into_title(title_genres)
            })
            .collect())
    }

    async fn replace_genres(
        tx: &mut Transaction<'_, Postgres>,
        title_id: i64,
        genre_ids: &[i64],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM genre_title WHERE title_id = $1")
            .bind(title_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO genre_title (genre_id, title_id)
            SELECT UNNEST($1::bigint[]), $2
            ON CONFLICT (genre_id, title_id) DO NOTHING
            "#,
        )
        .bind(genre_ids)
        .bind(title_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation_on(&e, "genre_title_title_id_fkey") {
                AppError::not_found("Title not found", json!({ "id": title_id }))
            } else {
                reference_error(e)
            }
        })?;

        Ok(())
    }

    async fn fetch(&self, id: i64) -> Result<Title, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Title not found", json!({ "id": id })))
    }
}

#[async_trait]
impl TitleRepository for PgTitleRepository {
    async fn create(&self, new_title: NewTitle) -> Result<Title, AppError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO titles (name, year, description, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&new_title.name)
        .bind(new_title.year)
        .bind(&new_title.description)
        .bind(new_title.category_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(reference_error)?;

        Self::replace_genres(&mut tx, id, &new_title.genre_ids).await?;
        tx.commit().await?;

        tracing::info!(title_id = id, name = %new_title.name, "Title created");

        self.fetch(id).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Title>, AppError> {
        let sql = format!("{TITLE_SELECT} WHERE t.id = $1");

        let Some(row) = sqlx::query_as::<_, TitleRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
        else {
            return Ok(None);
        };

        Ok(self.with_genres(vec![row]).await?.pop())
    }

    async fn exists(&self, id: i64) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM titles WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn list(&self, filter: TitleFilter, page: Page) -> Result<Vec<Title>, AppError> {
        let sql = format!(
            "{TITLE_SELECT} {FILTER_CLAUSE} ORDER BY t.name DESC, t.id LIMIT $5 OFFSET $6"
        );

        let rows = sqlx::query_as::<_, TitleRow>(&sql)
            .bind(filter.category)
            .bind(filter.genre)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.year)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        self.with_genres(rows).await
    }

    async fn count(&self, filter: TitleFilter) -> Result<i64, AppError> {
        let sql = format!(
            "SELECT COUNT(*) FROM titles t JOIN categories c ON c.id = t.category_id {FILTER_CLAUSE}"
        );

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(filter.category)
            .bind(filter.genre)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.year)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, patch: TitlePatch) -> Result<Title, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE titles SET
                name        = COALESCE($2, name),
                year        = COALESCE($3, year),
                description = COALESCE($4, description),
                category_id = COALESCE($5, category_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.year)
        .bind(patch.description)
        .bind(patch.category_id)
        .execute(&mut *tx)
        .await
        .map_err(reference_error)?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found("Title not found", json!({ "id": id })));
        }

        if let Some(genre_ids) = patch.genre_ids {
            Self::replace_genres(&mut tx, id, &genre_ids).await?;
        }

        tx.commit().await?;

        tracing::info!(title_id = id, "Title updated");

        self.fetch(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Title not found", json!({ "id": id })));
        }

        tracing::info!(title_id = id, "Title deleted");

        Ok(())
    }
}
