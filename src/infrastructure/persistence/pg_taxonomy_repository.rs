//! PostgreSQL implementation of the category/genre repository.
//!
//! Categories and genres live in two tables of identical shape; the table is
//! picked from [`Taxonomy::table`], which only ever yields a fixed identifier.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewTaxon, Taxon, Taxonomy};
use crate::domain::repositories::{Page, TaxonomyRepository};
use crate::error::AppError;
use crate::utils::db_error::violated_unique_constraint;
use crate::utils::like_pattern::contains_pattern;

#[derive(sqlx::FromRow)]
struct TaxonRow {
    id: i64,
    name: String,
    slug: String,
}

impl From<TaxonRow> for Taxon {
    fn from(row: TaxonRow) -> Self {
        Taxon {
            id: row.id,
            name: row.name,
            slug: row.slug,
        }
    }
}

pub struct PgTaxonomyRepository {
    pool: Arc<PgPool>,
}

impl PgTaxonomyRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaxonomyRepository for PgTaxonomyRepository {
    async fn create(&self, kind: Taxonomy, new_taxon: NewTaxon) -> Result<Taxon, AppError> {
        let sql = format!(
            "INSERT INTO {} (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
            kind.table()
        );

        let row = sqlx::query_as::<_, TaxonRow>(&sql)
            .bind(&new_taxon.name)
            .bind(&new_taxon.slug)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| match violated_unique_constraint(&e) {
                Some(_) => AppError::invalid_field(
                    "slug",
                    format!("{} with slug '{}' already exists", kind.label(), new_taxon.slug),
                ),
                None => AppError::from(e),
            })?;

        tracing::info!(
            table = kind.table(),
            id = row.id,
            slug = %row.slug,
            "Taxon created"
        );

        Ok(row.into())
    }

    async fn find_by_slug(&self, kind: Taxonomy, slug: &str) -> Result<Option<Taxon>, AppError> {
        let sql = format!("SELECT id, name, slug FROM {} WHERE slug = $1", kind.table());

        let row = sqlx::query_as::<_, TaxonRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Taxon::from))
    }

    async fn find_by_slugs(
        &self,
        kind: Taxonomy,
        slugs: Vec<String>,
    ) -> Result<Vec<Taxon>, AppError> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, name, slug FROM {} WHERE slug = ANY($1) ORDER BY name",
            kind.table()
        );

        let rows = sqlx::query_as::<_, TaxonRow>(&sql)
            .bind(&slugs)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Taxon::from).collect())
    }

    async fn list(
        &self,
        kind: Taxonomy,
        search: Option<String>,
        page: Page,
    ) -> Result<Vec<Taxon>, AppError> {
        let sql = format!(
            r#"
            SELECT id, name, slug
            FROM {}
            WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\')
            ORDER BY name, id
            LIMIT $2 OFFSET $3
            "#,
            kind.table()
        );

        let rows = sqlx::query_as::<_, TaxonRow>(&sql)
            .bind(search.as_deref().map(contains_pattern))
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Taxon::from).collect())
    }

    async fn count(&self, kind: Taxonomy, search: Option<String>) -> Result<i64, AppError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\\')",
            kind.table()
        );

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(search.as_deref().map(contains_pattern))
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn delete_by_slug(&self, kind: Taxonomy, slug: &str) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE slug = $1", kind.table());

        let result = sqlx::query(&sql)
            .bind(slug)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                format!("{} not found", kind.label()),
                json!({ "slug": slug }),
            ));
        }

        tracing::info!(table = kind.table(), slug = %slug, "Taxon deleted");

        Ok(())
    }
}
