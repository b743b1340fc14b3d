//! Repository trait for categories and genres.

use crate::domain::entities::{NewTaxon, Taxon, Taxonomy};
use crate::domain::repositories::Page;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for classification tags.
///
/// Every method takes the [`Taxonomy`] it operates on; categories and genres
/// share the same shape and rules.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    /// Creates a tag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the slug is already used.
    async fn create(&self, kind: Taxonomy, new_taxon: NewTaxon) -> Result<Taxon, AppError>;

    async fn find_by_slug(&self, kind: Taxonomy, slug: &str) -> Result<Option<Taxon>, AppError>;

    /// Resolves several slugs at once. Unknown slugs are absent from the result.
    async fn find_by_slugs(&self, kind: Taxonomy, slugs: Vec<String>)
    -> Result<Vec<Taxon>, AppError>;

    /// Lists tags ordered by name, optionally filtered by a name substring.
    async fn list(
        &self,
        kind: Taxonomy,
        search: Option<String>,
        page: Page,
    ) -> Result<Vec<Taxon>, AppError>;

    async fn count(&self, kind: Taxonomy, search: Option<String>) -> Result<i64, AppError>;

    /// Deletes a tag by slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no tag has this slug.
    async fn delete_by_slug(&self, kind: Taxonomy, slug: &str) -> Result<(), AppError>;
}
