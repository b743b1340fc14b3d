//! Category and genre management service.

use crate::domain::entities::{NewTaxon, Taxon, Taxonomy};
use crate::domain::repositories::{Page, TaxonomyRepository};
use crate::domain::validators::validate_slug;
use crate::error::{AppError, field_error};
use std::sync::Arc;

pub struct TaxonomyService<R: TaxonomyRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: TaxonomyRepository + ?Sized> TaxonomyService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates a category or genre.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the slug is malformed or taken.
    pub async fn create(&self, kind: Taxonomy, new_taxon: NewTaxon) -> Result<Taxon, AppError> {
        validate_slug(&new_taxon.slug).map_err(|e| field_error("slug", e))?;
        self.repository.create(kind, new_taxon).await
    }

    pub async fn list(
        &self,
        kind: Taxonomy,
        search: Option<String>,
        page: Page,
    ) -> Result<Vec<Taxon>, AppError> {
        self.repository.list(kind, search, page).await
    }

    pub async fn count(&self, kind: Taxonomy, search: Option<String>) -> Result<i64, AppError> {
        self.repository.count(kind, search).await
    }

    pub async fn delete(&self, kind: Taxonomy, slug: &str) -> Result<(), AppError> {
        self.repository.delete_by_slug(kind, slug).await
    }

    /// Resolves a slug referenced from a write request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on `field` if the slug is unknown.
    pub async fn resolve(&self, kind: Taxonomy, field: &str, slug: &str) -> Result<Taxon, AppError> {
        self.repository
            .find_by_slug(kind, slug)
            .await?
            .ok_or_else(|| unknown_slug(kind, field, slug))
    }

    /// Resolves several slugs. Duplicates collapse into one tag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on `field` naming the first unknown slug.
    pub async fn resolve_all(
        &self,
        kind: Taxonomy,
        field: &str,
        slugs: &[String],
    ) -> Result<Vec<Taxon>, AppError> {
        let mut wanted = slugs.to_vec();
        wanted.sort();
        wanted.dedup();

        let found = self.repository.find_by_slugs(kind, wanted.clone()).await?;

        if let Some(missing) = wanted.iter().find(|s| !found.iter().any(|t| &t.slug == *s)) {
            return Err(unknown_slug(kind, field, missing));
        }

        Ok(found)
    }
}

fn unknown_slug(kind: Taxonomy, field: &str, slug: &str) -> AppError {
    AppError::invalid_field(
        field,
        format!("{} with slug '{slug}' does not exist", kind.label()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockTaxonomyRepository;

    fn taxon(id: i64, slug: &str) -> Taxon {
        Taxon {
            id,
            name: slug.to_uppercase(),
            slug: slug.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_bad_slug() {
        let mut repo = MockTaxonomyRepository::new();
        repo.expect_create().never();

        let service = TaxonomyService::new(Arc::new(repo));
        let err = service
            .create(
                Taxonomy::Genre,
                NewTaxon {
                    name: "Sci-Fi".to_string(),
                    slug: "sci fi".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.to_error_info().details.get("slug").is_some());
    }

    #[tokio::test]
    async fn test_resolve_unknown_slug_is_validation_error() {
        let mut repo = MockTaxonomyRepository::new();
        repo.expect_find_by_slug().returning(|_, _| Ok(None));

        let service = TaxonomyService::new(Arc::new(repo));
        let err = service
            .resolve(Taxonomy::Category, "category", "nope")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.to_error_info().details.get("category").is_some());
    }

    #[tokio::test]
    async fn test_resolve_all_reports_missing_slug() {
        let mut repo = MockTaxonomyRepository::new();
        repo.expect_find_by_slugs()
            .returning(|_, _| Ok(vec![taxon(1, "drama")]));

        let service = TaxonomyService::new(Arc::new(repo));
        let err = service
            .resolve_all(
                Taxonomy::Genre,
                "genre",
                &["drama".to_string(), "western".to_string()],
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("western"));
    }

    #[tokio::test]
    async fn test_resolve_all_deduplicates() {
        let mut repo = MockTaxonomyRepository::new();
        repo.expect_find_by_slugs()
            .withf(|kind, slugs| *kind == Taxonomy::Genre && slugs.len() == 2)
            .returning(|_, _| Ok(vec![taxon(1, "drama"), taxon(2, "comedy")]));

        let service = TaxonomyService::new(Arc::new(repo));
        let genres = service
            .resolve_all(
                Taxonomy::Genre,
                "genre",
                &[
                    "drama".to_string(),
                    "comedy".to_string(),
                    "drama".to_string(),
                ],
            )
            .await
            .unwrap();

        assert_eq!(genres.len(), 2);
    }
}
