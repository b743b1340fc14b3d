//! Title catalog service.
//!
//! Write requests reference the category and genres by slug; they are
//! resolved here before anything is stored.

use crate::domain::entities::{NewTitle, Taxonomy, Title, TitleFilter, TitlePatch};
use crate::domain::repositories::{Page, TaxonomyRepository, TitleRepository};
use crate::domain::validators::{validate_genre_field, validate_year_field};
use crate::error::{AppError, field_error};
use serde_json::json;
use std::sync::Arc;

use super::TaxonomyService;

/// Title fields as submitted by a client, with slugs instead of ids.
#[derive(Debug, Clone, Default)]
pub struct TitleDraft {
    pub name: String,
    pub year: i32,
    pub description: String,
    pub category: String,
    pub genre: Vec<String>,
}

/// Partial title update with slug references.
#[derive(Debug, Clone, Default)]
pub struct TitleDraftPatch {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

pub struct TitleService<R: TitleRepository + ?Sized, T: TaxonomyRepository + ?Sized> {
    repository: Arc<R>,
    taxonomy: TaxonomyService<T>,
}

impl<R: TitleRepository + ?Sized, T: TaxonomyRepository + ?Sized> TitleService<R, T> {
    pub fn new(repository: Arc<R>, taxonomy_repository: Arc<T>) -> Self {
        Self {
            repository,
            taxonomy: TaxonomyService::new(taxonomy_repository),
        }
    }

    /// Creates a title.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the year is in the future, no genre
    /// is given, or a category/genre slug is unknown.
    pub async fn create(&self, draft: TitleDraft) -> Result<Title, AppError> {
        validate_year_field(draft.year).map_err(|e| field_error("year", e))?;
        validate_genre_field(&draft.genre).map_err(|e| field_error("genre", e))?;

        let category = self
            .taxonomy
            .resolve(Taxonomy::Category, "category", &draft.category)
            .await?;
        let genres = self
            .taxonomy
            .resolve_all(Taxonomy::Genre, "genre", &draft.genre)
            .await?;

        self.repository
            .create(NewTitle {
                name: draft.name,
                year: draft.year,
                description: draft.description,
                category_id: category.id,
                genre_ids: genres.iter().map(|g| g.id).collect(),
            })
            .await
    }

    pub async fn list(&self, filter: TitleFilter, page: Page) -> Result<Vec<Title>, AppError> {
        self.repository.list(filter, page).await
    }

    pub async fn count(&self, filter: TitleFilter) -> Result<i64, AppError> {
        self.repository.count(filter).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the title does not exist.
    pub async fn get(&self, id: i64) -> Result<Title, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Title not found", json!({ "id": id })))
    }

    pub async fn update(&self, id: i64, draft: TitleDraftPatch) -> Result<Title, AppError> {
        if let Some(year) = draft.year {
            validate_year_field(year).map_err(|e| field_error("year", e))?;
        }
        if let Some(genre) = &draft.genre {
            validate_genre_field(genre).map_err(|e| field_error("genre", e))?;
        }

        let category_id = match &draft.category {
            Some(slug) => Some(
                self.taxonomy
                    .resolve(Taxonomy::Category, "category", slug)
                    .await?
                    .id,
            ),
            None => None,
        };

        let genre_ids = match &draft.genre {
            Some(slugs) => Some(
                self.taxonomy
                    .resolve_all(Taxonomy::Genre, "genre", slugs)
                    .await?
                    .iter()
                    .map(|g| g.id)
                    .collect(),
            ),
            None => None,
        };

        self.repository
            .update(
                id,
                TitlePatch {
                    name: draft.name,
                    year: draft.year,
                    description: draft.description,
                    category_id,
                    genre_ids,
                },
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Taxon;
    use crate::domain::repositories::{MockTaxonomyRepository, MockTitleRepository};
    use chrono::{Datelike, Utc};

    fn taxon(id: i64, slug: &str) -> Taxon {
        Taxon {
            id,
            name: slug.to_string(),
            slug: slug.to_string(),
        }
    }

    fn title_from(new_title: &NewTitle) -> Title {
        Title {
            id: 1,
            name: new_title.name.clone(),
            year: new_title.year,
            description: new_title.description.clone(),
            category: taxon(new_title.category_id, "movie"),
            genres: new_title
                .genre_ids
                .iter()
                .map(|id| taxon(*id, "drama"))
                .collect(),
            rating: None,
        }
    }

    fn draft() -> TitleDraft {
        TitleDraft {
            name: "Solaris".to_string(),
            year: 1972,
            description: String::new(),
            category: "movie".to_string(),
            genre: vec!["drama".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_resolves_slugs() {
        let mut titles = MockTitleRepository::new();
        titles
            .expect_create()
            .withf(|t| t.category_id == 10 && t.genre_ids == vec![20])
            .times(1)
            .returning(|t| Ok(title_from(&t)));

        let mut taxonomy = MockTaxonomyRepository::new();
        taxonomy
            .expect_find_by_slug()
            .returning(|_, slug| Ok(Some(taxon(10, slug))));
        taxonomy
            .expect_find_by_slugs()
            .returning(|_, _| Ok(vec![taxon(20, "drama")]));

        let service = TitleService::new(Arc::new(titles), Arc::new(taxonomy));
        let created = service.create(draft()).await.unwrap();

        assert_eq!(created.name, "Solaris");
        assert_eq!(created.rating, None);
    }

    #[tokio::test]
    async fn test_create_rejects_future_year() {
        let mut titles = MockTitleRepository::new();
        titles.expect_create().never();

        let service = TitleService::new(Arc::new(titles), Arc::new(MockTaxonomyRepository::new()));
        let err = service
            .create(TitleDraft {
                year: Utc::now().year() + 1,
                ..draft()
            })
            .await
            .unwrap_err();

        assert!(err.to_error_info().details.get("year").is_some());
    }

    #[tokio::test]
    async fn test_create_requires_genre() {
        let service = TitleService::new(
            Arc::new(MockTitleRepository::new()),
            Arc::new(MockTaxonomyRepository::new()),
        );
        let err = service
            .create(TitleDraft {
                genre: vec![],
                ..draft()
            })
            .await
            .unwrap_err();

        assert!(err.to_error_info().details.get("genre").is_some());
    }

    #[tokio::test]
    async fn test_create_with_unknown_category_fails() {
        let mut taxonomy = MockTaxonomyRepository::new();
        taxonomy.expect_find_by_slug().returning(|_, _| Ok(None));

        let service = TitleService::new(Arc::new(MockTitleRepository::new()), Arc::new(taxonomy));
        let err = service.create(draft()).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.to_error_info().details.get("category").is_some());
    }

    #[tokio::test]
    async fn test_update_only_touches_given_fields() {
        let mut titles = MockTitleRepository::new();
        titles
            .expect_update()
            .withf(|id, patch| {
                *id == 3
                    && patch.name.as_deref() == Some("Stalker")
                    && patch.category_id.is_none()
                    && patch.genre_ids.is_none()
            })
            .times(1)
            .returning(|id, _| {
                Ok(Title {
                    id,
                    name: "Stalker".to_string(),
                    year: 1979,
                    description: String::new(),
                    category: taxon(1, "movie"),
                    genres: vec![taxon(2, "drama")],
                    rating: Some(9),
                })
            });

        let service = TitleService::new(Arc::new(titles), Arc::new(MockTaxonomyRepository::new()));
        let updated = service
            .update(
                3,
                TitleDraftPatch {
                    name: Some("Stalker".to_string()),
                    ..TitleDraftPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.rating, Some(9));
    }

    #[tokio::test]
    async fn test_get_missing_title_is_not_found() {
        let mut titles = MockTitleRepository::new();
        titles.expect_find_by_id().returning(|_| Ok(None));

        let service = TitleService::new(Arc::new(titles), Arc::new(MockTaxonomyRepository::new()));
        assert!(matches!(
            service.get(404).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}
