//! DTOs for titles.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::taxon::TaxonResponse;
use crate::application::services::{TitleDraft, TitleDraftPatch};
use crate::domain::entities::{Title, TitleFilter};
use crate::domain::validators::validate_year_field;

/// Title as returned by every read: category and genres embedded, rating
/// aggregated from reviews.
#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub rating: Option<i32>,
    pub description: String,
    pub genre: Vec<TaxonResponse>,
    pub category: TaxonResponse,
}

impl From<Title> for TitleResponse {
    fn from(title: Title) -> Self {
        Self {
            id: title.id,
            name: title.name,
            year: title.year,
            rating: title.rating,
            description: title.description,
            genre: title.genres.into_iter().map(TaxonResponse::from).collect(),
            category: title.category.into(),
        }
    }
}

/// Write body: category and genres are referenced by slug.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTitleRequest {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(range(min = 0), custom(function = "validate_year_field"))]
    pub year: i32,

    #[serde(default)]
    pub description: String,

    #[validate(length(min = 1, max = 50))]
    pub category: String,

    #[validate(length(min = 1, message = "At least one genre is required"))]
    pub genre: Vec<String>,
}

impl From<CreateTitleRequest> for TitleDraft {
    fn from(request: CreateTitleRequest) -> Self {
        TitleDraft {
            name: request.name,
            year: request.year,
            description: request.description,
            category: request.category,
            genre: request.genre,
        }
    }
}

/// Partial update; absent fields keep their value, `genre` replaces the set.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTitleRequest {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    #[validate(range(min = 0))]
    pub year: Option<i32>,

    pub description: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,

    #[validate(length(min = 1, message = "At least one genre is required"))]
    pub genre: Option<Vec<String>>,
}

impl From<UpdateTitleRequest> for TitleDraftPatch {
    fn from(request: UpdateTitleRequest) -> Self {
        TitleDraftPatch {
            name: request.name,
            year: request.year,
            description: request.description,
            category: request.category,
            genre: request.genre,
        }
    }
}

/// `GET /titles/` filters.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct TitleQuery {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub name: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub year: Option<i32>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl TitleQuery {
    pub fn filter(&self) -> TitleFilter {
        let non_blank = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());

        TitleFilter {
            category: non_blank(&self.category),
            genre: non_blank(&self.genre),
            name: non_blank(&self.name),
            year: self.year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Taxon;
    use chrono::{Datelike, Utc};

    fn request(year: i32, genre: Vec<&str>) -> CreateTitleRequest {
        CreateTitleRequest {
            name: "Solaris".to_string(),
            year,
            description: String::new(),
            category: "movie".to_string(),
            genre: genre.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn test_future_year_rejected() {
        let errors = request(Utc::now().year() + 1, vec!["drama"])
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("year"));
    }

    #[test]
    fn test_negative_year_rejected() {
        let errors = request(-1, vec!["drama"]).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("year"));

        let patch = UpdateTitleRequest {
            year: Some(-1),
            ..UpdateTitleRequest::default()
        };
        assert!(patch.validate().unwrap_err().field_errors().contains_key("year"));
    }

    #[test]
    fn test_year_zero_accepted() {
        assert!(request(0, vec!["drama"]).validate().is_ok());
    }

    #[test]
    fn test_current_year_and_genre_accepted() {
        assert!(request(Utc::now().year(), vec!["drama"]).validate().is_ok());
    }

    #[test]
    fn test_empty_genre_rejected() {
        let errors = request(1972, vec![]).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("genre"));
    }

    #[test]
    fn test_response_embeds_taxa() {
        let title = Title {
            id: 1,
            name: "Solaris".to_string(),
            year: 1972,
            description: String::new(),
            category: Taxon {
                id: 1,
                name: "Movie".to_string(),
                slug: "movie".to_string(),
            },
            genres: vec![Taxon {
                id: 2,
                name: "Drama".to_string(),
                slug: "drama".to_string(),
            }],
            rating: None,
        };

        let json = serde_json::to_value(TitleResponse::from(title)).unwrap();
        assert_eq!(json["category"]["slug"], "movie");
        assert_eq!(json["genre"][0]["slug"], "drama");
        assert!(json["rating"].is_null());
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let query = TitleQuery {
            name: Some(" ".to_string()),
            year: Some(1972),
            ..TitleQuery::default()
        };
        let filter = query.filter();
        assert!(filter.name.is_none());
        assert_eq!(filter.year, Some(1972));
    }
}
