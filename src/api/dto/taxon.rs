//! DTOs for categories and genres.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{NewTaxon, Taxon};
use crate::domain::validators::validate_slug;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TaxonResponse {
    pub name: String,
    pub slug: String,
}

impl From<Taxon> for TaxonResponse {
    fn from(taxon: Taxon) -> Self {
        Self {
            name: taxon.name,
            slug: taxon.slug,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaxonRequest {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(length(min = 1, max = 50))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
}

impl From<CreateTaxonRequest> for NewTaxon {
    fn from(request: CreateTaxonRequest) -> Self {
        NewTaxon {
            name: request.name,
            slug: request.slug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_charset_and_length() {
        let ok = CreateTaxonRequest {
            name: "Science fiction".to_string(),
            slug: "sci-fi_1".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = CreateTaxonRequest {
            name: "Science fiction".to_string(),
            slug: "sci fi".to_string(),
        };
        assert!(bad.validate().unwrap_err().field_errors().contains_key("slug"));

        let long = CreateTaxonRequest {
            name: "x".to_string(),
            slug: "a".repeat(51),
        };
        assert!(long.validate().is_err());
    }
}
