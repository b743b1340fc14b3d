//! Pagination query parameters and the paginated response envelope.

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::repositories::Page;
use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers,
/// which keeps working when the struct is `#[serde(flatten)]`ed.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Validates pagination parameters and converts them to an offset/limit window.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 10
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the page is 0 or the page size is
    /// outside 1..=100.
    pub fn to_page(&self) -> Result<Page, AppError> {
        let page = self.page();
        let page_size = self.page_size();

        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "page": ["Page must be greater than 0"] }),
            ));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::bad_request(
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                json!({ "page_size": [format!("Page size must be between 1 and {MAX_PAGE_SIZE}")] }),
            ));
        }

        let offset = i64::from(page - 1) * i64::from(page_size);

        Ok(Page::new(offset, i64::from(page_size)))
    }
}

/// A page of results together with the total count.
///
/// `next` and `previous` are page numbers, or `null` at either end.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<u32>,
    pub previous: Option<u32>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(results: Vec<T>, count: i64, params: &PaginationParams) -> Self {
        let page = params.page();
        let page_size = i64::from(params.page_size());
        let seen = i64::from(page) * page_size;

        Self {
            count,
            next: (seen < count).then_some(page + 1),
            previous: (page > 1).then(|| page - 1),
            results,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Free-text `?search=` filter combined with pagination.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl SearchParams {
    /// Search term, with blank values treated as absent.
    pub fn term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}
