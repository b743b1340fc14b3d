//! Repository trait definitions for the domain layer.
//!
//! Each aggregate gets an explicit async repository. Implementations live in
//! `crate::infrastructure::persistence`; mocks are generated with `mockall`
//! for service tests.
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - Accounts and confirmation codes
//! - [`TaxonomyRepository`] - Categories and genres
//! - [`TitleRepository`] - Titles, their genres and ratings
//! - [`ReviewRepository`] - Reviews of a title
//! - [`CommentRepository`] - Comments on a review
//! - [`HealthRepository`] - Storage connectivity

pub mod comment_repository;
pub mod health_repository;
pub mod review_repository;
pub mod taxonomy_repository;
pub mod title_repository;
pub mod user_repository;

pub use comment_repository::CommentRepository;
pub use health_repository::HealthRepository;
pub use review_repository::ReviewRepository;
pub use taxonomy_repository::TaxonomyRepository;
pub use title_repository::TitleRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use comment_repository::MockCommentRepository;
#[cfg(test)]
pub use health_repository::MockHealthRepository;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
#[cfg(test)]
pub use taxonomy_repository::MockTaxonomyRepository;
#[cfg(test)]
pub use title_repository::MockTitleRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;

/// A window into an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }
}
