//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx.
//! Every repository holds an explicit shared [`sqlx::PgPool`].
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Accounts and confirmation codes
//! - [`PgTaxonomyRepository`] - Categories and genres
//! - [`PgTitleRepository`] - Titles with genres and aggregated rating
//! - [`PgReviewRepository`] - Reviews, guarded by the `unique_review` constraint
//! - [`PgCommentRepository`] - Comments
//! - [`PgHealthRepository`] - Connectivity probe

pub mod pg_comment_repository;
pub mod pg_health_repository;
pub mod pg_review_repository;
pub mod pg_taxonomy_repository;
pub mod pg_title_repository;
pub mod pg_user_repository;

pub use pg_comment_repository::PgCommentRepository;
pub use pg_health_repository::PgHealthRepository;
pub use pg_review_repository::PgReviewRepository;
pub use pg_taxonomy_repository::PgTaxonomyRepository;
pub use pg_title_repository::PgTitleRepository;
pub use pg_user_repository::PgUserRepository;
