//! Application layer services implementing business logic.
//!
//! Services validate input, enforce uniqueness and permission rules, and
//! coordinate repository calls. Handlers talk only to services.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Signup, confirmation codes and access tokens
//! - [`services::user_service::UserService`] - Account administration and own profile
//! - [`services::taxonomy_service::TaxonomyService`] - Categories and genres
//! - [`services::title_service::TitleService`] - Title catalog
//! - [`services::review_service::ReviewService`] - Reviews, one per author and title
//! - [`services::comment_service::CommentService`] - Comments on reviews

pub mod services;
