//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod auth;
pub mod health;
pub mod pagination;
pub mod review;
pub mod taxon;
pub mod title;
pub mod user;
