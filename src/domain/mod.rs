//! Domain layer: entities, validation rules, permission predicates and
//! repository contracts.
//!
//! - [`entities`] - Core data structures
//! - [`validators`] - Pure field validators (username, year, genres, slug)
//! - [`permissions`] - Role-based access predicates
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependency on infrastructure. Repository traits are
//! implemented in [`crate::infrastructure::persistence`].

pub mod entities;
pub mod permissions;
pub mod repositories;
pub mod validators;
