//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and message delivery.
//!
//! # Modules
//!
//! - [`mail`] - Confirmation code delivery
//! - [`persistence`] - PostgreSQL repository implementations

pub mod mail;
pub mod persistence;
