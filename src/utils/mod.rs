//! Utility functions shared across layers.
//!
//! - [`code_generator`] - One-time confirmation code generation
//! - [`db_error`] - Constraint violation inspection
//! - [`like_pattern`] - Literal substring patterns for `ILIKE`

pub mod code_generator;
pub mod db_error;
pub mod like_pattern;
