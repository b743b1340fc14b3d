//! Core domain entities.
//!
//! Entities are plain data structures. Creation inputs live in separate
//! `New*` structs and partial updates in `*Patch` structs.
//!
//! - [`User`] - an account with a [`Role`]
//! - [`Taxon`] - a category or genre, see [`Taxonomy`]
//! - [`Title`] - a creative work with a derived rating
//! - [`Review`], [`Comment`] - user writing, sharing the [`Authored`] field group

pub mod authored;
pub mod review;
pub mod taxon;
pub mod title;
pub mod user;

pub use authored::{Authored, Owned};
pub use review::{Comment, NewComment, NewReview, Review, ReviewPatch};
pub use taxon::{NewTaxon, Taxon, Taxonomy};
pub use title::{NewTitle, Title, TitleFilter, TitlePatch, rating_from_average};
pub use user::{NewUser, Role, User, UserPatch};
