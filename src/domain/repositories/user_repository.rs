//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::repositories::Page;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for accounts.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the username or email is taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lists accounts ordered by username, optionally filtered by a username
    /// substring.
    async fn list(&self, search: Option<String>, page: Page) -> Result<Vec<User>, AppError>;

    async fn count(&self, search: Option<String>) -> Result<i64, AppError>;

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the account does not exist.
    /// Returns [`AppError::Conflict`] if the new username or email is taken.
    async fn update(&self, id: i64, patch: UserPatch) -> Result<User, AppError>;

    /// Deletes an account together with its reviews and comments.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the account does not exist.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Stores (or clears, with `None`) the hash of the outstanding confirmation code.
    async fn set_confirmation_code(
        &self,
        id: i64,
        code_hash: Option<String>,
    ) -> Result<(), AppError>;
}
