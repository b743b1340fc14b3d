//! Account management service.

use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::repositories::{Page, UserRepository};
use crate::domain::validators::validate_name;
use crate::error::{AppError, field_error};
use serde_json::json;
use std::sync::Arc;

/// Service for administering accounts and the caller's own profile.
pub struct UserService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates an account on behalf of an administrator.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the username is invalid.
    /// Returns [`AppError::Conflict`] if the username or email is taken.
    pub async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        validate_name(&new_user.username).map_err(|e| field_error("username", e))?;

        let user = self.repository.create(new_user).await?;

        tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "User created");

        Ok(user)
    }

    pub async fn list(&self, search: Option<String>, page: Page) -> Result<Vec<User>, AppError> {
        self.repository.list(search, page).await
    }

    pub async fn count(&self, search: Option<String>) -> Result<i64, AppError> {
        self.repository.count(search).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no account has this username.
    pub async fn get_by_username(&self, username: &str) -> Result<User, AppError> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "username": username })))
    }

    /// Applies an administrator's partial update, role included.
    pub async fn update_by_username(
        &self,
        username: &str,
        patch: UserPatch,
    ) -> Result<User, AppError> {
        let user = self.get_by_username(username).await?;
        self.apply(user.id, patch).await
    }

    pub async fn delete_by_username(&self, username: &str) -> Result<(), AppError> {
        let user = self.get_by_username(username).await?;
        self.repository.delete(user.id).await?;

        tracing::info!(user_id = user.id, username = %user.username, "User deleted");

        Ok(())
    }

    /// Updates the caller's own profile. The role cannot be changed this way.
    pub async fn update_me(&self, me: &User, mut patch: UserPatch) -> Result<User, AppError> {
        patch.role = None;
        self.apply(me.id, patch).await
    }

    async fn apply(&self, id: i64, patch: UserPatch) -> Result<User, AppError> {
        if let Some(username) = &patch.username {
            validate_name(username).map_err(|e| field_error("username", e))?;
        }

        let user = self.repository.update(id, patch).await?;

        tracing::info!(user_id = user.id, "User updated");

        Ok(user)
    }
}
