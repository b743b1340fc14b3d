//! Bearer token authentication.
//!
//! Resolves `Authorization: Bearer <jwt>` to the signed-in [`User`]. Handlers
//! that require a caller take [`CurrentUser`]; anonymous requests are rejected
//! with `401 Unauthorized` before the handler runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_auth::AuthBearer;
use serde_json::json;

use crate::domain::entities::User;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller.
///
/// # Errors
///
/// Extraction fails with [`AppError::Unauthorized`] if:
/// - Authorization header is missing or not a bearer token
/// - Token signature or expiry is invalid
/// - The token's user no longer exists
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthBearer(token) = AuthBearer::from_request_parts(parts, &())
            .await
            .map_err(|_| {
                AppError::unauthorized(
                    "Authentication credentials were not provided",
                    json!({ "reason": "Authorization header is missing or invalid" }),
                )
            })?;

        let user = state.auth_service.authenticate(&token).await?;

        tracing::debug!(user_id = user.id, "Request authenticated");

        Ok(Self(user))
    }
}
