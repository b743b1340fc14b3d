//! Handlers for self-registration and token exchange.

use axum::{Json, extract::State};

use crate::api::dto::auth::{SignupRequest, SignupResponse, TokenRequest, TokenResponse};
use crate::api::extract::ValidatedJson;
use crate::error::AppError;
use crate::state::AppState;

/// Registers an account (or re-sends the code) and mails a confirmation code.
///
/// # Endpoint
///
/// `POST /api/v1/auth/signup`
///
/// # Request Body
///
/// ```json
/// { "username": "reader", "email": "reader@example.com" }
/// ```
///
/// # Response Codes
///
/// - **200 OK**: Code sent; body echoes `username` and `email`
/// - **400 Bad Request**: Invalid username or email
/// - **409 Conflict**: Username or email already bound to another account
pub async fn signup_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> Result<Json<SignupResponse>, AppError> {
    let user = state
        .auth_service
        .signup(&payload.username, &payload.email)
        .await?;

    Ok(Json(SignupResponse {
        username: user.username,
        email: user.email,
    }))
}

/// Exchanges a confirmation code for an access token.
///
/// # Endpoint
///
/// `POST /api/v1/auth/token`
///
/// # Response Codes
///
/// - **200 OK**: `{"token": "<jwt>"}`
/// - **400 Bad Request**: Wrong or already used code
/// - **404 Not Found**: Unknown username
pub async fn token_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state
        .auth_service
        .exchange_code(&payload.username, &payload.confirmation_code)
        .await?;

    Ok(Json(TokenResponse { token }))
}
