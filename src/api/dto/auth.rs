//! DTOs for signup and token exchange.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::validators::validate_name;

/// `POST /api/v1/auth/signup/` body.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(custom(function = "validate_name"))]
    pub username: String,

    #[validate(email(message = "Enter a valid email address"))]
    #[validate(length(max = 254))]
    pub email: String,
}

/// Echo of the registered identity.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

/// `POST /api/v1/auth/token/` body.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(length(min = 1, message = "Confirmation code is required"))]
    pub confirmation_code: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
