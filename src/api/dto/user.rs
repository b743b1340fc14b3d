//! DTOs for user accounts.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{NewUser, Role, User, UserPatch};
use crate::domain::validators::validate_name;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role,
        }
    }
}

/// Admin-created account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(custom(function = "validate_name"))]
    pub username: String,

    #[validate(email(message = "Enter a valid email address"))]
    #[validate(length(max = 254))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,

    #[serde(default)]
    pub bio: String,

    #[serde(default)]
    pub role: Role,
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        NewUser {
            username: request.username,
            email: request.email,
            role: request.role,
            first_name: request.first_name,
            last_name: request.last_name,
            bio: request.bio,
            ..NewUser::default()
        }
    }
}

/// Partial update. `role` is ignored on `/users/me/`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: Option<String>,

    #[validate(email(message = "Enter a valid email address"))]
    #[validate(length(max = 254))]
    pub email: Option<String>,

    #[validate(length(max = 150))]
    pub first_name: Option<String>,

    #[validate(length(max = 150))]
    pub last_name: Option<String>,

    pub bio: Option<String>,

    pub role: Option<Role>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(request: UpdateUserRequest) -> Self {
        UserPatch {
            username: request.username,
            email: request.email,
            role: request.role,
            first_name: request.first_name,
            last_name: request.last_name,
            bio: request.bio,
        }
    }
}
