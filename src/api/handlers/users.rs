//! Handlers for account administration and the caller's own profile.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::pagination::{Paginated, SearchParams};
use crate::api::dto::user::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::api::extract::{QueryParams, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::domain::entities::User;
use crate::domain::permissions::{Access, IsAdmin, RequestContext, authorize};
use crate::error::AppError;
use crate::state::AppState;

fn require_admin(user: &User) -> Result<(), AppError> {
    authorize(&IsAdmin, &RequestContext::new(Access::Write, Some(user)))
}

/// Lists accounts, optionally filtered by a username substring.
///
/// # Endpoint
///
/// `GET /api/v1/users?search=<term>&page=<n>&page_size=<n>`
///
/// Admin only.
pub async fn list_users_handler(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<Paginated<UserResponse>>, AppError> {
    require_admin(&caller)?;

    let page = params.pagination.to_page()?;
    let search = params.term();

    let (users, total) = tokio::try_join!(
        state.user_service.list(search.clone(), page),
        state.user_service.count(search)
    )?;

    Ok(Json(
        Paginated::new(users, total, &params.pagination).map(UserResponse::from),
    ))
}

/// Creates an account with any role.
///
/// # Endpoint
///
/// `POST /api/v1/users`
///
/// # Response Codes
///
/// - **201 Created**: Account created
/// - **400 Bad Request**: Invalid fields
/// - **409 Conflict**: Username or email taken
pub async fn create_user_handler(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    require_admin(&caller)?;

    let user = state.user_service.create(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `GET /api/v1/users/{username}`, admin only.
pub async fn get_user_handler(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    require_admin(&caller)?;

    let user = state.user_service.get_by_username(&username).await?;

    Ok(Json(user.into()))
}

/// `PATCH /api/v1/users/{username}`, admin only. The role may be changed.
pub async fn update_user_handler(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(username): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    require_admin(&caller)?;

    let user = state
        .user_service
        .update_by_username(&username, payload.into())
        .await?;

    Ok(Json(user.into()))
}

/// `DELETE /api/v1/users/{username}`, admin only.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(username): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(&caller)?;

    state.user_service.delete_by_username(&username).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the caller's profile.
///
/// # Endpoint
///
/// `GET /api/v1/users/me`
pub async fn me_handler(CurrentUser(me): CurrentUser) -> Json<UserResponse> {
    Json(me.into())
}

/// Updates the caller's profile. A `role` in the body is ignored.
///
/// # Endpoint
///
/// `PATCH /api/v1/users/me`
pub async fn update_me_handler(
    State(state): State<AppState>,
    CurrentUser(me): CurrentUser,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service.update_me(&me, payload.into()).await?;

    Ok(Json(user.into()))
}
