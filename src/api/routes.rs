//! API route configuration.
//!
//! Reads of the catalog, reviews and comments are public. Writes and all
//! account endpoints resolve the caller through
//! [`crate::api::middleware::CurrentUser`].

use crate::api::handlers::{
    create_category_handler, create_comment_handler, create_genre_handler, create_review_handler,
    create_title_handler, create_user_handler, delete_category_handler, delete_comment_handler,
    delete_genre_handler, delete_review_handler, delete_title_handler, delete_user_handler,
    get_comment_handler, get_review_handler, get_title_handler, get_user_handler,
    list_categories_handler, list_comments_handler, list_genres_handler, list_reviews_handler,
    list_titles_handler, list_users_handler, me_handler, signup_handler, token_handler,
    update_comment_handler, update_me_handler, update_review_handler, update_title_handler,
    update_user_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Unauthenticated registration endpoints.
///
/// # Endpoints
///
/// - `POST /auth/signup` - Register or re-send a confirmation code
/// - `POST /auth/token`  - Exchange a confirmation code for a JWT
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/token", post(token_handler))
}

/// Resource endpoints.
///
/// # Endpoints
///
/// - `GET|POST         /users`
/// - `GET|PATCH        /users/me`
/// - `GET|PATCH|DELETE /users/{username}`
/// - `GET|POST         /categories`
/// - `DELETE           /categories/{slug}`
/// - `GET|POST         /genres`
/// - `DELETE           /genres/{slug}`
/// - `GET|POST         /titles`
/// - `GET|PATCH|DELETE /titles/{title_id}`
/// - `GET|POST         /titles/{title_id}/reviews`
/// - `GET|PATCH|DELETE /titles/{title_id}/reviews/{review_id}`
/// - `GET|POST         /titles/{title_id}/reviews/{review_id}/comments`
/// - `GET|PATCH|DELETE /titles/{title_id}/reviews/{review_id}/comments/{comment_id}`
pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route("/users/me", get(me_handler).patch(update_me_handler))
        .route(
            "/users/{username}",
            get(get_user_handler)
                .patch(update_user_handler)
                .delete(delete_user_handler),
        )
        .route(
            "/categories",
            get(list_categories_handler).post(create_category_handler),
        )
        .route("/categories/{slug}", delete(delete_category_handler))
        .route(
            "/genres",
            get(list_genres_handler).post(create_genre_handler),
        )
        .route("/genres/{slug}", delete(delete_genre_handler))
        .route(
            "/titles",
            get(list_titles_handler).post(create_title_handler),
        )
        .route(
            "/titles/{title_id}",
            get(get_title_handler)
                .patch(update_title_handler)
                .delete(delete_title_handler),
        )
        .route(
            "/titles/{title_id}/reviews",
            get(list_reviews_handler).post(create_review_handler),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}",
            get(get_review_handler)
                .patch(update_review_handler)
                .delete(delete_review_handler),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            get(list_comments_handler).post(create_comment_handler),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(get_comment_handler)
                .patch(update_comment_handler)
                .delete(delete_comment_handler),
        )
}

/// Every `/api/v1` endpoint without rate limiting.
pub fn api_routes() -> Router<AppState> {
    auth_routes().merge(resource_routes())
}
