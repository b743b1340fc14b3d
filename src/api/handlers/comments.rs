//! Handlers for comments under a review.
//!
//! The review in the path must belong to the title in the path; otherwise
//! every endpoint answers `404 Not Found`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::pagination::{Paginated, PaginationParams};
use crate::api::dto::review::{CommentResponse, CreateCommentRequest, UpdateCommentRequest};
use crate::api::extract::{QueryParams, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/v1/titles/{title_id}/reviews/{review_id}/comments`
pub async fn list_comments_handler(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i64, i64)>,
    QueryParams(params): QueryParams<PaginationParams>,
) -> Result<Json<Paginated<CommentResponse>>, AppError> {
    let page = params.to_page()?;

    let (comments, total) = state
        .comment_service
        .list(title_id, review_id, page)
        .await?;

    Ok(Json(
        Paginated::new(comments, total, &params).map(CommentResponse::from),
    ))
}

/// `GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}`
pub async fn get_comment_handler(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
) -> Result<Json<CommentResponse>, AppError> {
    let comment = state
        .comment_service
        .get(title_id, review_id, comment_id)
        .await?;

    Ok(Json(comment.into()))
}

/// Comments on a review as the caller.
///
/// # Endpoint
///
/// `POST /api/v1/titles/{title_id}/reviews/{review_id}/comments`
///
/// # Response Codes
///
/// - **201 Created**
/// - **401 Unauthorized**: Anonymous caller
/// - **404 Not Found**: Unknown review, or review of another title
pub async fn create_comment_handler(
    State(state): State<AppState>,
    CurrentUser(author): CurrentUser,
    Path((title_id, review_id)): Path<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    let comment = state
        .comment_service
        .create(title_id, review_id, &author, payload.text)
        .await?;

    tracing::info!(review_id, comment_id = comment.id, user_id = author.id, "Comment created");

    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// Edits a comment's text. Allowed for its author, moderators and admins.
///
/// # Endpoint
///
/// `PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}`
pub async fn update_comment_handler(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
    ValidatedJson(payload): ValidatedJson<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    let text = match payload.text {
        Some(text) => text,
        None => {
            state
                .comment_service
                .get(title_id, review_id, comment_id)
                .await?
                .body
                .text
        }
    };

    let comment = state
        .comment_service
        .update(&actor, title_id, review_id, comment_id, text)
        .await?;

    Ok(Json(comment.into()))
}

/// `DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}`
pub async fn delete_comment_handler(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
) -> Result<StatusCode, AppError> {
    state
        .comment_service
        .delete(&actor, title_id, review_id, comment_id)
        .await?;

    tracing::info!(review_id, comment_id, user_id = actor.id, "Comment deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::routes::api_routes;
    use crate::domain::entities::{Authored, Comment, Review, Role};
    use crate::state::testing::{Mocks, sign_in, user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::Utc;
    use serde_json::{Value, json};

    fn server(mocks: Mocks) -> TestServer {
        TestServer::new(api_routes().with_state(mocks.into_state())).unwrap()
    }

    fn authored(author_id: i64, text: &str) -> Authored {
        Authored {
            text: text.to_string(),
            author_id,
            author: format!("user{author_id}"),
            pub_date: Utc::now(),
        }
    }

    fn review(id: i64, title_id: i64) -> Review {
        Review {
            id,
            title_id,
            score: 7,
            body: authored(1, "Review"),
        }
    }

    fn comment(id: i64, review_id: i64, author_id: i64) -> Comment {
        Comment {
            id,
            review_id,
            body: authored(author_id, "Agreed"),
        }
    }

    #[tokio::test]
    async fn test_review_of_another_title_is_not_found() {
        let mut mocks = Mocks::default();
        mocks.reviews.expect_find().returning(|_, _| Ok(None));

        server(mocks)
            .get("/titles/1/reviews/50/comments")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_list_comments() {
        let mut mocks = Mocks::default();
        mocks
            .reviews
            .expect_find()
            .returning(|title_id, review_id| Ok(Some(review(review_id, title_id))));
        mocks
            .comments
            .expect_list()
            .returning(|review_id, _| Ok(vec![comment(1, review_id, 3)]));
        mocks.comments.expect_count().returning(|_| Ok(1));

        let response = server(mocks).get("/titles/1/reviews/2/comments").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["results"][0]["text"], "Agreed");
        assert_eq!(body["results"][0]["author"], "user3");
    }

    #[tokio::test]
    async fn test_create_comment() {
        let mut mocks = Mocks::default();
        let tokens = sign_in(&mut mocks.users, vec![user(3, "reader", Role::User)]);
        mocks
            .reviews
            .expect_find()
            .returning(|title_id, review_id| Ok(Some(review(review_id, title_id))));
        mocks
            .comments
            .expect_create()
            .withf(|c| c.review_id == 2 && c.author_id == 3 && c.text == "Agreed")
            .returning(|c| Ok(comment(9, c.review_id, c.author_id)));

        let response = server(mocks)
            .post("/titles/1/reviews/2/comments")
            .add_header("Authorization", tokens[0].as_str())
            .json(&json!({ "text": "Agreed" }))
            .await;

        response.assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_empty_comment_rejected() {
        let mut mocks = Mocks::default();
        let tokens = sign_in(&mut mocks.users, vec![user(3, "reader", Role::User)]);

        server(mocks)
            .post("/titles/1/reviews/2/comments")
            .add_header("Authorization", tokens[0].as_str())
            .json(&json!({ "text": "" }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_stranger_cannot_delete_but_admin_can() {
        let mut mocks = Mocks::default();
        let tokens = sign_in(
            &mut mocks.users,
            vec![user(4, "stranger", Role::User), user(5, "boss", Role::Admin)],
        );
        mocks
            .reviews
            .expect_find()
            .returning(|title_id, review_id| Ok(Some(review(review_id, title_id))));
        mocks
            .comments
            .expect_find()
            .returning(|review_id, comment_id| Ok(Some(comment(comment_id, review_id, 3))));
        mocks
            .comments
            .expect_delete()
            .times(1)
            .returning(|_| Ok(()));
        let server = server(mocks);

        server
            .delete("/titles/1/reviews/2/comments/7")
            .add_header("Authorization", tokens[0].as_str())
            .await
            .assert_status_forbidden();

        server
            .delete("/titles/1/reviews/2/comments/7")
            .add_header("Authorization", tokens[1].as_str())
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }
}
