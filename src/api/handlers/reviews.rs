//! Handlers for reviews of a title.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::pagination::{Paginated, PaginationParams};
use crate::api::dto::review::{CreateReviewRequest, ReviewResponse, UpdateReviewRequest};
use crate::api::extract::{QueryParams, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists a title's reviews, newest first.
///
/// # Endpoint
///
/// `GET /api/v1/titles/{title_id}/reviews`
///
/// # Response Codes
///
/// - **200 OK**: Paginated reviews
/// - **404 Not Found**: Unknown title
pub async fn list_reviews_handler(
    State(state): State<AppState>,
    Path(title_id): Path<i64>,
    QueryParams(params): QueryParams<PaginationParams>,
) -> Result<Json<Paginated<ReviewResponse>>, AppError> {
    let page = params.to_page()?;

    let (reviews, total) = state.review_service.list(title_id, page).await?;

    Ok(Json(
        Paginated::new(reviews, total, &params).map(ReviewResponse::from),
    ))
}

/// `GET /api/v1/titles/{title_id}/reviews/{review_id}`
pub async fn get_review_handler(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i64, i64)>,
) -> Result<Json<ReviewResponse>, AppError> {
    let review = state.review_service.get(title_id, review_id).await?;

    Ok(Json(review.into()))
}

/// Reviews a title as the caller.
///
/// # Endpoint
///
/// `POST /api/v1/titles/{title_id}/reviews`
///
/// # Request Body
///
/// ```json
/// { "text": "Slow, but worth it.", "score": 8 }
/// ```
///
/// # Response Codes
///
/// - **201 Created**
/// - **400 Bad Request**: Score outside 1..=10, or the caller already reviewed this title
/// - **401 Unauthorized**: Anonymous caller
/// - **404 Not Found**: Unknown title
pub async fn create_review_handler(
    State(state): State<AppState>,
    CurrentUser(author): CurrentUser,
    Path(title_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), AppError> {
    let review = state
        .review_service
        .create(title_id, &author, payload.text, payload.score)
        .await?;

    tracing::info!(title_id, review_id = review.id, user_id = author.id, "Review created");

    Ok((StatusCode::CREATED, Json(review.into())))
}

/// Edits a review. Allowed for its author, moderators and admins.
///
/// # Endpoint
///
/// `PATCH /api/v1/titles/{title_id}/reviews/{review_id}`
pub async fn update_review_handler(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path((title_id, review_id)): Path<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    let review = state
        .review_service
        .update(&actor, title_id, review_id, payload.into())
        .await?;

    Ok(Json(review.into()))
}

/// Deletes a review and its comments.
///
/// # Endpoint
///
/// `DELETE /api/v1/titles/{title_id}/reviews/{review_id}`
pub async fn delete_review_handler(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path((title_id, review_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    state
        .review_service
        .delete(&actor, title_id, review_id)
        .await?;

    tracing::info!(title_id, review_id, user_id = actor.id, "Review deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::routes::api_routes;
    use crate::domain::entities::{Authored, Review, Role};
    use crate::state::testing::{Mocks, sign_in, user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::Utc;
    use serde_json::{Value, json};

    fn server(mocks: Mocks) -> TestServer {
        TestServer::new(api_routes().with_state(mocks.into_state())).unwrap()
    }

    fn review(id: i64, title_id: i64, author_id: i64, score: i32) -> Review {
        Review {
            id,
            title_id,
            score,
            body: Authored {
                text: "Worth a watch".to_string(),
                author_id,
                author: format!("user{author_id}"),
                pub_date: Utc::now(),
            },
        }
    }

    #[tokio::test]
    async fn test_list_for_unknown_title() {
        let mut mocks = Mocks::default();
        mocks.titles.expect_exists().returning(|_| Ok(false));

        server(mocks)
            .get("/titles/9/reviews")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_list_is_public() {
        let mut mocks = Mocks::default();
        mocks.titles.expect_exists().returning(|_| Ok(true));
        mocks
            .reviews
            .expect_list()
            .returning(|title_id, _| Ok(vec![review(1, title_id, 3, 8)]));
        mocks.reviews.expect_count().returning(|_| Ok(1));

        let response = server(mocks).get("/titles/2/reviews").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["results"][0]["author"], "user3");
        assert_eq!(body["results"][0]["score"], 8);
    }

    #[tokio::test]
    async fn test_create_requires_authentication() {
        server(Mocks::default())
            .post("/titles/2/reviews")
            .json(&json!({ "text": "Great", "score": 9 }))
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_score() {
        let mut mocks = Mocks::default();
        let tokens = sign_in(&mut mocks.users, vec![user(3, "reader", Role::User)]);

        let response = server(mocks)
            .post("/titles/2/reviews")
            .add_header("Authorization", tokens[0].as_str())
            .json(&json!({ "text": "Great", "score": 11 }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert!(body["error"]["details"]["score"].is_array());
    }

    #[tokio::test]
    async fn test_second_review_by_same_author() {
        let mut mocks = Mocks::default();
        let tokens = sign_in(&mut mocks.users, vec![user(3, "reader", Role::User)]);
        mocks.titles.expect_exists().returning(|_| Ok(true));
        mocks
            .reviews
            .expect_exists_by_author()
            .withf(|title_id, author_id| *title_id == 2 && *author_id == 3)
            .returning(|_, _| Ok(true));

        let response = server(mocks)
            .post("/titles/2/reviews")
            .add_header("Authorization", tokens[0].as_str())
            .json(&json!({ "text": "Again", "score": 5 }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_create_sets_author_from_token() {
        let mut mocks = Mocks::default();
        let tokens = sign_in(&mut mocks.users, vec![user(3, "reader", Role::User)]);
        mocks.titles.expect_exists().returning(|_| Ok(true));
        mocks.reviews.expect_exists_by_author().returning(|_, _| Ok(false));
        mocks
            .reviews
            .expect_create()
            .withf(|r| r.author_id == 3 && r.title_id == 2 && r.score == 8)
            .returning(|r| Ok(review(20, r.title_id, r.author_id, r.score)));

        let response = server(mocks)
            .post("/titles/2/reviews")
            .add_header("Authorization", tokens[0].as_str())
            .json(&json!({ "text": "Worth a watch", "score": 8 }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["id"], 20);
    }

    #[tokio::test]
    async fn test_stranger_cannot_edit_but_moderator_can() {
        let mut mocks = Mocks::default();
        let tokens = sign_in(
            &mut mocks.users,
            vec![user(4, "stranger", Role::User), user(5, "moder", Role::Moderator)],
        );
        mocks.titles.expect_exists().returning(|_| Ok(true));
        mocks
            .reviews
            .expect_find()
            .returning(|title_id, review_id| Ok(Some(review(review_id, title_id, 3, 8))));
        mocks
            .reviews
            .expect_update()
            .times(1)
            .returning(|id, _| Ok(review(id, 2, 3, 6)));
        let server = server(mocks);

        server
            .patch("/titles/2/reviews/1")
            .add_header("Authorization", tokens[0].as_str())
            .json(&json!({ "score": 6 }))
            .await
            .assert_status_forbidden();

        server
            .patch("/titles/2/reviews/1")
            .add_header("Authorization", tokens[1].as_str())
            .json(&json!({ "score": 6 }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_author_deletes_own_review() {
        let mut mocks = Mocks::default();
        let tokens = sign_in(&mut mocks.users, vec![user(3, "reader", Role::User)]);
        mocks.titles.expect_exists().returning(|_| Ok(true));
        mocks
            .reviews
            .expect_find()
            .returning(|title_id, review_id| Ok(Some(review(review_id, title_id, 3, 8))));
        mocks
            .reviews
            .expect_delete()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Ok(()));

        server(mocks)
            .delete("/titles/2/reviews/1")
            .add_header("Authorization", tokens[0].as_str())
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }
}
