//! DTOs for reviews and comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Comment, Review, ReviewPatch};

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub text: String,
    /// Author's username.
    pub author: String,
    pub score: i32,
    pub pub_date: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            text: review.body.text,
            author: review.body.author,
            score: review.score,
            pub_date: review.body.pub_date,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, message = "Review text must not be empty"))]
    pub text: String,

    #[validate(range(min = 1, max = 10, message = "Score must be between 1 and 10"))]
    pub score: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(length(min = 1, message = "Review text must not be empty"))]
    pub text: Option<String>,

    #[validate(range(min = 1, max = 10, message = "Score must be between 1 and 10"))]
    pub score: Option<i32>,
}

impl From<UpdateReviewRequest> for ReviewPatch {
    fn from(request: UpdateReviewRequest) -> Self {
        ReviewPatch {
            text: request.text,
            score: request.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub pub_date: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.body.text,
            author: comment.body.author,
            pub_date: comment.body.pub_date,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Comment text must not be empty"))]
    pub text: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, message = "Comment text must not be empty"))]
    pub text: Option<String>,
}
