//! Review and comment entities.

use super::authored::{Authored, Owned};

/// Lowest accepted review score.
pub const MIN_SCORE: i32 = 1;
/// Highest accepted review score.
pub const MAX_SCORE: i32 = 10;

/// A scored review of a title. One per (author, title).
#[derive(Debug, Clone)]
pub struct Review {
    pub id: i64,
    pub title_id: i64,
    pub score: i32,
    pub body: Authored,
}

impl Owned for Review {
    fn author_id(&self) -> i64 {
        self.body.author_id
    }
}

/// Input data for creating a review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub title_id: i64,
    pub author_id: i64,
    pub text: String,
    pub score: i32,
}

/// Partial update of a review.
#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub text: Option<String>,
    pub score: Option<i32>,
}

/// A comment on a review.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i64,
    pub review_id: i64,
    pub body: Authored,
}

impl Owned for Comment {
    fn author_id(&self) -> i64 {
        self.body.author_id
    }
}

/// Input data for creating a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub review_id: i64,
    pub author_id: i64,
    pub text: String,
}
