//! Field group shared by reviews and comments.

use chrono::{DateTime, Utc};

/// Text written by a user at a point in time.
#[derive(Debug, Clone)]
pub struct Authored {
    pub text: String,
    pub author_id: i64,
    /// Username of the author, resolved at read time.
    pub author: String,
    pub pub_date: DateTime<Utc>,
}

/// Anything owned by a single author.
pub trait Owned {
    fn author_id(&self) -> i64;
}
