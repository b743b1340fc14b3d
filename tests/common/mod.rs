#![allow(dead_code)]

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::{Arc, Mutex};
use yamdb::application::services::{AuthService, AuthSettings};
use yamdb::domain::repositories::UserRepository;
use yamdb::error::AppError;
use yamdb::infrastructure::mail::{Mailer, OutgoingMail};
use yamdb::infrastructure::persistence::PgUserRepository;
use yamdb::state::{AppState, Repositories};
use yamdb::utils::code_generator::looks_like_code;

/// Keeps every message so tests can read confirmation codes.
#[derive(Default)]
pub struct CapturingMailer {
    pub sent: Mutex<Vec<OutgoingMail>>,
}

impl CapturingMailer {
    /// Code from the most recent message to `to`.
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let mail = sent.iter().rev().find(|m| m.to == to)?;
        mail.body
            .split_whitespace()
            .map(|w| w.trim_end_matches(|c: char| !c.is_ascii_digit()))
            .find(|w| looks_like_code(w))
            .map(str::to_string)
    }
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

pub fn auth_settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: "integration-test-secret".to_string(),
        access_ttl_minutes: 60,
        code_secret: "integration-test-code-secret".to_string(),
        from_email: "noreply@yamdb.local".to_string(),
    }
}

pub fn create_test_state(pool: PgPool) -> (AppState, Arc<CapturingMailer>) {
    let mailer = Arc::new(CapturingMailer::default());
    let state = AppState::new(
        Repositories::postgres(Arc::new(pool)),
        mailer.clone(),
        auth_settings(),
    );
    (state, mailer)
}

pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO users (username, email, role) VALUES ($1, $2, $3) RETURNING id")
        .bind(username)
        .bind(format!("{username}@example.com"))
        .bind(role)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_category(pool: &PgPool, slug: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING id")
        .bind(slug.to_uppercase())
        .bind(slug)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_genre(pool: &PgPool, slug: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO genres (name, slug) VALUES ($1, $2) RETURNING id")
        .bind(slug.to_uppercase())
        .bind(slug)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_title(
    pool: &PgPool,
    name: &str,
    year: i32,
    category_id: i64,
    genre_ids: &[i64],
) -> i64 {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO titles (name, year, category_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(year)
    .bind(category_id)
    .fetch_one(pool)
    .await
    .unwrap();

    for genre_id in genre_ids {
        sqlx::query("INSERT INTO genre_title (genre_id, title_id) VALUES ($1, $2)")
            .bind(genre_id)
            .bind(id)
            .execute(pool)
            .await
            .unwrap();
    }

    id
}

pub async fn create_review(pool: &PgPool, title_id: i64, author_id: i64, score: i16) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO reviews (title_id, author_id, text, score) VALUES ($1, $2, 'Review', $3) RETURNING id",
    )
    .bind(title_id)
    .bind(author_id)
    .bind(score)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

/// `Authorization` header value for an existing account.
pub async fn bearer_for(pool: &PgPool, user_id: i64) -> String {
    let users = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));
    let user = users.find_by_id(user_id).await.unwrap().unwrap();

    let auth = AuthService::new(users, Arc::new(CapturingMailer::default()), auth_settings());
    format!("Bearer {}", auth.issue_token(&user).unwrap())
}
