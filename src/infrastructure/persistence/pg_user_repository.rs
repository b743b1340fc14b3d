//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::repositories::{Page, UserRepository};
use crate::error::AppError;
use crate::utils::db_error::violated_unique_constraint;
use crate::utils::like_pattern::contains_pattern;

const USER_COLUMNS: &str = "id, username, email, role, first_name, last_name, bio, \
     is_superuser, is_staff, confirmation_code, date_joined";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    role: String,
    first_name: String,
    last_name: String,
    bio: String,
    is_superuser: bool,
    is_staff: bool,
    confirmation_code: Option<String>,
    date_joined: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row.role.parse().map_err(|reason: String| {
            AppError::internal("Stored user role is invalid", json!({ "reason": reason }))
        })?;

        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            role,
            first_name: row.first_name,
            last_name: row.last_name,
            bio: row.bio,
            is_superuser: row.is_superuser,
            is_staff: row.is_staff,
            confirmation_code: row.confirmation_code,
            date_joined: row.date_joined,
        })
    }
}

/// Maps unique violations on username/email to field-keyed conflicts.
fn map_write_error(e: sqlx::Error) -> AppError {
    match violated_unique_constraint(&e) {
        Some("users_username_key") => AppError::conflict(
            "A user with this username already exists",
            json!({ "username": ["A user with this username already exists"] }),
        ),
        Some("users_email_key") => AppError::conflict(
            "A user with this email already exists",
            json!({ "email": ["A user with this email already exists"] }),
        ),
        _ => AppError::from(e),
    }
}

/// PostgreSQL repository for accounts.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(User::try_from)
            .transpose()
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            r#"
            INSERT INTO users
                (username, email, role, first_name, last_name, bio, is_superuser, is_staff)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(new_user.role.as_str())
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .bind(&new_user.bio)
            .bind(new_user.is_superuser)
            .bind(new_user.is_staff)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(map_write_error)?;

        User::try_from(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.find_one("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.find_one("email", email).await
    }

    async fn list(&self, search: Option<String>, page: Page) -> Result<Vec<User>, AppError> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::text IS NULL OR username ILIKE $1 ESCAPE '\')
            ORDER BY username
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(search.as_deref().map(contains_pattern))
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn count(&self, search: Option<String>) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE ($1::text IS NULL OR username ILIKE $1 ESCAPE '\\')",
        )
        .bind(search.as_deref().map(contains_pattern))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<User, AppError> {
        let sql = format!(
            r#"
            UPDATE users SET
                username   = COALESCE($2, username),
                email      = COALESCE($3, email),
                role       = COALESCE($4, role),
                first_name = COALESCE($5, first_name),
                last_name  = COALESCE($6, last_name),
                bio        = COALESCE($7, bio)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(patch.username)
            .bind(patch.email)
            .bind(patch.role.map(|r| r.as_str()))
            .bind(patch.first_name)
            .bind(patch.last_name)
            .bind(patch.bio)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))?;

        User::try_from(row)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User not found", json!({ "id": id })));
        }

        Ok(())
    }

    async fn set_confirmation_code(
        &self,
        id: i64,
        code_hash: Option<String>,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET confirmation_code = $2 WHERE id = $1")
            .bind(id)
            .bind(code_hash)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User not found", json!({ "id": id })));
        }

        Ok(())
    }
}
