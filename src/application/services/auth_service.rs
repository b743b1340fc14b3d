//! Passwordless registration and access token service.
//!
//! Signup stores an HMAC-SHA256 hash of a one-time numeric code and mails the
//! plaintext to the user. Exchanging the code yields an HS256 JWT whose `sub`
//! is the user id. A code can be exchanged once; every signup replaces it.

use hmac::{Hmac, Mac};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::domain::validators::validate_name;
use crate::error::{AppError, field_error};
use crate::infrastructure::mail::{Mailer, OutgoingMail};
use crate::utils::code_generator::{generate_confirmation_code, looks_like_code};

type HmacSha256 = Hmac<Sha256>;

/// JWT claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Secrets and lifetimes used by [`AuthService`].
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub access_ttl_minutes: i64,
    /// HMAC key for stored confirmation codes.
    pub code_secret: String,
    /// Sender address of confirmation mail.
    pub from_email: String,
}

pub struct AuthService<R: UserRepository + ?Sized, M: Mailer + ?Sized> {
    users: Arc<R>,
    mailer: Arc<M>,
    settings: AuthSettings,
}

impl<R: UserRepository + ?Sized, M: Mailer + ?Sized> AuthService<R, M> {
    pub fn new(users: Arc<R>, mailer: Arc<M>, settings: AuthSettings) -> Self {
        Self {
            users,
            mailer,
            settings,
        }
    }

    /// Registers (or re-registers) a user and mails a fresh confirmation code.
    ///
    /// Repeating a signup with the same username and email reuses the
    /// existing account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the username is invalid.
    /// Returns [`AppError::Conflict`] if the username or the email already
    /// belongs to a different account.
    pub async fn signup(&self, username: &str, email: &str) -> Result<User, AppError> {
        validate_name(username).map_err(|e| field_error("username", e))?;

        let user = self.get_or_create(username, email).await?;

        let code = generate_confirmation_code();
        self.users
            .set_confirmation_code(user.id, Some(self.hash_code(&code)))
            .await?;

        let mail = OutgoingMail::confirmation_code(
            &self.settings.from_email,
            &user.email,
            &user.username,
            &code,
        );
        self.mailer.send(mail).await?;

        tracing::info!(user_id = user.id, username = %user.username, "Confirmation code issued");

        Ok(user)
    }

    /// Exchanges a confirmation code for an access token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown username.
    /// Returns [`AppError::Validation`] if the code does not match the
    /// outstanding one, or none is outstanding.
    pub async fn exchange_code(&self, username: &str, code: &str) -> Result<String, AppError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "username": username })))?;

        let matches = user
            .confirmation_code
            .as_deref()
            .is_some_and(|stored| self.code_matches(code, stored));

        if !matches {
            tracing::warn!(user_id = user.id, "Confirmation code mismatch");
            return Err(AppError::invalid_field(
                "confirmation_code",
                "Invalid confirmation code",
            ));
        }

        self.users.set_confirmation_code(user.id, None).await?;

        tracing::info!(user_id = user.id, "Access token issued");

        self.issue_token(&user)
    }

    /// Resolves a bearer token to its user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is malformed, expired,
    /// signed with another key, or its user no longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let claims = self.decode_token(token)?;

        self.users.find_by_id(claims.sub).await?.ok_or_else(|| {
            AppError::unauthorized("Invalid token", json!({ "reason": "User not found" }))
        })
    }

    /// Signs an access token for the user.
    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            role: user.role.to_string(),
            exp: now + self.settings.access_ttl_minutes * 60,
            iat: now,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.jwt_secret.as_bytes()),
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign access token");
            AppError::internal("Failed to issue token", json!({}))
        })
    }

    /// Validates signature and expiry of an access token.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::unauthorized("Invalid token", json!({ "reason": e.to_string() })))
    }

    async fn get_or_create(&self, username: &str, email: &str) -> Result<User, AppError> {
        let (by_username, by_email) = tokio::try_join!(
            self.users.find_by_username(username),
            self.users.find_by_email(email)
        )?;

        match (by_username, by_email) {
            (Some(a), Some(b)) if a.id == b.id => Ok(a),
            (None, None) => {
                self.users
                    .create(NewUser {
                        username: username.to_string(),
                        email: email.to_string(),
                        ..NewUser::default()
                    })
                    .await
            }
            (Some(_), _) => Err(AppError::conflict(
                "Username is registered with another email",
                json!({ "username": ["A user with this username is registered with another email"] }),
            )),
            (None, Some(_)) => Err(AppError::conflict(
                "Email is registered with another username",
                json!({ "email": ["A user with this email is registered with another username"] }),
            )),
        }
    }

    /// Hashes a confirmation code with HMAC-SHA256.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    fn hash_code(&self, code: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.settings.code_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(code.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Constant-time comparison of a submitted code against a stored hash.
    fn code_matches(&self, code: &str, stored_hash: &str) -> bool {
        if !looks_like_code(code) {
            return false;
        }

        let Ok(expected) = hex::decode(stored_hash) else {
            return false;
        };

        let mut mac = HmacSha256::new_from_slice(self.settings.code_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(code.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}
