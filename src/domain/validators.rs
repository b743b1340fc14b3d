//! Pure field validators.
//!
//! Each function returns a [`ValidationError`] so it can be used both from
//! `#[validate(custom(function = ...))]` attributes on request DTOs and
//! directly from services.

use chrono::{Datelike, Utc};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::ValidationError;

/// Maximum username length.
pub const USERNAME_MAX_LENGTH: usize = 150;

/// Username reserved for the "current user" endpoint.
pub const RESERVED_USERNAME: &str = "me";

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.@+-]+$").expect("valid username regex"));

static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

fn invalid(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message));
    error
}

/// Checks a username: not `me`, non-empty, at most 150 characters of
/// `[A-Za-z0-9_.@+-]`.
pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    if value == RESERVED_USERNAME {
        return Err(invalid(
            "reserved_username",
            format!("Username \"{RESERVED_USERNAME}\" is reserved"),
        ));
    }

    if value.is_empty() || value.chars().count() > USERNAME_MAX_LENGTH {
        return Err(invalid(
            "username_length",
            format!("Username must be 1-{USERNAME_MAX_LENGTH} characters"),
        ));
    }

    if !USERNAME_REGEX.is_match(value) {
        return Err(invalid(
            "username_charset",
            "Username may only contain letters, digits and _ . @ + -".to_string(),
        ));
    }

    Ok(())
}

/// Rejects years later than the current calendar year.
pub fn validate_year_field(year: i32) -> Result<(), ValidationError> {
    validate_year_not_after(year, Utc::now().year())
}

fn validate_year_not_after(year: i32, current_year: i32) -> Result<(), ValidationError> {
    if year > current_year {
        return Err(invalid(
            "future_year",
            format!("Year {year} has not come yet, current year is {current_year}"),
        ));
    }
    Ok(())
}

/// Requires at least one genre.
pub fn validate_genre_field(genres: &[String]) -> Result<(), ValidationError> {
    if genres.is_empty() {
        return Err(invalid(
            "empty_genre",
            "At least one genre is required".to_string(),
        ));
    }
    Ok(())
}

/// Checks a category/genre slug.
pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    if !SLUG_REGEX.is_match(value) {
        return Err(invalid(
            "invalid_slug",
            "Slug may only contain letters, digits, hyphens and underscores".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_rejects_me() {
        let err = validate_name("me").unwrap_err();
        assert_eq!(err.code, "reserved_username");
    }

    #[test]
    fn test_validate_name_accepts_allowed_charset() {
        assert!(validate_name("valid.user-1").is_ok());
        assert!(validate_name("user@example+tag").is_ok());
        assert!(validate_name("under_score").is_ok());
        assert!(validate_name("ME").is_ok());
    }

    #[test]
    fn test_validate_name_rejects_spaces() {
        assert!(validate_name("john doe").is_err());
        assert!(validate_name(" john").is_err());
        assert!(validate_name("john ").is_err());
    }

    #[test]
    fn test_validate_name_rejects_other_characters() {
        for name in ["semi;colon", "slash/", "hash#", "quote'", "юзер"] {
            assert!(validate_name(name).is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn test_validate_name_length() {
        assert!(validate_name("").is_err());
        assert!(validate_name(&"a".repeat(USERNAME_MAX_LENGTH)).is_ok());
        assert!(validate_name(&"a".repeat(USERNAME_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_year_field_current_and_next() {
        let current = Utc::now().year();
        assert!(validate_year_field(current).is_ok());
        assert!(validate_year_field(current - 500).is_ok());
        assert!(validate_year_field(current + 1).is_err());
    }

    #[test]
    fn test_validate_year_not_after_boundary() {
        assert!(validate_year_not_after(2024, 2024).is_ok());
        let err = validate_year_not_after(2025, 2024).unwrap_err();
        assert_eq!(err.code, "future_year");
    }

    #[test]
    fn test_validate_genre_field() {
        assert!(validate_genre_field(&[]).is_err());
        assert!(validate_genre_field(&["drama".to_string()]).is_ok());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("sci-fi_2").is_ok());
        assert!(validate_slug("sci fi").is_err());
        assert!(validate_slug("").is_err());
    }
}
