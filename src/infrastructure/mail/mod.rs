//! Outgoing mail for the signup flow.
//!
//! Real delivery is out of scope; [`LogMailer`] writes messages to the log the
//! way a console email backend would.

pub mod log_mailer;

pub use log_mailer::LogMailer;

use async_trait::async_trait;

use crate::error::AppError;

/// A message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    /// Builds the message carrying a signup confirmation code.
    pub fn confirmation_code(from: &str, to: &str, username: &str, code: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: "Your confirmation code".to_string(),
            body: format!(
                "Hello, {username}!\n\nYour confirmation code is {code}.\n\
                 Exchange it for an access token at /api/v1/auth/token/."
            ),
        }
    }
}

/// Delivery channel for outgoing mail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_mail_contains_code() {
        let mail = OutgoingMail::confirmation_code(
            "noreply@yamdb.local",
            "reader@example.com",
            "reader",
            "012345",
        );

        assert_eq!(mail.to, "reader@example.com");
        assert!(mail.body.contains("012345"));
        assert!(mail.body.contains("reader"));
    }
}
