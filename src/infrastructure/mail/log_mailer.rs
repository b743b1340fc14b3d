//! Console mail channel.

use async_trait::async_trait;

use super::{Mailer, OutgoingMail};
use crate::error::AppError;

/// Writes every message to the `mail` tracing target instead of sending it.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), AppError> {
        tracing::info!(
            target: "mail",
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            body = %mail.body,
            "Mail delivered to console"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_never_fails() {
        let mail = OutgoingMail::confirmation_code("a@b.c", "d@e.f", "user", "123456");
        assert!(LogMailer::new().send(mail).await.is_ok());
    }
}
