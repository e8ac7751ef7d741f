//! Development mailer that writes messages to the log.

use async_trait::async_trait;

use crate::{EmailError, Mailer, OutboundEmail};

/// Logs every message at info level and reports success.
#[derive(Debug, Default, Clone)]
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError> {
        if email.to.is_empty() {
            return Err(EmailError::NoRecipients);
        }
        tracing::info!(
            from = %email.from,
            to = ?email.to,
            subject = %email.subject,
            body = %email.body,
            "Email (console backend)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn console_mailer_accepts_message() {
        let email = OutboundEmail::new("s", "b", "from@example.com", "to@example.com");
        assert!(ConsoleMailer.send(&email).await.is_ok());
    }

    #[tokio::test]
    async fn console_mailer_rejects_no_recipients() {
        let mut email = OutboundEmail::new("s", "b", "from@example.com", "to@example.com");
        email.to.clear();
        assert!(matches!(
            ConsoleMailer.send(&email).await,
            Err(EmailError::NoRecipients)
        ));
    }
}
