//! Outbound email for the site.
//!
//! - [`Mailer`]: the collaborator the API hands a finished message to.
//! - [`SmtpMailer`]: lettre STARTTLS relay, configured by [`EmailConfig`].
//! - [`ConsoleMailer`]: logs the message instead of sending it; used when
//!   SMTP is not configured.

pub mod console;
pub mod smtp;

use async_trait::async_trait;

pub use console::ConsoleMailer;
pub use smtp::{EmailConfig, SmtpMailer};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// A message with no recipients was handed to the mailer.
    #[error("Email has no recipients")]
    NoRecipients,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A plain-text email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

impl OutboundEmail {
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            from: from.into(),
            to: vec![to.into()],
        }
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Delivers [`OutboundEmail`]s. Implementations must be shareable across
/// request handlers.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
