//! Testimonial invite lifecycle rules.
//!
//! An invite is a single-use link that lets an external person submit a
//! testimonial. The token is a random UUID (v4) and doubles as the public
//! identifier in the redemption URL. Expiry is derived on read from
//! `expires_at`; it is never stored as a separate state.

use chrono::Duration;
use serde::Serialize;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Days an invite stays redeemable when no explicit expiry is given.
pub const DEFAULT_EXPIRY_DAYS: i64 = 10;

/// Maximum number of individual failure reasons kept in a [`BulkSendReport`].
pub const MAX_REPORTED_FAILURES: usize = 5;

/// Subject line of the invite email.
pub const INVITE_EMAIL_SUBJECT: &str = "Share your experience with Precious Coffer";

// ---------------------------------------------------------------------------
// Token & expiry
// ---------------------------------------------------------------------------

/// Allocate a new unguessable invite token.
pub fn generate_token() -> Uuid {
    Uuid::new_v4()
}

/// Expiry timestamp for an invite created at `created_at`.
pub fn default_expiry(created_at: Timestamp, days: i64) -> Timestamp {
    created_at + Duration::days(days)
}

/// An invite is expired once `now` reaches `expires_at`.
pub fn is_expired(expires_at: Timestamp, now: Timestamp) -> bool {
    now >= expires_at
}

/// Parse the token segment of a redemption URL.
///
/// Anything that is not a UUID is treated as an unknown invite.
pub fn parse_token(raw: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(raw.trim()).map_err(|_| CoreError::NotFoundByKey {
        entity: "TestimonialInvite",
        key: raw.to_string(),
    })
}

/// Validate the recipient address of a new invite.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.trim().validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )))
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Where an invite sits in its lifecycle at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteState {
    /// Created, not yet emailed, still redeemable.
    Created,
    /// Emailed at least once, still redeemable.
    Sent,
    /// A testimonial was accepted through this invite.
    Redeemed,
    /// Past `expires_at` without being redeemed.
    Expired,
}

impl InviteState {
    pub fn derive(
        is_used: bool,
        sent_at: Option<Timestamp>,
        expires_at: Timestamp,
        now: Timestamp,
    ) -> Self {
        if is_used {
            InviteState::Redeemed
        } else if is_expired(expires_at, now) {
            InviteState::Expired
        } else if sent_at.is_some() {
            InviteState::Sent
        } else {
            InviteState::Created
        }
    }

    /// Only unused, unexpired invites accept a submission or an email.
    pub fn is_open(self) -> bool {
        matches!(self, InviteState::Created | InviteState::Sent)
    }
}

// ---------------------------------------------------------------------------
// Redemption URL & email
// ---------------------------------------------------------------------------

/// Site-relative path of the public submission page for `token`.
pub fn redemption_path(token: Uuid) -> String {
    format!("/testimonial/submit/{token}/")
}

/// Absolute redemption URL under `site_url`.
pub fn redemption_url(site_url: &str, token: Uuid) -> String {
    format!("{}{}", site_url.trim_end_matches('/'), redemption_path(token))
}

/// Human-readable validity window, e.g. `"10 days (until 28 Oct 2026 14:00 UTC)"`.
pub fn expiry_window(expires_at: Timestamp, now: Timestamp) -> String {
    let remaining = expires_at - now;
    let until = expires_at.format("%-d %b %Y %H:%M UTC");

    let span = if remaining.num_days() >= 1 {
        plural(remaining.num_days(), "day")
    } else if remaining.num_hours() >= 1 {
        plural(remaining.num_hours(), "hour")
    } else {
        plural(remaining.num_minutes().max(1), "minute")
    };

    format!("{span} (until {until})")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Plain-text body of the invite email.
pub fn invite_email_body(url: &str, expires_at: Timestamp, now: Timestamp) -> String {
    format!(
        "Hello,\n\n\
         Thank you for choosing Precious Coffer. We would love to hear about your experience.\n\n\
         Please share a short testimonial using the link below:\n\
         {url}\n\n\
         This link can be used once and is valid for {}.\n\n\
         Regards,\n\
         Precious Coffer Team",
        expiry_window(expires_at, now)
    )
}

// ---------------------------------------------------------------------------
// Bulk send report
// ---------------------------------------------------------------------------

/// Aggregate outcome of a bulk "send invite email" action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkSendReport {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Up to [`MAX_REPORTED_FAILURES`] reasons, in processing order.
    pub failures: Vec<String>,
}

impl BulkSendReport {
    pub fn record_sent(&mut self) {
        self.sent += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_failure(&mut self, reason: impl Into<String>) {
        self.failed += 1;
        if self.failures.len() < MAX_REPORTED_FAILURES {
            self.failures.push(reason.into());
        }
    }

    /// One-line summary suitable for an admin banner.
    pub fn summary(&self) -> String {
        let mut msg = format!(
            "Sent {}, skipped {} (used or expired)",
            self.sent, self.skipped
        );
        if self.failed > 0 {
            msg.push_str(&format!(", failed {}", self.failed));
        }
        msg
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
