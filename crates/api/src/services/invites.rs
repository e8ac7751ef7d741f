//! Testimonial invite creation and bulk email dispatch.

use chrono::Utc;
use coffer_core::invite::{self, BulkSendReport, INVITE_EMAIL_SUBJECT};
use coffer_core::types::DbId;
use coffer_db::models::invite::{CreateTestimonialInvite, NewTestimonialInvite, TestimonialInvite};
use coffer_db::repositories::InviteRepo;
use coffer_mail::{Mailer, OutboundEmail};
use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::error::AppResult;

/// Create an invite with a fresh token. No email is sent.
///
/// `expires_at` defaults to `now + INVITE_EXPIRY_DAYS`.
pub async fn create_invite(
    pool: &PgPool,
    config: &ServerConfig,
    input: &CreateTestimonialInvite,
) -> AppResult<TestimonialInvite> {
    let email = input.email.trim();
    invite::validate_email(email)?;

    let new = NewTestimonialInvite {
        email: email.to_string(),
        token: invite::generate_token(),
        expires_at: input
            .expires_at
            .unwrap_or_else(|| invite::default_expiry(Utc::now(), config.invite_expiry_days)),
    };

    let created = InviteRepo::create(pool, &new).await?;
    tracing::info!(invite_id = created.id, "Testimonial invite created");
    Ok(created)
}

/// Email each selected invite that is still open.
///
/// Used or expired invites are skipped. A failed send or a failed `sent_at`
/// stamp is recorded in the report and processing moves on to the next
/// invite. IDs that match no invite are ignored.
pub async fn send_invites(
    pool: &PgPool,
    mailer: &dyn Mailer,
    config: &ServerConfig,
    ids: &[DbId],
) -> AppResult<BulkSendReport> {
    let invites = InviteRepo::list_by_ids(pool, ids).await?;
    let mut report = BulkSendReport::default();

    for item in &invites {
        let now = Utc::now();
        if !item.state(now).is_open() {
            report.record_skipped();
            continue;
        }

        let url = invite::redemption_url(&config.site_url, item.token);
        let email = OutboundEmail::new(
            INVITE_EMAIL_SUBJECT,
            invite::invite_email_body(&url, item.expires_at, now),
            config.default_from_email.as_str(),
            item.email.as_str(),
        );

        if let Err(err) = mailer.send(&email).await {
            tracing::warn!(invite_id = item.id, error = %err, "Invite email failed");
            report.record_failure(format!("{}: {err}", item.email));
            continue;
        }

        match InviteRepo::mark_sent(pool, item.id).await {
            Ok(_) => report.record_sent(),
            Err(err) => {
                tracing::warn!(invite_id = item.id, error = %err, "Failed to record invite send");
                report.record_failure(format!("{}: {err}", item.email));
            }
        }
    }

    tracing::info!(
        sent = report.sent,
        skipped = report.skipped,
        failed = report.failed,
        "Invite bulk send finished"
    );
    Ok(report)
}
