//! Testimonial invite model and DTOs.

use coffer_core::invite::{self, InviteState};
use coffer_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `testimonial_invites` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TestimonialInvite {
    pub id: DbId,
    pub email: String,
    pub token: Uuid,
    pub expires_at: Timestamp,
    pub is_used: bool,
    pub used_at: Option<Timestamp>,
    pub sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TestimonialInvite {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        invite::is_expired(self.expires_at, now)
    }

    pub fn state(&self, now: Timestamp) -> InviteState {
        InviteState::derive(self.is_used, self.sent_at, self.expires_at, now)
    }
}

/// Insert payload. The token and expiry are decided by the caller.
#[derive(Debug, Clone)]
pub struct NewTestimonialInvite {
    pub email: String,
    pub token: Uuid,
    pub expires_at: Timestamp,
}

/// Admin request body for creating an invite.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTestimonialInvite {
    pub email: String,
    /// Overrides the default expiry window.
    pub expires_at: Option<Timestamp>,
}
