//! Site-wide social profile links (singleton row).

use coffer_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single row of `site_social_links`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteSocialLinks {
    pub id: DbId,
    pub instagram_url: String,
    pub linkedin_url: String,
    pub facebook_url: String,
    pub twitter_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or updating the links. Omitted fields are left blank
/// on create and unchanged on update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertSiteSocialLinks {
    pub instagram_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub facebook_url: Option<String>,
    pub twitter_url: Option<String>,
}
