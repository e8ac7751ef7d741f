//! Repository for the singleton `site_social_links` row.

use sqlx::PgPool;

use crate::models::social_links::{SiteSocialLinks, UpsertSiteSocialLinks};

const COLUMNS: &str =
    "id, instagram_url, linkedin_url, facebook_url, twitter_url, created_at, updated_at";

pub struct SocialLinksRepo;

impl SocialLinksRepo {
    /// The configured links, if the row has been created.
    pub async fn get(pool: &PgPool) -> Result<Option<SiteSocialLinks>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_social_links LIMIT 1");
        sqlx::query_as::<_, SiteSocialLinks>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Create the singleton row.
    ///
    /// A second call violates `uq_site_social_links_singleton` (409 at the API).
    pub async fn create(
        pool: &PgPool,
        input: &UpsertSiteSocialLinks,
    ) -> Result<SiteSocialLinks, sqlx::Error> {
        let query = format!(
            "INSERT INTO site_social_links (instagram_url, linkedin_url, facebook_url, twitter_url)
             VALUES (COALESCE($1, ''), COALESCE($2, ''), COALESCE($3, ''), COALESCE($4, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteSocialLinks>(&query)
            .bind(&input.instagram_url)
            .bind(&input.linkedin_url)
            .bind(&input.facebook_url)
            .bind(&input.twitter_url)
            .fetch_one(pool)
            .await
    }

    /// Update the singleton row. Returns `None` if it has not been created yet.
    pub async fn update(
        pool: &PgPool,
        input: &UpsertSiteSocialLinks,
    ) -> Result<Option<SiteSocialLinks>, sqlx::Error> {
        let query = format!(
            "UPDATE site_social_links SET
                instagram_url = COALESCE($1, instagram_url),
                linkedin_url = COALESCE($2, linkedin_url),
                facebook_url = COALESCE($3, facebook_url),
                twitter_url = COALESCE($4, twitter_url)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteSocialLinks>(&query)
            .bind(&input.instagram_url)
            .bind(&input.linkedin_url)
            .bind(&input.facebook_url)
            .bind(&input.twitter_url)
            .fetch_optional(pool)
            .await
    }
}
