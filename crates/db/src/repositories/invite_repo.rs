//! Repository for the `testimonial_invites` table.

use coffer_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::invite::{NewTestimonialInvite, TestimonialInvite};
use crate::models::testimonial::{CreateTestimonial, Testimonial};
use crate::repositories::TestimonialRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, email, token, expires_at, is_used, used_at, sent_at, created_at, updated_at";

/// Provides invite persistence and the single-use redemption transaction.
pub struct InviteRepo;

impl InviteRepo {
    pub async fn create(
        pool: &PgPool,
        input: &NewTestimonialInvite,
    ) -> Result<TestimonialInvite, sqlx::Error> {
        let query = format!(
            "INSERT INTO testimonial_invites (email, token, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TestimonialInvite>(&query)
            .bind(&input.email)
            .bind(input.token)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TestimonialInvite>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM testimonial_invites WHERE id = $1");
        sqlx::query_as::<_, TestimonialInvite>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_token(
        pool: &PgPool,
        token: Uuid,
    ) -> Result<Option<TestimonialInvite>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM testimonial_invites WHERE token = $1");
        sqlx::query_as::<_, TestimonialInvite>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// All invites, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<TestimonialInvite>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM testimonial_invites ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, TestimonialInvite>(&query)
            .fetch_all(pool)
            .await
    }

    /// The invites with the given IDs, in ID order. Unknown IDs are ignored.
    pub async fn list_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<TestimonialInvite>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM testimonial_invites WHERE id = ANY($1) ORDER BY id"
        );
        sqlx::query_as::<_, TestimonialInvite>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Stamp `sent_at` after a successful email send.
    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE testimonial_invites SET sent_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM testimonial_invites WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Redeem an invite: claim it and record the testimonial in one transaction.
    ///
    /// The claim is a conditional update on `NOT is_used AND expires_at > NOW()`,
    /// so concurrent redemptions of one token serialize on the row lock and at
    /// most one of them inserts a testimonial. Returns `None` when the invite
    /// is unknown, already used, or expired.
    pub async fn redeem(
        pool: &PgPool,
        token: Uuid,
        input: &CreateTestimonial,
    ) -> Result<Option<Testimonial>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let claimed = sqlx::query_scalar::<_, DbId>(
            "UPDATE testimonial_invites SET is_used = TRUE, used_at = NOW()
             WHERE token = $1 AND NOT is_used AND expires_at > NOW()
             RETURNING id",
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(invite_id) = claimed else {
            tx.rollback().await?;
            return Ok(None);
        };

        let testimonial = TestimonialRepo::create(&mut *tx, input).await?;
        tx.commit().await?;

        tracing::info!(invite_id, testimonial_id = testimonial.id, "Invite redeemed");
        Ok(Some(testimonial))
    }
}
