//! Handlers for the `/admin/testimonial-invites` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use coffer_core::invite::{self, BulkSendReport, InviteState};
use coffer_core::types::{DbId, Timestamp};
use coffer_db::models::invite::{CreateTestimonialInvite, TestimonialInvite};
use coffer_db::repositories::InviteRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::services::invites;
use crate::state::AppState;

/// An invite with its derived lifecycle fields.
#[derive(Debug, Serialize)]
pub struct InviteView {
    #[serde(flatten)]
    pub invite: TestimonialInvite,
    pub is_expired: bool,
    pub state: InviteState,
    pub redemption_url: String,
}

impl InviteView {
    fn new(invite: TestimonialInvite, site_url: &str, now: Timestamp) -> Self {
        Self {
            is_expired: invite.is_expired(now),
            state: invite.state(now),
            redemption_url: invite::redemption_url(site_url, invite.token),
            invite,
        }
    }
}

/// Request body for the bulk send action.
#[derive(Debug, Deserialize)]
pub struct SendInvitesRequest {
    pub ids: Vec<DbId>,
}

/// Bulk send outcome with a one-line summary for the admin banner.
#[derive(Debug, Serialize)]
pub struct SendInvitesResponse {
    #[serde(flatten)]
    pub report: BulkSendReport,
    pub message: String,
}

/// GET /api/v1/admin/testimonial-invites
pub async fn list(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InviteView>>> {
    let now = Utc::now();
    let invites = InviteRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|i| InviteView::new(i, &state.config.site_url, now))
        .collect();
    Ok(Json(invites))
}

/// POST /api/v1/admin/testimonial-invites
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTestimonialInvite>,
) -> AppResult<(StatusCode, Json<InviteView>)> {
    let created = invites::create_invite(&state.pool, &state.config, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(InviteView::new(created, &state.config.site_url, Utc::now())),
    ))
}

/// DELETE /api/v1/admin/testimonial-invites/{id}
pub async fn delete(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if InviteRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("TestimonialInvite", id))
    }
}

/// POST /api/v1/admin/testimonial-invites/send
///
/// Email every selected invite that is still open. Always 200; individual
/// failures are reported in the body.
pub async fn send(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<SendInvitesRequest>,
) -> AppResult<Json<SendInvitesResponse>> {
    let report =
        invites::send_invites(&state.pool, state.mailer.as_ref(), &state.config, &input.ids)
            .await?;
    Ok(Json(SendInvitesResponse {
        message: report.summary(),
        report,
    }))
}
