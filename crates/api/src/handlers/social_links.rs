//! Handlers for the `/admin/social-links` singleton.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use coffer_core::error::CoreError;
use coffer_db::models::social_links::{SiteSocialLinks, UpsertSiteSocialLinks};
use coffer_db::repositories::SocialLinksRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

fn not_configured() -> AppError {
    AppError::Core(CoreError::NotFoundByKey {
        entity: "SiteSocialLinks",
        key: "singleton".into(),
    })
}

/// GET /api/v1/admin/social-links
pub async fn get(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<SiteSocialLinks>> {
    let links = SocialLinksRepo::get(&state.pool)
        .await?
        .ok_or_else(not_configured)?;
    Ok(Json(links))
}

/// POST /api/v1/admin/social-links
///
/// Only one row may exist; a second create is a 409.
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpsertSiteSocialLinks>,
) -> AppResult<(StatusCode, Json<SiteSocialLinks>)> {
    let links = SocialLinksRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(links)))
}

/// PUT /api/v1/admin/social-links
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpsertSiteSocialLinks>,
) -> AppResult<Json<SiteSocialLinks>> {
    let links = SocialLinksRepo::update(&state.pool, &input)
        .await?
        .ok_or_else(not_configured)?;
    Ok(Json(links))
}
