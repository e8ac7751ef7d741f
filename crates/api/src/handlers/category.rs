//! Handlers for the `/admin/categories` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use coffer_core::error::CoreError;
use coffer_core::slug::slugify;
use coffer_core::types::DbId;
use coffer_db::models::category::{CreateProjectCategory, ProjectCategory, UpdateProjectCategory};
use coffer_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Use the given slug, or derive one from `name` when it is blank.
fn resolve_slug(name: &str, slug: Option<&str>) -> AppResult<String> {
    let slug = match slug.map(str::trim) {
        Some(s) if !s.is_empty() => slugify(s),
        _ => slugify(name),
    };
    if slug.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Category slug must contain at least one letter or digit".into(),
        )));
    }
    Ok(slug)
}

fn require_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Category name is required".into(),
        )));
    }
    Ok(name)
}

/// GET /api/v1/admin/categories
pub async fn list(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProjectCategory>>> {
    Ok(Json(CategoryRepo::list(&state.pool).await?))
}

/// POST /api/v1/admin/categories
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProjectCategory>,
) -> AppResult<(StatusCode, Json<ProjectCategory>)> {
    let name = require_name(&input.name)?;
    let slug = resolve_slug(name, input.slug.as_deref())?;
    let category = CategoryRepo::create(&state.pool, name, &slug).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/v1/admin/categories/{id}
///
/// A blank `slug` re-derives the slug from the (new or current) name.
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectCategory>,
) -> AppResult<Json<ProjectCategory>> {
    let current = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("ProjectCategory", id))?;

    let name = match input.name.as_deref() {
        Some(name) => Some(require_name(name)?),
        None => None,
    };
    let slug = match input.slug.as_deref() {
        Some(slug) => Some(resolve_slug(name.unwrap_or(&current.name), Some(slug))?),
        None => None,
    };

    let category = CategoryRepo::update(&state.pool, id, name, slug.as_deref())
        .await?
        .ok_or(AppError::not_found("ProjectCategory", id))?;
    Ok(Json(category))
}

/// DELETE /api/v1/admin/categories/{id}
pub async fn delete(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CategoryRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("ProjectCategory", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn slug_derived_from_name_when_blank() {
        assert_eq!(resolve_slug("Living Room", None).unwrap(), "living-room");
        assert_eq!(resolve_slug("Living Room", Some("  ")).unwrap(), "living-room");
        assert_eq!(resolve_slug("Living Room", Some("Lounge")).unwrap(), "lounge");
    }

    #[test]
    fn slug_without_alphanumerics_rejected() {
        assert_matches!(
            resolve_slug("!!!", None),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }
}
