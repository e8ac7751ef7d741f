//! Handlers for project gallery images.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use coffer_core::error::CoreError;
use coffer_core::imaging::ImageSlot;
use coffer_core::types::DbId;
use coffer_db::models::project_image::{CreateProjectImage, ProjectImage, UpdateProjectImage};
use coffer_db::repositories::{ProjectImageRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::forms::FormData;
use crate::hooks;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/v1/admin/projects/{id}/images
pub async fn list_by_project(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<ProjectImage>>> {
    if ProjectRepo::find_by_id(&state.pool, project_id).await?.is_none() {
        return Err(AppError::not_found("Project", project_id));
    }
    Ok(Json(
        ProjectImageRepo::list_by_project(&state.pool, project_id).await?,
    ))
}

/// POST /api/v1/admin/projects/{id}/images
///
/// Multipart fields: `image` (file, required), `category_id`, `sort_order`.
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ProjectImage>)> {
    let mut form = FormData::collect(multipart).await?;

    if ProjectRepo::find_by_id(&state.pool, project_id).await?.is_none() {
        return Err(AppError::not_found("Project", project_id));
    }

    let file = form
        .take_file(ImageSlot::Gallery.field_name())
        .ok_or_else(|| AppError::Core(CoreError::Validation("image is required".into())))?;
    let category_id = form.parse("category_id")?;
    let sort_order = form.parse("sort_order")?;

    let image = state
        .media
        .save_image(ImageSlot::Gallery.upload_dir(), &file.file_name, &file.data)
        .await?;

    let input = CreateProjectImage {
        project_id,
        image,
        category_id,
        sort_order,
    };
    let created = match ProjectImageRepo::create(&state.pool, &input).await {
        Ok(created) => created,
        Err(err) => {
            state.media.discard(&[input.image.as_str()]).await;
            return Err(err.into());
        }
    };
    tracing::info!(project_id, image_id = created.id, "Gallery image added");

    hooks::after_gallery_image_save(&state.media, &created).await;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/admin/project-images/{id}
///
/// A blank `category_id` clears the category.
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<ProjectImage>> {
    let mut form = FormData::collect(multipart).await?;

    if ProjectImageRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::not_found("ProjectImage", id));
    }

    let mut input = UpdateProjectImage {
        category_id: form.parse("category_id")?,
        clear_category: form.text("category_id").map(str::trim) == Some(""),
        sort_order: form.parse("sort_order")?,
        ..Default::default()
    };

    if let Some(file) = form.take_file(ImageSlot::Gallery.field_name()) {
        input.image = Some(
            state
                .media
                .save_image(ImageSlot::Gallery.upload_dir(), &file.file_name, &file.data)
                .await?,
        );
    }

    let updated = match ProjectImageRepo::update(&state.pool, id, &input).await {
        Ok(Some(updated)) => updated,
        result => {
            if let Some(image) = &input.image {
                state.media.discard(&[image.as_str()]).await;
            }
            return Err(match result {
                Err(err) => err.into(),
                _ => AppError::not_found("ProjectImage", id),
            });
        }
    };

    hooks::after_gallery_image_save(&state.media, &updated).await;

    Ok(Json(updated))
}

/// DELETE /api/v1/admin/project-images/{id}
pub async fn delete(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProjectImageRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("ProjectImage", id))
    }
}
