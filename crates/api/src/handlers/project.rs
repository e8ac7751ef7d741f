//! Handlers for the `/admin/projects` resource.
//!
//! Create and update take `multipart/form-data` carrying the text fields,
//! `category_ids`, and up to four image files. Every successful write runs
//! the normalization hook on each populated image slot.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use coffer_core::error::CoreError;
use coffer_core::imaging::ImageSlot;
use coffer_core::types::DbId;
use coffer_db::models::project::{CreateProject, Project, UpdateProject};
use coffer_db::repositories::{CategoryRepo, ProjectRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::forms::{FormData, UploadedFile};
use crate::hooks;
use crate::media::{image_extension, MediaStore};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// A project with the ids of its categories.
#[derive(Debug, Serialize)]
pub struct ProjectWithCategories {
    #[serde(flatten)]
    pub project: Project,
    pub category_ids: Vec<DbId>,
}

async fn with_categories(state: &AppState, project: Project) -> AppResult<ProjectWithCategories> {
    let category_ids = CategoryRepo::list_for_projects(&state.pool, &[project.id])
        .await?
        .into_iter()
        .map(|link| link.category_id)
        .collect();
    Ok(ProjectWithCategories {
        project,
        category_ids,
    })
}

/// Uploaded files per project slot, extensions already checked.
struct SlotUploads(Vec<(ImageSlot, UploadedFile)>);

impl SlotUploads {
    fn take(form: &mut FormData) -> AppResult<Self> {
        let mut uploads = Vec::new();
        for slot in ImageSlot::PROJECT_SLOTS {
            if let Some(file) = form.take_file(slot.field_name()) {
                image_extension(&file.file_name)?;
                uploads.push((slot, file));
            }
        }
        Ok(Self(uploads))
    }

    fn has(&self, slot: ImageSlot) -> bool {
        self.0.iter().any(|(s, _)| *s == slot)
    }

    /// Write each upload to its slot directory; returns stored relative paths.
    /// A failed write removes the files already stored by this call.
    async fn store(self, media: &MediaStore) -> AppResult<Vec<(ImageSlot, String)>> {
        let mut stored = Vec::with_capacity(self.0.len());
        for (slot, file) in self.0 {
            match media
                .save_image(slot.upload_dir(), &file.file_name, &file.data)
                .await
            {
                Ok(path) => stored.push((slot, path)),
                Err(err) => {
                    media.discard(&stored_paths(&stored)).await;
                    return Err(err);
                }
            }
        }
        Ok(stored)
    }
}

fn stored_paths(stored: &[(ImageSlot, String)]) -> Vec<&str> {
    stored.iter().map(|(_, path)| path.as_str()).collect()
}

fn stored_path(stored: &[(ImageSlot, String)], slot: ImageSlot) -> Option<String> {
    stored
        .iter()
        .find(|(s, _)| *s == slot)
        .map(|(_, path)| path.clone())
}

/// GET /api/v1/admin/projects
pub async fn list(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProjectWithCategories>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();
    let links = CategoryRepo::list_for_projects(&state.pool, &ids).await?;

    let result = projects
        .into_iter()
        .map(|project| {
            let category_ids = links
                .iter()
                .filter(|l| l.project_id == project.id)
                .map(|l| l.category_id)
                .collect();
            ProjectWithCategories {
                project,
                category_ids,
            }
        })
        .collect();
    Ok(Json(result))
}

/// GET /api/v1/admin/projects/{id}
pub async fn get_by_id(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectWithCategories>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    Ok(Json(with_categories(&state, project).await?))
}

/// POST /api/v1/admin/projects
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ProjectWithCategories>)> {
    let mut form = FormData::collect(multipart).await?;

    let title = form.trimmed("title").to_string();
    if title.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project title is required".into(),
        )));
    }
    let uploads = SlotUploads::take(&mut form)?;
    if !uploads.has(ImageSlot::Main) {
        return Err(AppError::Core(CoreError::Validation(
            "main_image is required".into(),
        )));
    }

    let mut input = CreateProject {
        title,
        project_date: form.parse("project_date")?,
        the_vision: form.string("the_vision"),
        the_brief: form.string("the_brief"),
        the_transformation: form.string("the_transformation"),
        the_outcome: form.string("the_outcome"),
        google_map_iframe: form.string("google_map_iframe"),
        location_name: form.string("location_name"),
        location_city: form.string("location_city"),
        location_postcode: form.string("location_postcode"),
        latitude: form.parse("latitude")?,
        longitude: form.parse("longitude")?,
        add_project_to_feature: form.flag("add_project_to_feature"),
        category_ids: form.ids("category_ids")?.unwrap_or_default(),
        ..Default::default()
    };

    let stored = uploads.store(&state.media).await?;
    input.main_image = stored_path(&stored, ImageSlot::Main).unwrap_or_default();
    input.listing_image = stored_path(&stored, ImageSlot::Listing);
    input.banner_image_one = stored_path(&stored, ImageSlot::BannerOne);
    input.banner_image_two = stored_path(&stored, ImageSlot::BannerTwo);

    let project = match ProjectRepo::create(&state.pool, &input).await {
        Ok(project) => project,
        Err(err) => {
            state.media.discard(&stored_paths(&stored)).await;
            return Err(err.into());
        }
    };
    tracing::info!(project_id = project.id, "Project created");

    hooks::after_project_save(&state.media, &project).await;

    Ok((StatusCode::CREATED, Json(with_categories(&state, project).await?)))
}

/// PUT /api/v1/admin/projects/{id}
///
/// Absent fields keep their value. A new file replaces its slot;
/// `clear_<slot>` empties an optional slot. A present `category_ids`
/// replaces the category set (empty clears it).
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<ProjectWithCategories>> {
    let mut form = FormData::collect(multipart).await?;

    if ProjectRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::not_found("Project", id));
    }

    let title = form.string("title");
    if title.as_deref() == Some("") {
        return Err(AppError::Core(CoreError::Validation(
            "Project title must not be empty".into(),
        )));
    }
    let uploads = SlotUploads::take(&mut form)?;

    let mut input = UpdateProject {
        title,
        project_date: form.parse("project_date")?,
        the_vision: form.string("the_vision"),
        the_brief: form.string("the_brief"),
        the_transformation: form.string("the_transformation"),
        the_outcome: form.string("the_outcome"),
        google_map_iframe: form.string("google_map_iframe"),
        location_name: form.string("location_name"),
        location_city: form.string("location_city"),
        location_postcode: form.string("location_postcode"),
        latitude: form.parse("latitude")?,
        longitude: form.parse("longitude")?,
        add_project_to_feature: form.flag("add_project_to_feature"),
        category_ids: form.ids("category_ids")?,
        ..Default::default()
    };

    for slot in [ImageSlot::Listing, ImageSlot::BannerOne, ImageSlot::BannerTwo] {
        if form.flag(&format!("clear_{}", slot.field_name())) == Some(true) {
            if let Some(field) = slot_field(&mut input, slot) {
                *field = Some(String::new());
            }
        }
    }

    let stored = uploads.store(&state.media).await?;
    for (slot, path) in &stored {
        if let Some(field) = slot_field(&mut input, *slot) {
            *field = Some(path.clone());
        }
    }

    let project = match ProjectRepo::update(&state.pool, id, &input).await {
        Ok(Some(project)) => project,
        Ok(None) => {
            state.media.discard(&stored_paths(&stored)).await;
            return Err(AppError::not_found("Project", id));
        }
        Err(err) => {
            state.media.discard(&stored_paths(&stored)).await;
            return Err(err.into());
        }
    };
    tracing::info!(project_id = project.id, "Project updated");

    hooks::after_project_save(&state.media, &project).await;

    Ok(Json(with_categories(&state, project).await?))
}

fn slot_field(input: &mut UpdateProject, slot: ImageSlot) -> Option<&mut Option<String>> {
    match slot {
        ImageSlot::Listing => Some(&mut input.listing_image),
        ImageSlot::Main => Some(&mut input.main_image),
        ImageSlot::BannerOne => Some(&mut input.banner_image_one),
        ImageSlot::BannerTwo => Some(&mut input.banner_image_two),
        ImageSlot::Gallery => None,
    }
}

/// DELETE /api/v1/admin/projects/{id}
///
/// Gallery images and category links are removed with the project.
pub async fn delete(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProjectRepo::delete(&state.pool, id).await? {
        tracing::info!(project_id = id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Project", id))
    }
}
