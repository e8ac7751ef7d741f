//! Project gallery image model and DTOs.

use coffer_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `project_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectImage {
    pub id: DbId,
    pub project_id: DbId,
    pub image: String,
    pub category_id: Option<DbId>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A gallery image joined with its project title and optional category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GalleryEntry {
    pub id: DbId,
    pub project_id: DbId,
    pub project_title: String,
    pub image: String,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub sort_order: i32,
}

/// DTO for creating a gallery image. `image` is an already-stored media path.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectImage {
    pub project_id: DbId,
    pub image: String,
    pub category_id: Option<DbId>,
    pub sort_order: Option<i32>,
}

/// DTO for updating a gallery image.
///
/// `clear_category` detaches the category; `category_id` alone cannot express NULL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectImage {
    pub image: Option<String>,
    pub category_id: Option<DbId>,
    #[serde(default)]
    pub clear_category: bool,
    pub sort_order: Option<i32>,
}
