//! Project category model and DTOs.

use coffer_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `project_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectCategory {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A category attached to a project, as read through `project_category_links`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectCategoryLink {
    pub project_id: DbId,
    pub category_id: DbId,
    pub name: String,
    pub slug: String,
}

/// DTO for creating a new category. The slug is derived from the name when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectCategory {
    pub name: String,
    pub slug: Option<String>,
}

/// DTO for updating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProjectCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
}
