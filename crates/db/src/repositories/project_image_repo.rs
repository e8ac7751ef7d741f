//! Repository for the `project_images` table.

use coffer_core::types::DbId;
use sqlx::PgPool;

use crate::models::project_image::{
    CreateProjectImage, GalleryEntry, ProjectImage, UpdateProjectImage,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, image, category_id, sort_order, created_at, updated_at";

/// Provides CRUD operations for project gallery images.
pub struct ProjectImageRepo;

impl ProjectImageRepo {
    /// Insert a new gallery image. `sort_order` defaults to 0.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProjectImage,
    ) -> Result<ProjectImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_images (project_id, image, category_id, sort_order)
             VALUES ($1, $2, $3, COALESCE($4, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(input.project_id)
            .bind(&input.image)
            .bind(input.category_id)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_images WHERE id = $1");
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Images of one project ordered by `sort_order`, ties broken by insertion order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_images
             WHERE project_id = $1
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// All gallery images, newest first, with project and category details.
    pub async fn list_gallery(pool: &PgPool) -> Result<Vec<GalleryEntry>, sqlx::Error> {
        sqlx::query_as::<_, GalleryEntry>(
            "SELECT i.id, i.project_id, p.title AS project_title, i.image, i.category_id,
                    c.name AS category_name, c.slug AS category_slug, i.sort_order
             FROM project_images i
             JOIN projects p ON p.id = i.project_id
             LEFT JOIN project_categories c ON c.id = i.category_id
             ORDER BY i.id DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM project_images")
            .fetch_one(pool)
            .await
    }

    /// Update a gallery image. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProjectImage,
    ) -> Result<Option<ProjectImage>, sqlx::Error> {
        let query = format!(
            "UPDATE project_images SET
                image = COALESCE($2, image),
                category_id = CASE WHEN $4 THEN NULL ELSE COALESCE($3, category_id) END,
                sort_order = COALESCE($5, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectImage>(&query)
            .bind(id)
            .bind(&input.image)
            .bind(input.category_id)
            .bind(input.clear_category)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_images WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
