//! Repository for the `project_categories` table.

use coffer_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{ProjectCategory, ProjectCategoryLink};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug, created_at, updated_at";

/// Provides CRUD operations for project categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category. The caller supplies the final slug.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        slug: &str,
    ) -> Result<ProjectCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_categories (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectCategory>(&query)
            .bind(name)
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_categories WHERE id = $1");
        sqlx::query_as::<_, ProjectCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all categories ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_categories ORDER BY name");
        sqlx::query_as::<_, ProjectCategory>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a category. `None` fields keep their current value.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        slug: Option<&str>,
    ) -> Result<Option<ProjectCategory>, sqlx::Error> {
        let query = format!(
            "UPDATE project_categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectCategory>(&query)
            .bind(id)
            .bind(name)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category. Project links cascade; gallery images keep their row
    /// with `category_id` set to NULL.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Categories attached to the given projects, ordered by project then name.
    pub async fn list_for_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<ProjectCategoryLink>, sqlx::Error> {
        sqlx::query_as::<_, ProjectCategoryLink>(
            "SELECT l.project_id, c.id AS category_id, c.name, c.slug
             FROM project_category_links l
             JOIN project_categories c ON c.id = l.category_id
             WHERE l.project_id = ANY($1)
             ORDER BY l.project_id, c.name",
        )
        .bind(project_ids)
        .fetch_all(pool)
        .await
    }
}
