//! Repository for the `projects` table and its category links.

use coffer_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, project_date, listing_image, main_image, \
    banner_image_one, banner_image_two, the_vision, the_brief, the_transformation, \
    the_outcome, google_map_iframe, location_name, location_city, location_postcode, \
    latitude::float8 AS latitude, longitude::float8 AS longitude, add_project_to_feature, \
    created_at, updated_at";

/// Public listing order: featured projects first, then newest.
const LISTING_ORDER: &str = "ORDER BY add_project_to_feature DESC, created_at DESC, id DESC";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project together with its category links.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (
                title, project_date, listing_image, main_image, banner_image_one,
                banner_image_two, the_vision, the_brief, the_transformation, the_outcome,
                google_map_iframe, location_name, location_city, location_postcode,
                latitude, longitude, add_project_to_feature
             ) VALUES (
                $1, $2, COALESCE($3, ''), $4, COALESCE($5, ''),
                COALESCE($6, ''), COALESCE($7, ''), COALESCE($8, ''), COALESCE($9, ''),
                COALESCE($10, ''), COALESCE($11, ''), COALESCE($12, ''), COALESCE($13, ''),
                COALESCE($14, ''), $15::numeric(9, 6), $16::numeric(9, 6), COALESCE($17, FALSE)
             )
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(input.project_date)
            .bind(&input.listing_image)
            .bind(&input.main_image)
            .bind(&input.banner_image_one)
            .bind(&input.banner_image_two)
            .bind(&input.the_vision)
            .bind(&input.the_brief)
            .bind(&input.the_transformation)
            .bind(&input.the_outcome)
            .bind(&input.google_map_iframe)
            .bind(&input.location_name)
            .bind(&input.location_city)
            .bind(&input.location_postcode)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.add_project_to_feature)
            .fetch_one(&mut *tx)
            .await?;

        Self::replace_categories(&mut tx, project.id, &input.category_ids).await?;

        tx.commit().await?;
        Ok(project)
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects, featured first then most recently created.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects {LISTING_ORDER}");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// IDs of the first `limit` projects in listing order.
    pub async fn list_ids(pool: &PgPool, limit: i64) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!("SELECT id FROM projects {LISTING_ORDER} LIMIT $1");
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// The first project in listing order, if any exist.
    pub async fn find_first(pool: &PgPool) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects {LISTING_ORDER} LIMIT 1");
        sqlx::query_as::<_, Project>(&query)
            .fetch_optional(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                project_date = COALESCE($3, project_date),
                listing_image = COALESCE($4, listing_image),
                main_image = COALESCE($5, main_image),
                banner_image_one = COALESCE($6, banner_image_one),
                banner_image_two = COALESCE($7, banner_image_two),
                the_vision = COALESCE($8, the_vision),
                the_brief = COALESCE($9, the_brief),
                the_transformation = COALESCE($10, the_transformation),
                the_outcome = COALESCE($11, the_outcome),
                google_map_iframe = COALESCE($12, google_map_iframe),
                location_name = COALESCE($13, location_name),
                location_city = COALESCE($14, location_city),
                location_postcode = COALESCE($15, location_postcode),
                latitude = COALESCE($16::numeric(9, 6), latitude),
                longitude = COALESCE($17::numeric(9, 6), longitude),
                add_project_to_feature = COALESCE($18, add_project_to_feature)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.project_date)
            .bind(&input.listing_image)
            .bind(&input.main_image)
            .bind(&input.banner_image_one)
            .bind(&input.banner_image_two)
            .bind(&input.the_vision)
            .bind(&input.the_brief)
            .bind(&input.the_transformation)
            .bind(&input.the_outcome)
            .bind(&input.google_map_iframe)
            .bind(&input.location_name)
            .bind(&input.location_city)
            .bind(&input.location_postcode)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.add_project_to_feature)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(project) = project else {
            return Ok(None);
        };

        if let Some(category_ids) = &input.category_ids {
            Self::replace_categories(&mut tx, id, category_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(project))
    }

    /// Permanently delete a project. Gallery images and category links cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the full category set of a project.
    async fn replace_categories(
        conn: &mut PgConnection,
        project_id: DbId,
        category_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM project_category_links WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *conn)
            .await?;

        if category_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO project_category_links (project_id, category_id)
             SELECT $1, UNNEST($2::bigint[])
             ON CONFLICT ON CONSTRAINT uq_project_category_links_pair DO NOTHING",
        )
        .bind(project_id)
        .bind(category_ids)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
