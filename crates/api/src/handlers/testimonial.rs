//! Handlers for the `/admin/testimonials` resource.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use coffer_core::error::CoreError;
use coffer_core::testimonial::TestimonialForm;
use coffer_core::types::DbId;
use coffer_db::models::testimonial::{CreateTestimonial, Testimonial, UpdateTestimonial};
use coffer_db::repositories::TestimonialRepo;

use crate::error::{AppError, AppResult};
use crate::forms::FormData;
use crate::media::TESTIMONIAL_PHOTO_DIR;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Store the `photo` file part, if any.
async fn store_photo(state: &AppState, form: &mut FormData) -> AppResult<Option<String>> {
    match form.take_file("photo") {
        Some(file) => Ok(Some(
            state
                .media
                .save_image(TESTIMONIAL_PHOTO_DIR, &file.file_name, &file.data)
                .await?,
        )),
        None => Ok(None),
    }
}

async fn discard_photo(state: &AppState, photo: Option<&str>) {
    if let Some(photo) = photo {
        state.media.discard(&[photo]).await;
    }
}

/// GET /api/v1/admin/testimonials
pub async fn list(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Testimonial>>> {
    Ok(Json(TestimonialRepo::list(&state.pool).await?))
}

/// GET /api/v1/admin/testimonials/{id}
pub async fn get_by_id(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Testimonial>> {
    let testimonial = TestimonialRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Testimonial", id))?;
    Ok(Json(testimonial))
}

/// POST /api/v1/admin/testimonials
///
/// Multipart fields: `name`, `role`, `quote`, `photo` (file), `is_active`,
/// `sort_order`.
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Testimonial>)> {
    let mut form = FormData::collect(multipart).await?;

    let fields = TestimonialForm::new(
        form.trimmed("name"),
        form.trimmed("role"),
        form.trimmed("quote"),
    );
    fields.validate()?;
    let is_active = form.flag("is_active");
    let sort_order = form.parse("sort_order")?;
    let photo = store_photo(&state, &mut form).await?;

    let input = CreateTestimonial {
        name: fields.name,
        role: Some(fields.role),
        quote: fields.quote,
        photo,
        is_active,
        sort_order,
    };
    let testimonial = match TestimonialRepo::create(&state.pool, &input).await {
        Ok(testimonial) => testimonial,
        Err(err) => {
            discard_photo(&state, input.photo.as_deref()).await;
            return Err(err.into());
        }
    };
    Ok((StatusCode::CREATED, Json(testimonial)))
}

/// PUT /api/v1/admin/testimonials/{id}
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<Testimonial>> {
    let mut form = FormData::collect(multipart).await?;

    if TestimonialRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::not_found("Testimonial", id));
    }

    let name = form.string("name");
    let quote = form.string("quote");
    if name.as_deref() == Some("") || quote.as_deref() == Some("") {
        return Err(AppError::Core(CoreError::Validation(
            "Name and testimonial must not be empty".into(),
        )));
    }

    let mut input = UpdateTestimonial {
        name,
        role: form.string("role"),
        quote,
        is_active: form.flag("is_active"),
        sort_order: form.parse("sort_order")?,
        ..Default::default()
    };
    input.photo = store_photo(&state, &mut form).await?;

    match TestimonialRepo::update(&state.pool, id, &input).await {
        Ok(Some(testimonial)) => Ok(Json(testimonial)),
        Ok(None) => {
            discard_photo(&state, input.photo.as_deref()).await;
            Err(AppError::not_found("Testimonial", id))
        }
        Err(err) => {
            discard_photo(&state, input.photo.as_deref()).await;
            Err(err.into())
        }
    }
}

/// DELETE /api/v1/admin/testimonials/{id}
pub async fn delete(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if TestimonialRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Testimonial", id))
    }
}
