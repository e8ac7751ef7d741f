//! Public testimonial submission through a single-use invite link.
//!
//! `GET|POST /testimonial/submit/{token}/`. Unknown or malformed tokens are
//! 404. A used or expired invite yields `is_invalid: true` and accepts no
//! data. Form problems come back inline with the entered values.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use chrono::Utc;
use coffer_core::error::CoreError;
use coffer_core::invite::parse_token;
use coffer_core::testimonial::TestimonialForm;
use coffer_core::types::Timestamp;
use coffer_db::models::invite::TestimonialInvite;
use coffer_db::models::testimonial::CreateTestimonial;
use coffer_db::repositories::InviteRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::forms::FormData;
use crate::handlers::site::validation_message;
use crate::media::{image_extension, TESTIMONIAL_PHOTO_DIR};
use crate::state::AppState;

/// Page state of the submission form.
#[derive(Debug, Serialize)]
pub struct SubmitPage {
    pub is_invalid: bool,
    pub submitted: bool,
    pub form_error: String,
    pub form_data: TestimonialForm,
    pub expires_at: Timestamp,
}

impl SubmitPage {
    fn for_invite(invite: &TestimonialInvite) -> Self {
        Self {
            is_invalid: !invite.state(Utc::now()).is_open(),
            submitted: false,
            form_error: String::new(),
            form_data: TestimonialForm::default(),
            expires_at: invite.expires_at,
        }
    }
}

async fn load_invite(pool: &sqlx::PgPool, raw_token: &str) -> AppResult<TestimonialInvite> {
    let token = parse_token(raw_token)?;
    InviteRepo::find_by_token(pool, token).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFoundByKey {
            entity: "TestimonialInvite",
            key: raw_token.to_string(),
        })
    })
}

/// GET /testimonial/submit/{token}/
pub async fn show(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<SubmitPage>> {
    let invite = load_invite(&state.pool, &token).await?;
    Ok(Json(SubmitPage::for_invite(&invite)))
}

/// POST /testimonial/submit/{token}/
///
/// Multipart fields: `name`, `role`, `quote`, optional `photo` file.
pub async fn submit(
    State(state): State<AppState>,
    Path(token): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<SubmitPage>> {
    let invite = load_invite(&state.pool, &token).await?;
    let mut page = SubmitPage::for_invite(&invite);
    if page.is_invalid {
        return Ok(Json(page));
    }

    let mut form = FormData::collect(multipart).await?;
    let fields = TestimonialForm::new(
        form.trimmed("name"),
        form.trimmed("role"),
        form.trimmed("quote"),
    );
    page.form_data = fields.clone();

    if let Err(err) = fields.validate() {
        page.form_error = validation_message(err);
        return Ok(Json(page));
    }

    let photo = match form.take_file("photo") {
        Some(file) => {
            if let Err(err) = image_extension(&file.file_name) {
                page.form_error = match err {
                    AppError::Core(core) => validation_message(core),
                    other => other.to_string(),
                };
                return Ok(Json(page));
            }
            Some(
                state
                    .media
                    .save_image(TESTIMONIAL_PHOTO_DIR, &file.file_name, &file.data)
                    .await?,
            )
        }
        None => None,
    };

    let input = CreateTestimonial {
        name: fields.name,
        role: Some(fields.role),
        quote: fields.quote,
        photo: photo.clone(),
        is_active: Some(true),
        sort_order: None,
    };

    let redeemed = InviteRepo::redeem(&state.pool, invite.token, &input).await;
    if !matches!(redeemed, Ok(Some(_))) {
        if let Some(photo) = &photo {
            state.media.discard(&[photo.as_str()]).await;
        }
    }

    match redeemed? {
        Some(_) => page.submitted = true,
        // Lost a race with another submission or crossed the expiry.
        None => page.is_invalid = true,
    }

    Ok(Json(page))
}
