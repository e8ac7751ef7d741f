//! Public site pages, served as JSON page-state under `/site`.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use coffer_core::contact::{ContactForm, SEND_FAILED_MESSAGE};
use coffer_core::error::CoreError;
use coffer_core::imaging::ImageSlot;
use coffer_core::testimonial::{or_fallback, DisplayTestimonial};
use coffer_core::types::DbId;
use coffer_db::models::category::{ProjectCategory, ProjectCategoryLink};
use coffer_db::models::media_path;
use coffer_db::models::project::Project;
use coffer_db::models::testimonial::Testimonial;
use coffer_db::repositories::{
    CategoryRepo, ProjectImageRepo, ProjectRepo, SocialLinksRepo, TestimonialRepo,
};
use coffer_mail::OutboundEmail;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::media::MediaStore;
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of project-detail links on the home page.
const HOME_PROJECT_LINKS: usize = 5;

/// Marketing figures shown next to the live counts.
const REVIEWS_COUNT: i64 = 6;
const TESTIMONIALS_COUNT: i64 = 3;

/// Path of the project-details page.
const PROJECT_DETAILS_PATH: &str = "/project-details";

// ---------------------------------------------------------------------------
// Page payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SiteCounts {
    pub projects_count: i64,
    pub images_count: i64,
    pub reviews_count: i64,
    pub testimonials_count: i64,
}

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub project_detail_urls: Vec<String>,
    #[serde(flatten)]
    pub counts: SiteCounts,
    pub testimonials: Vec<DisplayTestimonial>,
}

#[derive(Debug, Serialize)]
pub struct ProjectCard {
    pub id: DbId,
    pub title: String,
    pub project_date: Option<NaiveDate>,
    pub listing_image_url: Option<String>,
    pub main_image_url: Option<String>,
    pub location_name: String,
    pub location_city: String,
    pub is_featured: bool,
    pub category_slugs: Vec<String>,
    pub detail_url: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectsPage {
    pub categories: Vec<ProjectCategory>,
    pub projects: Vec<ProjectCard>,
}

#[derive(Debug, Serialize)]
pub struct GalleryItem {
    pub id: DbId,
    pub project_id: DbId,
    pub project_title: String,
    pub image_url: String,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GalleryPage {
    pub categories: Vec<ProjectCategory>,
    pub images: Vec<GalleryItem>,
}

/// Public image URLs of a project's four slots.
#[derive(Debug, Serialize)]
pub struct SlotUrls {
    pub listing_image: Option<String>,
    pub main_image: Option<String>,
    pub banner_image_one: Option<String>,
    pub banner_image_two: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    pub image_urls: SlotUrls,
    pub categories: Vec<ProjectCategoryLink>,
    pub gallery: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetailsPage {
    pub project: Option<ProjectDetails>,
    pub short_descriptions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AboutPage {
    pub testimonials: Vec<DisplayTestimonial>,
    #[serde(flatten)]
    pub counts: SiteCounts,
}

#[derive(Debug, Serialize)]
pub struct ContactPage {
    pub form_data: ContactForm,
    pub form_success: bool,
    pub form_error: String,
    pub testimonials: Vec<DisplayTestimonial>,
}

#[derive(Debug, Default, Serialize)]
pub struct SocialLinks {
    pub instagram_url: String,
    pub linkedin_url: String,
    pub facebook_url: String,
    pub twitter_url: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn media_url(media: &MediaStore, path: &str) -> Option<String> {
    media_path(path).map(|p| media.url(p))
}

fn display(media: &MediaStore, t: Testimonial) -> DisplayTestimonial {
    DisplayTestimonial {
        photo_url: media_url(media, &t.photo),
        name: t.name,
        role: t.role,
        quote: t.quote,
    }
}

/// Active testimonials in display order, or the built-in set when none exist.
async fn published_testimonials(state: &AppState) -> AppResult<Vec<DisplayTestimonial>> {
    let active = TestimonialRepo::list_active(&state.pool).await?;
    Ok(or_fallback(
        active.into_iter().map(|t| display(&state.media, t)).collect(),
    ))
}

async fn site_counts(state: &AppState) -> AppResult<SiteCounts> {
    Ok(SiteCounts {
        projects_count: ProjectRepo::count(&state.pool).await?,
        images_count: ProjectImageRepo::count(&state.pool).await?,
        reviews_count: REVIEWS_COUNT,
        testimonials_count: TESTIMONIALS_COUNT,
    })
}

fn detail_url(id: DbId) -> String {
    format!("{PROJECT_DETAILS_PATH}?id={id}")
}

/// Detail links for `ids`, padded with the bare details path.
fn home_project_links(ids: &[DbId]) -> Vec<String> {
    let mut urls: Vec<String> = ids
        .iter()
        .take(HOME_PROJECT_LINKS)
        .map(|&id| detail_url(id))
        .collect();
    urls.resize(HOME_PROJECT_LINKS, PROJECT_DETAILS_PATH.to_string());
    urls
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/site/home
pub async fn home(State(state): State<AppState>) -> AppResult<Json<DataResponse<HomePage>>> {
    let ids = ProjectRepo::list_ids(&state.pool, HOME_PROJECT_LINKS as i64).await?;
    Ok(Json(DataResponse {
        data: HomePage {
            project_detail_urls: home_project_links(&ids),
            counts: site_counts(&state).await?,
            testimonials: published_testimonials(&state).await?,
        },
    }))
}

/// GET /api/v1/site/projects
pub async fn projects(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ProjectsPage>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    let projects = ProjectRepo::list(&state.pool).await?;
    let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();
    let links = CategoryRepo::list_for_projects(&state.pool, &ids).await?;

    let cards = projects
        .into_iter()
        .map(|p| ProjectCard {
            category_slugs: links
                .iter()
                .filter(|l| l.project_id == p.id)
                .map(|l| l.slug.clone())
                .collect(),
            detail_url: detail_url(p.id),
            listing_image_url: media_url(&state.media, &p.listing_image),
            main_image_url: media_url(&state.media, &p.main_image),
            id: p.id,
            title: p.title,
            project_date: p.project_date,
            location_name: p.location_name,
            location_city: p.location_city,
            is_featured: p.add_project_to_feature,
        })
        .collect();

    Ok(Json(DataResponse {
        data: ProjectsPage {
            categories,
            projects: cards,
        },
    }))
}

/// GET /api/v1/site/gallery
pub async fn gallery(State(state): State<AppState>) -> AppResult<Json<DataResponse<GalleryPage>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    let images = ProjectImageRepo::list_gallery(&state.pool)
        .await?
        .into_iter()
        .map(|e| GalleryItem {
            id: e.id,
            project_id: e.project_id,
            project_title: e.project_title,
            image_url: state.media.url(&e.image),
            category_name: e.category_name,
            category_slug: e.category_slug,
        })
        .collect();
    Ok(Json(DataResponse {
        data: GalleryPage { categories, images },
    }))
}

/// GET /api/v1/site/project-details/{id}
pub async fn project_details_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetailsPage>>> {
    details_page(&state, Some(id)).await
}

/// GET /api/v1/site/project-details[?id=N]
///
/// Without an id the featured (or newest) project is shown, or nothing when
/// there are no projects.
pub async fn project_details(
    State(state): State<AppState>,
    Query(query): Query<DetailsQuery>,
) -> AppResult<Json<DataResponse<ProjectDetailsPage>>> {
    details_page(&state, query.id).await
}

async fn details_page(
    state: &AppState,
    id: Option<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetailsPage>>> {
    let project = match id {
        Some(id) => Some(
            ProjectRepo::find_by_id(&state.pool, id)
                .await?
                .ok_or(AppError::not_found("Project", id))?,
        ),
        None => ProjectRepo::find_first(&state.pool).await?,
    };

    let Some(project) = project else {
        return Ok(Json(DataResponse {
            data: ProjectDetailsPage {
                project: None,
                short_descriptions: Vec::new(),
            },
        }));
    };

    let short_descriptions = project
        .short_descriptions()
        .into_iter()
        .map(str::to_string)
        .collect();
    let categories = CategoryRepo::list_for_projects(&state.pool, &[project.id]).await?;
    let gallery = ProjectImageRepo::list_by_project(&state.pool, project.id)
        .await?
        .into_iter()
        .map(|i| state.media.url(&i.image))
        .collect();
    let slot_url = |slot| project.slot_path(slot).map(|p| state.media.url(p));
    let image_urls = SlotUrls {
        listing_image: slot_url(ImageSlot::Listing),
        main_image: slot_url(ImageSlot::Main),
        banner_image_one: slot_url(ImageSlot::BannerOne),
        banner_image_two: slot_url(ImageSlot::BannerTwo),
    };

    Ok(Json(DataResponse {
        data: ProjectDetailsPage {
            project: Some(ProjectDetails {
                project,
                image_urls,
                categories,
                gallery,
            }),
            short_descriptions,
        },
    }))
}

/// GET /api/v1/site/about
pub async fn about(State(state): State<AppState>) -> AppResult<Json<DataResponse<AboutPage>>> {
    Ok(Json(DataResponse {
        data: AboutPage {
            testimonials: published_testimonials(&state).await?,
            counts: site_counts(&state).await?,
        },
    }))
}

/// GET /api/v1/site/contact
pub async fn contact_page(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ContactPage>>> {
    Ok(Json(DataResponse {
        data: ContactPage {
            form_data: ContactForm::default(),
            form_success: false,
            form_error: String::new(),
            testimonials: published_testimonials(&state).await?,
        },
    }))
}

/// POST /api/v1/site/contact
///
/// Validation and delivery problems are reported inline in the page state.
/// The enquiry goes to the receiver first; the acknowledgement to the
/// visitor is best-effort.
pub async fn contact_submit(
    State(state): State<AppState>,
    Json(input): Json<ContactForm>,
) -> AppResult<Json<DataResponse<ContactPage>>> {
    let form = input.trimmed();
    let mut page = ContactPage {
        form_data: form.clone(),
        form_success: false,
        form_error: String::new(),
        testimonials: published_testimonials(&state).await?,
    };

    if let Err(err) = form.validate() {
        page.form_error = validation_message(err);
        return Ok(Json(DataResponse { data: page }));
    }

    let from = state.config.default_from_email.as_str();
    let (subject, body) = form.enquiry();
    let enquiry = OutboundEmail::new(subject, body, from, state.config.contact_receiver_email.as_str());

    if let Err(err) = state.mailer.send(&enquiry).await {
        tracing::warn!(error = %err, "Contact enquiry email failed");
        page.form_error = SEND_FAILED_MESSAGE.to_string();
        return Ok(Json(DataResponse { data: page }));
    }

    let (subject, body) = form.acknowledgement();
    let ack = OutboundEmail::new(subject, body, from, form.email.as_str());
    if let Err(err) = state.mailer.send(&ack).await {
        tracing::info!(error = %err, "Contact acknowledgement email failed, ignored");
    }

    page.form_success = true;
    page.form_data = ContactForm::default();
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/site/social-links
pub async fn social_links(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SocialLinks>>> {
    let links = SocialLinksRepo::get(&state.pool)
        .await?
        .map(|l| SocialLinks {
            instagram_url: l.instagram_url,
            linkedin_url: l.linkedin_url,
            facebook_url: l.facebook_url,
            twitter_url: l.twitter_url,
        })
        .unwrap_or_default();
    Ok(Json(DataResponse { data: links }))
}

/// Inline text of a form validation error.
pub(crate) fn validation_message(err: CoreError) -> String {
    match err {
        CoreError::Validation(msg) => msg,
        other => other.to_string(),
    }
}
