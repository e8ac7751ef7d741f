use axum::routing::get;
use axum::Router;

use crate::handlers::site;
use crate::state::AppState;

/// Public page-state routes mounted at `/site`. No authentication.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/home", get(site::home))
        .route("/projects", get(site::projects))
        .route("/gallery", get(site::gallery))
        .route("/project-details", get(site::project_details))
        .route("/project-details/{id}", get(site::project_details_by_id))
        .route("/about", get(site::about))
        .route(
            "/contact",
            get(site::contact_page).post(site::contact_submit),
        )
        .route("/social-links", get(site::social_links))
}
