//! Admin routes mounted at `/admin`. Every handler takes `RequireAdmin`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{category, invite, project, project_image, social_links, testimonial};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(category::list).post(category::create))
        .route(
            "/categories/{id}",
            put(category::update).delete(category::delete),
        )
        .route("/projects", get(project::list).post(project::create))
        .route(
            "/projects/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route(
            "/projects/{id}/images",
            get(project_image::list_by_project).post(project_image::create),
        )
        .route(
            "/project-images/{id}",
            put(project_image::update).delete(project_image::delete),
        )
        .route(
            "/testimonials",
            get(testimonial::list).post(testimonial::create),
        )
        .route(
            "/testimonials/{id}",
            get(testimonial::get_by_id)
                .put(testimonial::update)
                .delete(testimonial::delete),
        )
        .route(
            "/testimonial-invites",
            get(invite::list).post(invite::create),
        )
        .route("/testimonial-invites/send", post(invite::send))
        .route(
            "/testimonial-invites/{id}",
            axum::routing::delete(invite::delete),
        )
        .route(
            "/social-links",
            get(social_links::get)
                .post(social_links::create)
                .put(social_links::update),
        )
}
