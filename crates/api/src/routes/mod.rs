pub mod admin;
pub mod auth;
pub mod health;
pub mod site;
pub mod testimonial;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login                                      admin login (public)
///
/// /site/home                                       home page state
/// /site/projects                                   projects listing
/// /site/gallery                                    gallery listing
/// /site/project-details                            featured/newest or ?id=
/// /site/project-details/{id}                       project by id
/// /site/about                                      about page state
/// /site/contact                                    contact page (GET), submit (POST)
/// /site/social-links                               footer links
///
/// /admin/categories                                list, create
/// /admin/categories/{id}                           update, delete
/// /admin/projects                                  list, create (multipart)
/// /admin/projects/{id}                             get, update (multipart), delete
/// /admin/projects/{id}/images                      list, create (multipart)
/// /admin/project-images/{id}                       update (multipart), delete
/// /admin/testimonials                              list, create (multipart)
/// /admin/testimonials/{id}                         get, update (multipart), delete
/// /admin/testimonial-invites                       list, create
/// /admin/testimonial-invites/send                  bulk send (POST)
/// /admin/testimonial-invites/{id}                  delete
/// /admin/social-links                              get, create, update
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/site", site::router())
        .nest("/admin", admin::router())
}
