use axum::routing::get;
use axum::Router;

use crate::handlers::testimonial_submit;
use crate::state::AppState;

/// Public redemption page, mounted at the root so invite links stay short.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/testimonial/submit/{token}/",
        get(testimonial_submit::show).post(testimonial_submit::submit),
    )
}
