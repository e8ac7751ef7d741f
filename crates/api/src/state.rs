use std::sync::Arc;

use coffer_mail::Mailer;

use crate::config::ServerConfig;
use crate::media::MediaStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: coffer_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Outbound email (SMTP, or the console mailer when SMTP is unset).
    pub mailer: Arc<dyn Mailer>,
    /// Upload storage under `MEDIA_ROOT`.
    pub media: MediaStore,
}
