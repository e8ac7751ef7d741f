use std::path::PathBuf;

use coffer_core::invite::DEFAULT_EXPIRY_DAYS;

use crate::auth::jwt::JwtConfig;

/// Fallback sender when `DEFAULT_FROM_EMAIL` is not set.
const DEFAULT_FROM_ADDRESS: &str = "no-reply@example.com";

/// Credentials of the single site administrator.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}

impl AdminCredentials {
    /// Load from `ADMIN_USERNAME` (default `admin`) and `ADMIN_PASSWORD_HASH`.
    ///
    /// # Panics
    ///
    /// Panics if `ADMIN_PASSWORD_HASH` is not set.
    pub fn from_env() -> Self {
        Self {
            username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            password_hash: std::env::var("ADMIN_PASSWORD_HASH")
                .expect("ADMIN_PASSWORD_HASH must be set in the environment"),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on connection draining after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Directory uploads are written to and `/media` is served from.
    pub media_root: PathBuf,
    /// Public base URL used to build links in outgoing email.
    pub site_url: String,
    /// Sender address of every outgoing email.
    pub default_from_email: String,
    /// Where contact-form enquiries are delivered.
    pub contact_receiver_email: String,
    /// Validity of a new testimonial invite in days.
    pub invite_expiry_days: i64,
    pub admin: AdminCredentials,
    /// JWT token configuration (secret, expiry duration).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                       |
    /// | `MEDIA_ROOT`             | `media`                    |
    /// | `SITE_URL`               | `http://localhost:3000`    |
    /// | `DEFAULT_FROM_EMAIL`     | `no-reply@example.com`     |
    /// | `CONTACT_RECEIVER_EMAIL` | value of `DEFAULT_FROM_EMAIL` |
    /// | `INVITE_EXPIRY_DAYS`     | `10`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let media_root = PathBuf::from(
            std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".into()),
        );

        let site_url =
            std::env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        let default_from_email = std::env::var("DEFAULT_FROM_EMAIL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.into());

        let contact_receiver_email = std::env::var("CONTACT_RECEIVER_EMAIL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default_from_email.clone());

        let invite_expiry_days: i64 = std::env::var("INVITE_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_DAYS.to_string())
            .parse()
            .expect("INVITE_EXPIRY_DAYS must be a valid i64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            media_root,
            site_url,
            default_from_email,
            contact_receiver_email,
            invite_expiry_days,
            admin: AdminCredentials::from_env(),
            jwt: JwtConfig::from_env(),
        }
    }
}
