//! Shared helpers for the HTTP integration tests.
//!
//! Requests go straight to the router through `tower::ServiceExt::oneshot`;
//! there is no TCP listener. Outgoing email is captured by
//! [`RecordingMailer`] and uploads land in a per-test temporary media root.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, RgbImage};
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use coffer_api::app::build_app;
use coffer_api::auth::jwt::JwtConfig;
use coffer_api::auth::password::hash_password;
use coffer_api::config::{AdminCredentials, ServerConfig};
use coffer_api::media::MediaStore;
use coffer_api::state::AppState;
use coffer_mail::{EmailError, Mailer, OutboundEmail};

pub const ADMIN_USERNAME: &str = "owner";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery-staple";
pub const SITE_URL: &str = "https://coffer.test";
pub const FROM_EMAIL: &str = "no-reply@coffer.test";
pub const RECEIVER_EMAIL: &str = "studio@coffer.test";

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Captures every email; sends to addresses in `fail_for` return an error.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
    fail_for: Vec<String>,
}

impl RecordingMailer {
    pub fn failing_for(addresses: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_for: addresses.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError> {
        if email.to.iter().any(|to| self.fail_for.contains(to)) {
            return Err(EmailError::Build(format!("refused {}", email.to.join(","))));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(media_root: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        media_root,
        site_url: SITE_URL.to_string(),
        default_from_email: FROM_EMAIL.to_string(),
        contact_receiver_email: RECEIVER_EMAIL.to_string(),
        invite_expiry_days: 10,
        admin: AdminCredentials {
            username: ADMIN_USERNAME.to_string(),
            password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
        },
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// The full router plus the handles tests inspect.
pub struct TestApp {
    pub router: Router,
    pub mailer: Arc<RecordingMailer>,
    pub media: MediaStore,
    pub config: Arc<ServerConfig>,
    _media_dir: TempDir,
}

impl TestApp {
    pub fn new(pool: PgPool) -> Self {
        Self::with_mailer(pool, RecordingMailer::default())
    }

    pub fn with_mailer(pool: PgPool, mailer: RecordingMailer) -> Self {
        let media_dir = tempfile::tempdir().unwrap();
        let config = Arc::new(test_config(media_dir.path().to_path_buf()));
        let media = MediaStore::new(media_dir.path());
        let mailer = Arc::new(mailer);

        let state = AppState {
            pool,
            config: Arc::clone(&config),
            mailer: mailer.clone(),
            media: media.clone(),
        };

        Self {
            router: build_app(state),
            mailer,
            media,
            config,
            _media_dir: media_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Log in through the API and return the Bearer token.
    pub async fn admin_token(&self) -> String {
        let response = self
            .send(json_request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                serde_json::json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}),
            ))
            .await;
        assert_eq!(response.status(), 200, "admin login failed");
        body_json(response).await["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    pub fn media_file(&self, relative: &str) -> PathBuf {
        self.media.abs_path(relative)
    }

    /// Files currently stored under a media sub-directory.
    pub fn stored_files(&self, dir: &str) -> Vec<PathBuf> {
        match std::fs::read_dir(self.media.abs_path(dir)) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn with_auth(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    with_auth(Request::builder().method(Method::GET).uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

pub fn delete_request(uri: &str, token: Option<&str>) -> Request<Body> {
    with_auth(Request::builder().method(Method::DELETE).uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    with_auth(Request::builder().method(method).uri(uri), token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "coffer-test-boundary";

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn request(mut self, method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        with_auth(Request::builder().method(method).uri(uri), token)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Encoded test image of the given size (horizontal gradient).
pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Png)
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Jpeg)
}

/// Dimensions of an image file on disk.
pub fn dimensions(path: &std::path::Path) -> (u32, u32) {
    image::image_dimensions(path).unwrap()
}
