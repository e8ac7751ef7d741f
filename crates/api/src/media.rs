//! Upload storage under `MEDIA_ROOT`.
//!
//! Uploads are stored as `<root>/<dir>/<uuid>.<ext>`; the database keeps the
//! path relative to the root and the files are served read-only at
//! `/media/<relative path>`.

use std::path::{Path, PathBuf};

use coffer_core::error::CoreError;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Image extensions accepted for upload.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// URL prefix the media root is served under.
pub const MEDIA_URL_PREFIX: &str = "/media";

/// Media sub-directory for testimonial photos.
pub const TESTIMONIAL_PHOTO_DIR: &str = "testimonials/photos";

/// File storage rooted at a single directory.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a stored relative path.
    pub fn abs_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Public URL of a stored relative path.
    pub fn url(&self, relative: &str) -> String {
        format!("{MEDIA_URL_PREFIX}/{}", relative.trim_start_matches('/'))
    }

    /// Store an uploaded image under `dir`, keeping the original extension.
    ///
    /// Returns the path relative to the media root.
    pub async fn save_image(&self, dir: &str, file_name: &str, data: &[u8]) -> AppResult<String> {
        let ext = image_extension(file_name)?;
        let relative = format!("{dir}/{}.{ext}", Uuid::new_v4());
        let abs = self.abs_path(&relative);

        if let Some(parent) = abs.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&abs, data).await?;

        tracing::debug!(path = %relative, bytes = data.len(), "Stored upload");
        Ok(relative)
    }

    /// Remove uploads whose owning database write failed.
    pub async fn discard<S: AsRef<str>>(&self, paths: &[S]) {
        for relative in paths {
            let relative = relative.as_ref();
            match tokio::fs::remove_file(self.abs_path(relative)).await {
                Ok(()) => tracing::debug!(path = relative, "Discarded upload"),
                Err(err) => {
                    tracing::warn!(path = relative, error = %err, "Failed to discard upload")
                }
            }
        }
    }
}

/// Lower-cased extension of `file_name` if it is a supported image type.
pub fn image_extension(file_name: &str) -> AppResult<String> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "Unsupported image format '{file_name}'. Supported: .jpg, .jpeg, .png, .webp"
        ))))
    }
}
