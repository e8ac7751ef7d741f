//! Post-save hooks run by handlers after a repository write returns.
//!
//! Normalization never fails the request: the record is already committed,
//! so every problem is logged and the original file is left as it was.

use coffer_core::imaging::{normalize_image, ImageSlot, NormalizeError};
use coffer_db::models::project::Project;
use coffer_db::models::project_image::ProjectImage;

use crate::media::MediaStore;

/// Normalize every populated image slot of a saved project.
pub async fn after_project_save(media: &MediaStore, project: &Project) {
    for (slot, path) in project.populated_slots() {
        normalize_slot(media, slot, path).await;
    }
}

/// Normalize a saved gallery image.
pub async fn after_gallery_image_save(media: &MediaStore, image: &ProjectImage) {
    if let Some(path) = coffer_db::models::media_path(&image.image) {
        normalize_slot(media, ImageSlot::Gallery, path).await;
    }
}

async fn normalize_slot(media: &MediaStore, slot: ImageSlot, relative: &str) {
    let abs = media.abs_path(relative);
    let target = slot.target_size();

    let result = tokio::task::spawn_blocking(move || normalize_image(&abs, target)).await;

    match result {
        Ok(Ok(())) => {
            tracing::debug!(
                slot = slot.field_name(),
                path = relative,
                width = target.width,
                height = target.height,
                "Image normalized"
            );
        }
        Ok(Err(NormalizeError::Missing(_))) => {
            tracing::debug!(slot = slot.field_name(), path = relative, "Image file missing, skipped");
        }
        Ok(Err(err)) => {
            tracing::warn!(slot = slot.field_name(), path = relative, error = %err, "Image normalization failed");
        }
        Err(join_err) => {
            tracing::warn!(slot = slot.field_name(), path = relative, error = %join_err, "Image normalization task panicked");
        }
    }
}
