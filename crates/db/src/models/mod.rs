//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Stored media paths are relative to the media root; an empty string means
//! the slot holds no file.

pub mod category;
pub mod invite;
pub mod project;
pub mod project_image;
pub mod social_links;
pub mod testimonial;

/// `Some(path)` when a stored media column is populated.
pub fn media_path(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
