//! Testimonial model and DTOs.

use coffer_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `testimonials` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Testimonial {
    pub id: DbId,
    pub name: String,
    pub role: String,
    pub quote: String,
    pub photo: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a testimonial. `photo` is an already-stored media path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTestimonial {
    pub name: String,
    pub role: Option<String>,
    pub quote: String,
    pub photo: Option<String>,
    /// Defaults to `true` if omitted.
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// DTO for updating a testimonial. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTestimonial {
    pub name: Option<String>,
    pub role: Option<String>,
    pub quote: Option<String>,
    pub photo: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}
