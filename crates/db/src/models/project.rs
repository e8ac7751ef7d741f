//! Project entity model and DTOs.

use chrono::NaiveDate;
use coffer_core::imaging::ImageSlot;
use coffer_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::media_path;

/// A row from the `projects` table.
///
/// `latitude`/`longitude` are stored as `NUMERIC(9,6)` and read back as `f64`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub project_date: Option<NaiveDate>,
    pub listing_image: String,
    pub main_image: String,
    pub banner_image_one: String,
    pub banner_image_two: String,
    pub the_vision: String,
    pub the_brief: String,
    pub the_transformation: String,
    pub the_outcome: String,
    pub google_map_iframe: String,
    pub location_name: String,
    pub location_city: String,
    pub location_postcode: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub add_project_to_feature: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Stored path of the given project image slot.
    pub fn slot_path(&self, slot: ImageSlot) -> Option<&str> {
        match slot {
            ImageSlot::Listing => media_path(&self.listing_image),
            ImageSlot::Main => media_path(&self.main_image),
            ImageSlot::BannerOne => media_path(&self.banner_image_one),
            ImageSlot::BannerTwo => media_path(&self.banner_image_two),
            ImageSlot::Gallery => None,
        }
    }

    /// Every populated project-level slot with its stored path.
    pub fn populated_slots(&self) -> Vec<(ImageSlot, &str)> {
        ImageSlot::PROJECT_SLOTS
            .into_iter()
            .filter_map(|slot| self.slot_path(slot).map(|path| (slot, path)))
            .collect()
    }

    /// Non-empty narrative sections in page order.
    pub fn short_descriptions(&self) -> Vec<&str> {
        [
            &self.the_vision,
            &self.the_brief,
            &self.the_transformation,
            &self.the_outcome,
        ]
        .into_iter()
        .map(String::as_str)
        .filter(|text| !text.is_empty())
        .collect()
    }
}

/// DTO for creating a new project. Image fields hold already-stored media paths.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub project_date: Option<NaiveDate>,
    pub listing_image: Option<String>,
    pub main_image: String,
    pub banner_image_one: Option<String>,
    pub banner_image_two: Option<String>,
    pub the_vision: Option<String>,
    pub the_brief: Option<String>,
    pub the_transformation: Option<String>,
    pub the_outcome: Option<String>,
    pub google_map_iframe: Option<String>,
    pub location_name: Option<String>,
    pub location_city: Option<String>,
    pub location_postcode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub add_project_to_feature: Option<bool>,
    #[serde(default)]
    pub category_ids: Vec<DbId>,
}

/// DTO for updating an existing project. All fields are optional.
///
/// `category_ids`, when present, replaces the full category set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub project_date: Option<NaiveDate>,
    pub listing_image: Option<String>,
    pub main_image: Option<String>,
    pub banner_image_one: Option<String>,
    pub banner_image_two: Option<String>,
    pub the_vision: Option<String>,
    pub the_brief: Option<String>,
    pub the_transformation: Option<String>,
    pub the_outcome: Option<String>,
    pub google_map_iframe: Option<String>,
    pub location_name: Option<String>,
    pub location_city: Option<String>,
    pub location_postcode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub add_project_to_feature: Option<bool>,
    pub category_ids: Option<Vec<DbId>>,
}
