//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod invite_repo;
pub mod project_image_repo;
pub mod project_repo;
pub mod social_links_repo;
pub mod testimonial_repo;

pub use category_repo::CategoryRepo;
pub use invite_repo::InviteRepo;
pub use project_image_repo::ProjectImageRepo;
pub use project_repo::ProjectRepo;
pub use social_links_repo::SocialLinksRepo;
pub use testimonial_repo::TestimonialRepo;
