pub mod auth;
pub mod category;
pub mod invite;
pub mod project;
pub mod project_image;
pub mod site;
pub mod social_links;
pub mod testimonial;
pub mod testimonial_submit;
