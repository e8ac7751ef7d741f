//! Public testimonial submission rules and the built-in fallback quotes.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Inline message shown when a required submission field is blank.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Name and testimonial are required.";

/// Longest accepted name, in characters (`testimonials.name`).
pub const NAME_MAX_CHARS: usize = 120;

/// Longest accepted role, in characters (`testimonials.role`).
pub const ROLE_MAX_CHARS: usize = 160;

/// Fields entered on the public testimonial form, after trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestimonialForm {
    pub name: String,
    pub role: String,
    pub quote: String,
}

impl TestimonialForm {
    pub fn new(name: &str, role: &str, quote: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            role: role.trim().to_string(),
            quote: quote.trim().to_string(),
        }
    }

    /// Name and quote must be non-empty; role is optional. Name and role
    /// are limited to their column lengths.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.is_empty() || self.quote.is_empty() {
            return Err(CoreError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        }
        check_length("Name", &self.name, NAME_MAX_CHARS)?;
        check_length("Role", &self.role, ROLE_MAX_CHARS)?;
        Ok(())
    }
}

fn check_length(label: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{label} must be at most {max} characters."
        )));
    }
    Ok(())
}

/// A quote shown on public pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayTestimonial {
    pub name: String,
    pub role: String,
    pub quote: String,
    pub photo_url: Option<String>,
}

const FALLBACK: &[(&str, &str, &str)] = &[
    (
        "Ronald Richards",
        "CEO, Anderson Real Estate",
        "Working with this architectural agency was a game-changer for our commercial projects. \
         Their innovative designs and attention to detail exceeded our expectations, delivering a \
         final product that perfectly aligned with our brand and vision.",
    ),
    (
        "Sarah Bennett",
        "Homeowner",
        "The renovation of our home was seamless, thanks to the team's expertise and commitment to \
         quality. They truly listened to our needs and transformed our outdated space into a modern, \
         functional, and beautiful home.",
    ),
    (
        "David Foster",
        "Director of Operations",
        "Their ability to blend sustainable practices with cutting-edge design is unparalleled. We \
         were thrilled with the results and impressed by their dedication to creating \
         environmentally-friendly and aesthetically pleasing spaces.",
    ),
    (
        "James Miller",
        "Property Developer",
        "Collaborating with this team was an absolute pleasure. Their creative approach and \
         professionalism made the process smooth, and the final designs were nothing short of \
         stunning.",
    ),
    (
        "Emily Carter",
        "Interior Designer",
        "This team brought a fresh perspective to our development projects. Their innovative ideas \
         and thorough project management ensured everything was delivered on time and within \
         budget.",
    ),
    (
        "Noah Wilson",
        "Client",
        "Build quality was consistent and the team handled details carefully. We would confidently \
         recommend them for residential and refurbishment work.",
    ),
];

/// Quotes shown while no testimonial has been published yet.
pub fn fallback_testimonials() -> Vec<DisplayTestimonial> {
    FALLBACK
        .iter()
        .map(|(name, role, quote)| DisplayTestimonial {
            name: (*name).to_string(),
            role: (*role).to_string(),
            quote: (*quote).to_string(),
            photo_url: None,
        })
        .collect()
}

/// Use the published testimonials, or the fallback set when there are none.
pub fn or_fallback(published: Vec<DisplayTestimonial>) -> Vec<DisplayTestimonial> {
    if published.is_empty() {
        fallback_testimonials()
    } else {
        published
    }
}
