//! Contact form validation and the emails it produces.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill all fields before submitting.";
pub const SEND_FAILED_MESSAGE: &str = "Message could not be sent right now. Please try again.";

/// Contact form fields, trimmed. `field` is the free-text message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub field: String,
}

impl ContactForm {
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            field: self.field.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.is_empty() || self.email.is_empty() || self.field.is_empty() {
            return Err(CoreError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// Subject and body of the enquiry forwarded to the business.
    pub fn enquiry(&self) -> (String, String) {
        (
            format!("Contact Form Submission - {}", self.name),
            format!(
                "Name: {}\nEmail: {}\n\nMessage:\n{}\n",
                self.name, self.email, self.field
            ),
        )
    }

    /// Subject and body of the acknowledgement sent back to the visitor.
    pub fn acknowledgement(&self) -> (String, String) {
        (
            "We received your message - Precious Coffer".to_string(),
            format!(
                "Hi {},\n\n\
                 Thank you for contacting Precious Coffer. \
                 We have received your message and will get back to you shortly.\n\n\
                 Regards,\n\
                 Precious Coffer Team",
                self.name
            ),
        )
    }
}
