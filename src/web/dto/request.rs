//! Request DTOs for Web API.
//!
//! Fields are optional at the serde level so that an absent field and an
//! empty one both end up as a validation failure rather than a JSON error.

use serde::Deserialize;
use validator::Validate;

use crate::upload::ReceivedForm;

/// Contact form submission.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    /// Sender name.
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    /// Sender email, used as Reply-To.
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    /// Message text.
    #[validate(required, length(min = 1))]
    pub message: Option<String>,
}

/// A validated contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactRequest {
    /// Convert into a submission. Call after validation.
    pub fn into_submission(self) -> ContactSubmission {
        ContactSubmission {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
        }
    }
}

/// Scalar fields of a job application.
#[derive(Debug, Default, Validate)]
pub struct ApplicationRequest {
    /// Applicant name.
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    /// Applicant email, used as Reply-To.
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    /// Applicant phone number.
    #[validate(required, length(min = 1))]
    pub phone: Option<String>,
    /// Position applied for (`jobTitle` on the form).
    #[validate(required, length(min = 1))]
    pub job_title: Option<String>,
}

/// A validated job application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobApplication {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub job_title: String,
}

impl ApplicationRequest {
    /// Read the scalar fields from a received multipart form.
    pub fn from_form(form: &ReceivedForm) -> Self {
        let field = |name: &str| form.text(name).map(str::to_string);
        Self {
            name: field("name"),
            email: field("email"),
            phone: field("phone"),
            job_title: field("jobTitle"),
        }
    }

    /// Convert into an application. Call after validation.
    pub fn into_application(self) -> JobApplication {
        JobApplication {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            job_title: self.job_title.unwrap_or_default(),
        }
    }
}
