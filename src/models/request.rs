//! Typed form payloads
//!
//! The HTML forms post their inputs under element ids such as `contactName`
//! or `restaurantGuests`. These structs accept that payload (and the short
//! logical names), run a coarse structural check through the validator crate
//! and convert into a [`RawSubmission`] for the pipeline.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::submission::RawSubmission;
use super::validation::{
    validate_date_format, validate_email_format, validate_guest_count, validate_no_spam,
    validate_time_slot, validate_uk_phone_format,
};

/// Contact form payload
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct ContactRequest {
    #[serde(rename = "contactName", alias = "name", default)]
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[serde(rename = "contactEmail", alias = "email", default)]
    #[validate(custom(function = "validate_email_format"))]
    pub email: String,

    #[serde(rename = "contactSubject", alias = "subject", default)]
    #[validate(length(min = 3, max = 200))]
    pub subject: String,

    #[serde(rename = "contactMessage", alias = "message", default)]
    #[validate(length(min = 10, max = 5000), custom(function = "validate_no_spam"))]
    pub message: String,
}

impl From<ContactRequest> for RawSubmission {
    fn from(request: ContactRequest) -> Self {
        RawSubmission::new()
            .with("name", request.name)
            .with("email", request.email)
            .with("subject", request.subject)
            .with("message", request.message)
    }
}

/// Table booking form payload
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct BookingRequest {
    #[serde(rename = "restaurantName", alias = "name", default)]
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[serde(rename = "restaurantEmail", alias = "email", default)]
    #[validate(custom(function = "validate_email_format"))]
    pub email: String,

    #[serde(rename = "restaurantPhone", alias = "phone", default)]
    #[validate(custom(function = "validate_uk_phone_format"))]
    pub phone: String,

    /// Calendar date, `YYYY-MM-DD`
    #[serde(rename = "restaurantDate", alias = "date", default)]
    #[validate(custom(function = "validate_date_format"))]
    pub date: String,

    #[serde(rename = "restaurantTime", alias = "time", default)]
    #[validate(custom(function = "validate_time_slot"))]
    pub time: String,

    #[serde(rename = "restaurantGuests", alias = "guests", default)]
    #[validate(custom(function = "validate_guest_count"))]
    pub guests: String,

    /// Special requests
    #[serde(rename = "restaurantNotes", alias = "notes", default)]
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<BookingRequest> for RawSubmission {
    fn from(request: BookingRequest) -> Self {
        let raw = RawSubmission::new()
            .with("name", request.name)
            .with("email", request.email)
            .with("phone", request.phone)
            .with("date", request.date)
            .with("time", request.time)
            .with("guests", request.guests);

        match request.notes {
            Some(notes) => raw.with("notes", notes),
            None => raw,
        }
    }
}
