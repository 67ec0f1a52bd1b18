//! Data models for bistro-forms
//!
//! This module contains the form schemas, the submission shapes that flow
//! through the pipeline, the validation error model and the field validators.

pub mod error;
pub mod request;
pub mod schema;
pub mod submission;
pub mod validation;

// Re-export commonly used types
pub use error::{ValidationError, ValidationErrorKind, ValidationErrors};
pub use request::{BookingRequest, ContactRequest};
pub use schema::{FieldSpec, FormSchema, FormType, Rule};
pub use submission::{RawSubmission, RejectionReason, SanitizedSubmission, SubmissionOutcome};
pub use validation::{is_valid_email, is_valid_uk_phone, parse_booking_date};
