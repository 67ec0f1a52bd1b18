//! bistro-forms library
//!
//! Validation, sanitization and rate limiting for the contact and table
//! booking forms of a restaurant website. A UI layer hands over the raw field
//! values and renders the [`SubmissionOutcome`] it gets back.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod rate_limit;
pub mod sanitize;
pub mod submission;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export commonly used types at the crate root
pub use config::Config;
pub use error::{Error, Result};

// Re-export model types
pub use models::{
    BookingRequest, ContactRequest, FormSchema, FormType, RawSubmission, RejectionReason,
    SanitizedSubmission, SubmissionOutcome, ValidationError, ValidationErrorKind,
    ValidationErrors,
};

// Re-export pipeline entry points
pub use pipeline::{validate, validate_messages};
pub use rate_limit::{
    Clock, JsonFileStore, KeyValueStore, MemoryStore, RateLimitDecision, RateLimiter, SystemClock,
};
pub use sanitize::sanitize;
pub use submission::SubmissionService;

// Re-export test doubles
#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::{MockClock, MockStore};
