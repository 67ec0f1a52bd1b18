//! Validation error types for form submissions
//!
//! This module defines error types specifically for field validation,
//! separate from the crate-level errors. A rule violation carries the
//! human-readable message shown next to the form.

use std::fmt;
use thiserror::Error;

/// One violated field rule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The kind of validation error
    pub kind: ValidationErrorKind,
    /// The field that failed validation
    pub field: String,
    /// Message rendered to the visitor
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(
        kind: ValidationErrorKind,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Specific validation error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Field is required but missing
    #[error("Required field is missing")]
    RequiredField,

    /// Field value is too short
    #[error("Value is below minimum length")]
    TooShort { min: usize },

    /// Field value is too long
    #[error("Value exceeds maximum length")]
    TooLong { max: usize },

    /// Invalid email address
    #[error("Invalid email format")]
    InvalidEmail,

    /// Invalid UK phone number
    #[error("Invalid UK phone number")]
    InvalidPhone,

    /// Value outside the allowed choices
    #[error("Value is not one of the allowed choices")]
    NotAllowed,

    /// Date before today
    #[error("Date is in the past")]
    DateInPast,

    /// Date beyond the booking window
    #[error("Date is too far in the future")]
    DateTooFar { months: u32 },

    /// Blocked term found in free text
    #[error("Prohibited content")]
    ProhibitedContent,
}

/// Ordered collection of validation errors
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation error to the collection
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Append every error from another collection, keeping order
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Messages in the order the rules were checked
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "No validation errors")
        } else {
            write!(f, "Validation failed with {} error(s):", self.errors.len())?;
            for error in &self.errors {
                write!(f, "\n  - {}: {}", error.field, error)?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.add(error);
        errors
    }
}

impl From<ValidationErrors> for crate::error::Error {
    fn from(err: ValidationErrors) -> Self {
        crate::error::Error::validation(err.to_string())
    }
}
