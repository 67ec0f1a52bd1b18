//! Submission data models
//!
//! This module defines the shapes a form submission takes on its way through
//! the pipeline: the raw field map from the caller, the sanitized map the
//! validators see, and the outcome handed back to the UI.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::schema::FormSchema;
use crate::sanitize::sanitize_value;

/// Field values exactly as the caller supplied them.
///
/// Values are JSON so a UI can hand over whatever its inputs produced;
/// anything that is not a string sanitizes to an empty value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSubmission {
    fields: BTreeMap<String, Value>,
}

impl RawSubmission {
    /// Create an empty submission
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Get a raw field value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Number of supplied fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no fields were supplied
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sanitize every field the schema declares.
    ///
    /// Missing fields become empty strings; fields the schema does not know
    /// are dropped.
    pub fn sanitize(&self, schema: &FormSchema) -> SanitizedSubmission {
        let fields = schema
            .field_names()
            .map(|name| (name.to_string(), sanitize_value(self.fields.get(name))))
            .collect();

        let dropped = self
            .fields
            .keys()
            .filter(|key| schema.field(key).is_none())
            .count();
        if dropped > 0 {
            tracing::debug!(
                form_type = %schema.form_type,
                dropped,
                "Ignoring fields not declared by the form schema"
            );
        }

        SanitizedSubmission { fields }
    }
}

impl From<Value> for RawSubmission {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self {
                fields: map.into_iter().collect(),
            },
            _ => Self::default(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawSubmission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Sanitized field values, one per schema field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SanitizedSubmission {
    fields: BTreeMap<String, String>,
}

impl SanitizedSubmission {
    /// Field value, or an empty string when the field is absent
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Iterate over field names and values
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if there are no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SanitizedSubmission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Why a submission was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    /// Too soon after the last accepted submission of this form
    RateLimited { wait_seconds: u64 },
    /// One or more field rules were violated
    ValidationFailed,
    /// Processing failed for a reason the visitor cannot fix
    UnexpectedFailure,
}

/// Final result of a submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Accepted {
        /// Identifier of the accepted submission
        reference: Uuid,
        confirmation_message: String,
        sanitized_data: SanitizedSubmission,
    },
    Rejected {
        reason: RejectionReason,
        /// Messages in the order the checks ran
        errors: Vec<String>,
    },
}

impl SubmissionOutcome {
    /// Check if the submission was accepted
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted { .. })
    }

    /// Error messages (empty when accepted)
    pub fn errors(&self) -> &[String] {
        match self {
            SubmissionOutcome::Accepted { .. } => &[],
            SubmissionOutcome::Rejected { errors, .. } => errors.as_slice(),
        }
    }

    /// Rejection reason, if rejected
    pub fn rejection_reason(&self) -> Option<RejectionReason> {
        match self {
            SubmissionOutcome::Accepted { .. } => None,
            SubmissionOutcome::Rejected { reason, .. } => Some(*reason),
        }
    }

    /// Confirmation text, if accepted
    pub fn confirmation_message(&self) -> Option<&str> {
        match self {
            SubmissionOutcome::Accepted {
                confirmation_message,
                ..
            } => Some(confirmation_message.as_str()),
            SubmissionOutcome::Rejected { .. } => None,
        }
    }

    /// Seconds to wait before retrying, if rate limited
    pub fn wait_seconds(&self) -> Option<u64> {
        match self.rejection_reason() {
            Some(RejectionReason::RateLimited { wait_seconds }) => Some(wait_seconds),
            _ => None,
        }
    }

    /// Short label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionOutcome::Accepted { .. } => "accepted",
            SubmissionOutcome::Rejected { reason, .. } => match reason {
                RejectionReason::RateLimited { .. } => "rate_limited",
                RejectionReason::ValidationFailed => "validation_failed",
                RejectionReason::UnexpectedFailure => "unexpected_failure",
            },
        }
    }
}
