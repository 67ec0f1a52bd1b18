//! Schema-driven form validation
//!
//! Runs every rule of every declared field against a sanitized submission and
//! collects all violations. Nothing short-circuits: fields are checked in
//! declaration order and each field's rules in the order they are declared.

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::schema::{FieldSpec, FormType, Rule};
use crate::models::validation::{
    check_date_window, find_blocked_term, is_allowed, is_valid_email, is_valid_uk_phone,
    meets_min_length, parse_booking_date, within_max_length, DateWindowCheck,
};
use crate::models::{SanitizedSubmission, ValidationError, ValidationErrorKind, ValidationErrors};

/// Validate a sanitized submission against the schema of `form_type`.
///
/// Returns the ordered violations (empty when valid). Fails only when a value
/// cannot be interpreted at all, such as a date that does not parse.
pub fn validate(
    form_type: FormType,
    submission: &SanitizedSubmission,
    today: NaiveDate,
) -> Result<ValidationErrors> {
    let schema = form_type.schema();
    let mut errors = ValidationErrors::new();

    for field in &schema.fields {
        errors.extend(validate_field(field, submission.get(field.name), today)?);
    }

    tracing::debug!(
        form_type = %form_type,
        error_count = errors.len(),
        "Validation finished"
    );

    Ok(errors)
}

/// Same as [`validate`], returning only the messages
pub fn validate_messages(
    form_type: FormType,
    submission: &SanitizedSubmission,
    today: NaiveDate,
) -> Result<Vec<String>> {
    validate(form_type, submission, today).map(|errors| errors.messages())
}

/// Run one field's rules
pub fn validate_field(field: &FieldSpec, value: &str, today: NaiveDate) -> Result<ValidationErrors> {
    let mut errors = ValidationErrors::new();

    // Optional and left blank: nothing to check
    if !field.required && value.is_empty() {
        return Ok(errors);
    }

    for rule in &field.rules {
        if let Some((kind, message)) = check_rule(rule, value, today)? {
            errors.add(ValidationError::new(kind, field.name, message));
        }
    }

    Ok(errors)
}

fn check_rule(
    rule: &Rule,
    value: &str,
    today: NaiveDate,
) -> Result<Option<(ValidationErrorKind, &'static str)>> {
    let present = !value.is_empty();

    let violation = match rule {
        Rule::MinLength { min, message } => (!meets_min_length(value, *min))
            .then_some((ValidationErrorKind::TooShort { min: *min }, *message)),
        Rule::MaxLength { max, message } => (present && !within_max_length(value, *max))
            .then_some((ValidationErrorKind::TooLong { max: *max }, *message)),
        Rule::Email { message } => (!present || !is_valid_email(value))
            .then_some((ValidationErrorKind::InvalidEmail, *message)),
        Rule::UkPhone { message } => (!present || !is_valid_uk_phone(value))
            .then_some((ValidationErrorKind::InvalidPhone, *message)),
        Rule::OneOf { allowed, message } => (!present || !is_allowed(value, allowed))
            .then_some((ValidationErrorKind::NotAllowed, *message)),
        Rule::Blocklist { terms, message } => find_blocked_term(value, terms)
            .map(|_| (ValidationErrorKind::ProhibitedContent, *message)),
        Rule::DateWindow {
            max_months_ahead,
            missing,
            past,
            too_far,
        } => {
            if !present {
                Some((ValidationErrorKind::RequiredField, *missing))
            } else {
                let date = parse_booking_date(value)?;
                match check_date_window(date, today, *max_months_ahead) {
                    DateWindowCheck::InRange => None,
                    DateWindowCheck::Past => Some((ValidationErrorKind::DateInPast, *past)),
                    DateWindowCheck::TooFar => Some((
                        ValidationErrorKind::DateTooFar {
                            months: *max_months_ahead,
                        },
                        *too_far,
                    )),
                }
            }
        },
    };

    Ok(violation)
}
