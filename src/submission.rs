//! Submission handling for the contact and booking forms
//!
//! [`SubmissionService`] runs one attempt end to end: cooldown check,
//! sanitization, validation, cooldown update and the confirmation message.
//! It never returns an error; every failure becomes a rejected
//! [`SubmissionOutcome`] the UI can render.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::Result;
use crate::logging::{LogMetrics, Timer};
use crate::models::{
    parse_booking_date, FormType, RawSubmission, RejectionReason, SanitizedSubmission,
    SubmissionOutcome,
};
use crate::pipeline;
use crate::rate_limit::{Clock, KeyValueStore, RateLimitDecision, RateLimiter};

/// Message shown when processing fails for reasons the visitor cannot fix
pub const UNEXPECTED_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Validates, sanitizes and rate-limits form submissions
#[derive(Debug, Clone)]
pub struct SubmissionService<S, C> {
    limiter: RateLimiter<S, C>,
}

impl<S: KeyValueStore, C: Clock> SubmissionService<S, C> {
    /// Create a service around a rate limiter
    pub fn new(limiter: RateLimiter<S, C>) -> Self {
        Self { limiter }
    }

    /// The rate limiter used by this service
    pub fn limiter(&self) -> &RateLimiter<S, C> {
        &self.limiter
    }

    /// Check whether `form_type` is currently cooling down
    pub fn check_rate_limit(&self, form_type: FormType) -> Result<RateLimitDecision> {
        self.limiter.check(form_type)
    }

    /// Start the cooldown for `form_type` now
    pub fn set_rate_limit(&self, form_type: FormType) -> Result<()> {
        self.limiter.record(form_type)
    }

    /// Process one submission attempt
    pub fn submit(&self, form_type: FormType, raw: &RawSubmission) -> SubmissionOutcome {
        let submission_id = Uuid::new_v4();
        let span = crate::submission_span!(form_type, submission_id);
        let _enter = span.enter();

        let outcome = match self.process(form_type, raw, submission_id) {
            Ok(outcome) => outcome,
            Err(err) => {
                crate::log_error!(
                    err,
                    "Submission processing failed",
                    form_type = form_type,
                    retryable = err.is_retryable(),
                );
                SubmissionOutcome::Rejected {
                    reason: RejectionReason::UnexpectedFailure,
                    errors: vec![UNEXPECTED_FAILURE_MESSAGE.to_string()],
                }
            },
        };

        span.record("outcome", outcome.label());
        span.record("error_count", outcome.errors().len() as u64);
        LogMetrics::counter(
            "form_submissions_total",
            1,
            &[("form_type", form_type.as_str()), ("outcome", outcome.label())],
        );

        outcome
    }

    fn process(
        &self,
        form_type: FormType,
        raw: &RawSubmission,
        reference: Uuid,
    ) -> Result<SubmissionOutcome> {
        if let RateLimitDecision::Blocked { wait_seconds } = self.limiter.check(form_type)? {
            tracing::info!(wait_seconds, "Submission rejected by rate limiter");
            return Ok(SubmissionOutcome::Rejected {
                reason: RejectionReason::RateLimited { wait_seconds },
                errors: vec![wait_message(wait_seconds)],
            });
        }

        let sanitized = raw.sanitize(form_type.schema());

        let timer = Timer::start("validate_submission");
        let errors = pipeline::validate(form_type, &sanitized, self.limiter.clock().today())?;
        timer.stop();

        if !errors.is_empty() {
            tracing::info!(error_count = errors.len(), "Submission failed validation");
            return Ok(SubmissionOutcome::Rejected {
                reason: RejectionReason::ValidationFailed,
                errors: errors.messages(),
            });
        }

        // Cooldown is recorded only once the confirmation has been built
        let confirmation_message = confirmation_message(form_type, &sanitized)?;
        self.limiter.record(form_type)?;

        tracing::info!(reference = %reference, "Submission accepted");

        Ok(SubmissionOutcome::Accepted {
            reference,
            confirmation_message,
            sanitized_data: sanitized,
        })
    }
}

/// Text shown while a form is cooling down
pub fn wait_message(wait_seconds: u64) -> String {
    let unit = if wait_seconds == 1 { "second" } else { "seconds" };
    format!(
        "Please wait {} {} before submitting again",
        wait_seconds, unit
    )
}

/// Confirmation text for an accepted submission
pub fn confirmation_message(form_type: FormType, data: &SanitizedSubmission) -> Result<String> {
    match form_type {
        FormType::Contact => Ok(format!(
            "Thank you for your message, {}! I will get back to you at {} soon.",
            data.get("name"),
            data.get("email")
        )),
        FormType::Booking => {
            let date = parse_booking_date(data.get("date"))?;
            let guests = data.get("guests");
            Ok(format!(
                "Booking confirmed, {}! Table for {} {} on {} at {}. \
                 A confirmation email has been sent to {} and we will call {} if anything changes.",
                data.get("name"),
                guests,
                guest_noun(guests),
                format_booking_date(date),
                data.get("time"),
                data.get("email"),
                data.get("phone"),
            ))
        },
    }
}

/// "guest" for a party of one, "guests" otherwise
pub fn guest_noun(guests: &str) -> &'static str {
    match guests.trim().parse::<u32>() {
        Ok(count) if count > 1 => "guests",
        Ok(_) => "guest",
        Err(_) => "guests",
    }
}

/// Long British date, e.g. "Monday 19 October 2026"
pub fn format_booking_date(date: NaiveDate) -> String {
    date.format("%A %-d %B %Y").to_string()
}
