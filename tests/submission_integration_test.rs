//! Integration tests for the submission pipeline
//!
//! These tests drive whole submissions through the public API: raw JSON in,
//! outcome out, with the rate limiter running against in-memory doubles.

use std::time::Duration;

use bistro_forms::sanitize::contains_markup;
use bistro_forms::test_utils::{booking_submission_on, valid_contact_submission};
use bistro_forms::{
    sanitize, validate_messages, Clock, ContactRequest, FormType, MockClock, MockStore,
    RateLimiter, RawSubmission, RejectionReason, SanitizedSubmission, SubmissionOutcome,
    SubmissionService,
};
use chrono::{Months, NaiveDate};
use serde_json::json;

fn service() -> (SubmissionService<MockStore, MockClock>, MockStore, MockClock) {
    let store = MockStore::new();
    let clock = MockClock::default();
    let limiter = RateLimiter::new(store.clone(), clock.clone());
    (SubmissionService::new(limiter), store, clock)
}

#[test]
fn test_contact_form_reports_all_mistakes() {
    let (service, _, _) = service();
    let raw = RawSubmission::from(json!({
        "name": "Jo",
        "email": "bad",
        "subject": "Hi",
        "message": "short"
    }));

    let outcome = service.submit(FormType::Contact, &raw);

    assert_eq!(outcome.rejection_reason(), Some(RejectionReason::ValidationFailed));
    assert_eq!(
        outcome.errors(),
        [
            "Please provide a valid email address",
            "Subject must be at least 3 characters long",
            "Message must be at least 10 characters long",
        ]
    );
}

#[test]
fn test_booking_for_today_is_accepted() {
    let (service, _, clock) = service();
    let raw = booking_submission_on(clock.today()).with("time", "12:00");

    let outcome = service.submit(FormType::Booking, &raw);

    assert!(outcome.is_accepted(), "{:?}", outcome);
    assert!(outcome.errors().is_empty());
}

#[test]
fn test_booking_four_months_ahead_is_rejected() {
    let (service, _, clock) = service();
    let date = clock.today().checked_add_months(Months::new(4)).unwrap();

    let outcome = service.submit(FormType::Booking, &booking_submission_on(date));

    assert_eq!(
        outcome.errors(),
        ["Bookings can only be made up to 3 months in advance"]
    );
}

#[test]
fn test_booking_in_the_past_is_rejected() {
    let (service, _, clock) = service();
    let yesterday = clock.today().pred_opt().unwrap();

    let outcome = service.submit(FormType::Booking, &booking_submission_on(yesterday));

    assert_eq!(outcome.errors(), ["Booking date cannot be in the past"]);
}

#[test]
fn test_second_booking_within_cooldown_is_rate_limited() {
    let (service, _, clock) = service();
    let raw = booking_submission_on(clock.today());

    assert!(service.submit(FormType::Booking, &raw).is_accepted());

    clock.advance(Duration::from_secs(5));
    let outcome = service.submit(FormType::Booking, &raw);

    let wait = outcome.wait_seconds().expect("second booking should be rate limited");
    assert!((1..=30).contains(&wait), "wait was {}", wait);
    assert_eq!(outcome.errors().len(), 1);
}

#[test]
fn test_cooldown_is_per_form_type() {
    let (service, _, clock) = service();

    assert!(service.submit(FormType::Booking, &booking_submission_on(clock.today())).is_accepted());
    assert!(service.submit(FormType::Contact, &valid_contact_submission()).is_accepted());
}

#[test]
fn test_rejected_attempts_do_not_extend_cooldown() {
    let (service, store, clock) = service();
    assert!(service.submit(FormType::Contact, &valid_contact_submission()).is_accepted());
    let recorded = store.snapshot()["lastSubmit_contact"].clone();

    clock.advance(Duration::from_secs(20));
    assert!(!service.submit(FormType::Contact, &valid_contact_submission()).is_accepted());
    assert_eq!(store.snapshot()["lastSubmit_contact"], recorded);

    clock.advance(Duration::from_secs(10));
    assert!(service.submit(FormType::Contact, &valid_contact_submission()).is_accepted());
}

#[test]
fn test_spam_rejected_regardless_of_case() {
    let (service, _, _) = service();

    for message in ["WIN THE LOTTERY NOW", "win the lottery now", "Win The Lottery Now"] {
        let raw = valid_contact_submission().with("message", message);
        let outcome = service.submit(FormType::Contact, &raw);
        assert_eq!(outcome.errors(), ["Message contains prohibited content"]);
    }
}

#[test]
fn test_markup_is_stripped_before_validation() {
    let (service, _, _) = service();
    let raw = valid_contact_submission().with("name", "<img src=x onerror=alert(1)>");

    let outcome = service.submit(FormType::Contact, &raw);

    assert_eq!(outcome.errors(), ["Name must be at least 2 characters long"]);
}

#[test]
fn test_accepted_outcome_serializes_for_the_ui() {
    let (service, _, _) = service();
    let outcome = service.submit(FormType::Contact, &valid_contact_submission());

    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["status"], "accepted");
    assert_eq!(value["sanitized_data"]["email"], "ana@example.com");
    assert!(value["reference"].is_string());

    let round_trip: SubmissionOutcome = serde_json::from_value(value).unwrap();
    assert_eq!(round_trip, outcome);
}

#[test]
fn test_typed_request_feeds_the_pipeline() {
    let (service, _, _) = service();
    let request: ContactRequest = serde_json::from_value(json!({
        "contactName": "Ana Smith",
        "contactEmail": "ana@example.com",
        "contactSubject": "Allergies",
        "contactMessage": "Is the risotto suitable for coeliacs?"
    }))
    .unwrap();

    let outcome = service.submit(FormType::Contact, &RawSubmission::from(request));
    assert!(outcome.is_accepted());
}

#[test]
fn test_store_outage_becomes_generic_failure() {
    let (service, store, _) = service();
    store.fail_next_operation("connection reset");

    let outcome = service.submit(FormType::Contact, &valid_contact_submission());

    assert_eq!(outcome.rejection_reason(), Some(RejectionReason::UnexpectedFailure));
    assert_eq!(
        outcome.errors(),
        ["An unexpected error occurred. Please try again later."]
    );
}

#[test]
fn test_sanitize_output_never_carries_markup() {
    let inputs = [
        "<script>alert('x')</script>",
        "<<script>script>alert(1)<</script>/script>",
        "javajavascript:script:alert(1)",
        "<a href=\"JaVaScRiPt:void(0)\" onClick=go()>x</a>",
        "oonmouseover=nmouseover=steal()",
        "Table for 4 at 7pm, please",
    ];

    for input in inputs {
        let once = sanitize(Some(input));
        assert!(!contains_markup(&once), "{:?} -> {:?}", input, once);
        assert_eq!(sanitize(Some(&once)), once, "not idempotent for {:?}", input);
    }
}

#[test]
fn test_validate_is_deterministic_across_calls() {
    let submission: SanitizedSubmission = [
        ("name", "A"),
        ("email", "a@b"),
        ("subject", ""),
        ("message", "prize"),
    ]
    .into_iter()
    .collect();
    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

    let first = validate_messages(FormType::Contact, &submission, today).unwrap();
    for _ in 0..10 {
        assert_eq!(validate_messages(FormType::Contact, &submission, today).unwrap(), first);
    }
    assert_eq!(first.len(), 5);
}
