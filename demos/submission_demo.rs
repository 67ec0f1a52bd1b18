//! Demonstration of the contact and booking submission pipeline
//!
//! Run with: cargo run --example submission_demo
//!
//! Reads configuration from the environment (or `.env`), so
//! `STORAGE_BACKEND=memory` keeps the demo from writing a state file.

use bistro_forms::logging::init_tracing;
use bistro_forms::{
    BookingRequest, Clock, Config, FormType, RateLimiter, RawSubmission, SubmissionOutcome,
    SubmissionService, SystemClock,
};
use chrono::Duration;
use serde_json::json;
use validator::Validate;

fn main() -> bistro_forms::Result<()> {
    let config = Config::from_env()?;
    config.validate()?;

    init_tracing(&config.logging.log_level, &config.logging.environment)?;
    config.log_config();

    let store = config.storage.open()?;
    let clock = SystemClock::new();
    let limiter = RateLimiter::with_config(store, clock, &config.rate_limit);
    let service = SubmissionService::new(limiter);

    println!("=== bistro-forms submission demo ===\n");

    // Demo 1: contact form with several problems at once
    let raw = RawSubmission::from(json!({
        "name": "Jo",
        "email": "bad",
        "subject": "Hi",
        "message": "short"
    }));
    show("Contact form with mistakes", &service.submit(FormType::Contact, &raw));

    // Demo 2: contact form that passes
    let raw = RawSubmission::from(json!({
        "name": "<b>Ana Smith</b>",
        "email": "ana@example.com",
        "subject": "Private dining",
        "message": "Could you host a birthday dinner for twelve people?"
    }));
    show("Contact form", &service.submit(FormType::Contact, &raw));

    // Demo 3: the same form again straight away
    show("Contact form resent", &service.submit(FormType::Contact, &raw));

    // Demo 4: booking posted with the HTML element ids
    let next_week = clock.today() + Duration::days(7);
    let request: BookingRequest = serde_json::from_value(json!({
        "restaurantName": "Ana Smith",
        "restaurantEmail": "ana@example.com",
        "restaurantPhone": "07700 900123",
        "restaurantDate": next_week.format("%Y-%m-%d").to_string(),
        "restaurantTime": "19:00",
        "restaurantGuests": "4",
        "restaurantNotes": "Window table if possible"
    }))?;
    if let Err(errors) = request.validate() {
        println!("Request pre-check failed: {}", errors);
    }
    show(
        "Table booking",
        &service.submit(FormType::Booking, &RawSubmission::from(request)),
    );

    Ok(())
}

fn show(title: &str, outcome: &SubmissionOutcome) {
    println!("--- {} ---", title);
    match serde_json::to_string_pretty(outcome) {
        Ok(json) => println!("{}\n", json),
        Err(e) => println!("could not render outcome: {}\n", e),
    }
}
