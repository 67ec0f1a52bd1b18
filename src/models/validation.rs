//! Custom validation functions for form fields
//!
//! This module provides the reusable predicates behind the schema rules
//! (length bounds, email and UK phone formats, choice sets, the booking date
//! window) plus thin wrappers for the validator crate.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

use super::schema::{GUEST_COUNTS, SPAM_KEYWORDS, TIME_SLOTS};
use crate::error::{Error, Result};

// Lazy static regex patterns
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static UK_PHONE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Get or initialize the email regex pattern
fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex pattern")
    })
}

/// Get or initialize the UK phone regex pattern
fn uk_phone_regex() -> &'static Regex {
    UK_PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^(\+44|0)[0-9\s]{10,13}$").expect("Invalid UK phone regex pattern")
    })
}

/// Where a booking date falls relative to the bookable window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindowCheck {
    InRange,
    Past,
    TooFar,
}

/// Length in characters
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Present and at least `min` characters once trimmed
pub fn meets_min_length(value: &str, min: usize) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && char_len(trimmed) >= min
}

/// At most `max` characters
pub fn within_max_length(value: &str, max: usize) -> bool {
    char_len(value) <= max
}

/// Simple `local@domain.tld` check
pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// UK number starting with `+44` or `0`, whitespace ignored
pub fn is_valid_uk_phone(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    uk_phone_regex().is_match(&compact)
}

/// Exact match against one of the allowed values
pub fn is_allowed(value: &str, allowed: &[&str]) -> bool {
    allowed.contains(&value)
}

/// First blocked term found in the text, ignoring case
pub fn find_blocked_term(value: &str, terms: &[&'static str]) -> Option<&'static str> {
    let lowered = value.to_lowercase();
    terms.iter().copied().find(|term| lowered.contains(term))
}

/// Parse a booking date (`YYYY-MM-DD`, or the date part of an RFC3339 timestamp)
pub fn parse_booking_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.date_naive()))
        .map_err(|e| Error::invalid_input(format!("Unparseable date '{}': {}", trimmed, e)))
}

/// Last bookable day: `today` plus whole calendar months.
///
/// A day past the end of the target month rolls over into the next one, so
/// 30 November + 3 months is 2 March (1 March in a leap year).
pub fn latest_bookable_date(today: NaiveDate, months_ahead: u32) -> NaiveDate {
    let overflow_days = Days::new(u64::from(today.day0()));
    today
        .with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(months_ahead)))
        .and_then(|first| first.checked_add_days(overflow_days))
        .unwrap_or(NaiveDate::MAX)
}

/// Place a date relative to `today ..= today + months_ahead`
pub fn check_date_window(date: NaiveDate, today: NaiveDate, months_ahead: u32) -> DateWindowCheck {
    if date < today {
        DateWindowCheck::Past
    } else if date > latest_bookable_date(today, months_ahead) {
        DateWindowCheck::TooFar
    } else {
        DateWindowCheck::InRange
    }
}

/// Validate email format for validator crate
pub fn validate_email_format(email: &str) -> std::result::Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::new("Invalid email format"))
    }
}

/// Validate UK phone number for validator crate
pub fn validate_uk_phone_format(phone: &str) -> std::result::Result<(), ValidationError> {
    if is_valid_uk_phone(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("Invalid UK phone number"))
    }
}

/// Validate booking date format for validator crate
pub fn validate_date_format(date: &str) -> std::result::Result<(), ValidationError> {
    match parse_booking_date(date) {
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::new("Invalid date, expected YYYY-MM-DD")),
    }
}

/// Validate time slot for validator crate
pub fn validate_time_slot(time: &str) -> std::result::Result<(), ValidationError> {
    if is_allowed(time, TIME_SLOTS) {
        Ok(())
    } else {
        Err(ValidationError::new("Unknown time slot"))
    }
}

/// Validate party size for validator crate
pub fn validate_guest_count(guests: &str) -> std::result::Result<(), ValidationError> {
    if is_allowed(guests, GUEST_COUNTS) {
        Ok(())
    } else {
        Err(ValidationError::new("Guests must be between 1 and 8"))
    }
}

/// Reject spam keywords for validator crate
pub fn validate_no_spam(message: &str) -> std::result::Result<(), ValidationError> {
    match find_blocked_term(message, SPAM_KEYWORDS) {
        Some(_) => Err(ValidationError::new("Prohibited content")),
        None => Ok(()),
    }
}
