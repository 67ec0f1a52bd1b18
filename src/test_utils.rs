//! Test utilities for bistro-forms
//!
//! This module provides mock implementations of the store and clock ports and
//! builders for well-formed submissions.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::models::RawSubmission;
use crate::rate_limit::{Clock, KeyValueStore};

/// Mock key-value store for testing
#[derive(Debug, Clone)]
pub struct MockStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<usize>>,
    fail_next: Arc<Mutex<bool>>,
    error_message: Arc<Mutex<Option<String>>>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    /// Create a new mock store
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
            writes: Arc::new(Mutex::new(0)),
            fail_next: Arc::new(Mutex::new(false)),
            error_message: Arc::new(Mutex::new(None)),
        }
    }

    /// Configure the mock to fail on the next operation
    pub fn fail_next_operation(&self, error_message: &str) {
        *self.fail_next.lock().unwrap() = true;
        *self.error_message.lock().unwrap() = Some(error_message.to_string());
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    /// Snapshot of every stored value
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<()> {
        let mut fail = self.fail_next.lock().unwrap();
        if *fail {
            *fail = false;
            let msg = self
                .error_message
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| "Mock failure".to_string());
            return Err(Error::storage(msg));
        }
        Ok(())
    }
}

impl KeyValueStore for MockStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_failure()?;
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_failure()?;
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

/// Mock clock for testing.
///
/// All clones share the same time, so advancing one advances them all.
#[derive(Debug, Clone)]
pub struct MockClock {
    current_time: Arc<Mutex<DateTime<Utc>>>,
}

impl Default for MockClock {
    /// Starts at midday on 19 October 2026 (UTC)
    fn default() -> Self {
        Self::new(Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap())
    }
}

impl MockClock {
    /// Create a mock clock starting at a specific instant
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current_time: Arc::new(Mutex::new(start)),
        }
    }

    /// Advance the clock by a duration
    pub fn advance(&self, duration: Duration) {
        let step = ChronoDuration::from_std(duration).expect("duration out of range");
        *self.current_time.lock().unwrap() += step;
    }

    /// Set the clock to a specific instant
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.current_time.lock().unwrap() = instant;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current_time.lock().unwrap()
    }
}

/// A contact submission that passes every rule
pub fn valid_contact_submission() -> RawSubmission {
    RawSubmission::new()
        .with("name", "Ana Smith")
        .with("email", "ana@example.com")
        .with("subject", "Private dining")
        .with("message", "Could you host a birthday dinner for twelve people?")
}

/// A booking submission for `date` that passes every other rule
pub fn booking_submission_on(date: NaiveDate) -> RawSubmission {
    RawSubmission::new()
        .with("name", "Ana Smith")
        .with("email", "ana@example.com")
        .with("phone", "07700 900123")
        .with("date", date.format("%Y-%m-%d").to_string())
        .with("time", "19:00")
        .with("guests", "2")
}
