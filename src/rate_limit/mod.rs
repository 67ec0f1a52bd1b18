//! Per-form submission cooldown
//!
//! The limiter remembers when each form type last had a submission accepted
//! and turns away new attempts until the cooldown has passed. State lives in
//! an injected [`KeyValueStore`] and time comes from an injected [`Clock`], so
//! the same limiter runs against a JSON file in production and in-memory
//! doubles in tests.
//!
//! Checking and recording are separate calls and are not atomic: two callers
//! sharing a store can both pass the check inside one window, and the last
//! one to record wins.

pub mod clock;
pub mod store;

pub use clock::SystemClock;
pub use store::{JsonFileStore, MemoryStore};

use chrono::{DateTime, Local, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::config::RateLimitConfig;
use crate::error::Result;
use crate::models::FormType;

/// Default time between accepted submissions of one form
pub const DEFAULT_COOLDOWN_MS: u64 = 30_000;

/// String key-value persistence used for rate-limit timestamps.
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Today's calendar date in the local timezone
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }
}

/// Result of a rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Blocked { wait_seconds: u64 },
}

impl RateLimitDecision {
    /// Check if the submission may proceed
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }
}

/// Cooldown tracker keyed by form type
#[derive(Debug, Clone)]
pub struct RateLimiter<S, C> {
    store: S,
    clock: C,
    cooldown: Duration,
    key_prefix: String,
}

impl<S: KeyValueStore, C: Clock> RateLimiter<S, C> {
    /// Create a limiter with the default cooldown
    pub fn new(store: S, clock: C) -> Self {
        Self::with_config(store, clock, &RateLimitConfig::default())
    }

    /// Create a limiter from configuration
    pub fn with_config(store: S, clock: C, config: &RateLimitConfig) -> Self {
        Self {
            store,
            clock,
            cooldown: config.cooldown(),
            key_prefix: config.key_prefix.clone(),
        }
    }

    /// Cooldown between accepted submissions
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// The clock the limiter reads
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Store key holding the timestamp for a form type
    pub fn key_for(&self, form_type: FormType) -> String {
        format!("{}{}", self.key_prefix, form_type)
    }

    /// Decide whether a submission of `form_type` may proceed now
    pub fn check(&self, form_type: FormType) -> Result<RateLimitDecision> {
        let key = self.key_for(form_type);
        let Some(stored) = self.store.get(&key)? else {
            return Ok(RateLimitDecision::Allowed);
        };

        let now_ms = self.clock.now().timestamp_millis();
        let elapsed_ms = match stored
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|last_submit_ms| now_ms.checked_sub(last_submit_ms))
        {
            Some(ms) => ms.max(0),
            None => {
                tracing::warn!(key = %key, value = %stored, "Ignoring unreadable rate limit timestamp");
                return Ok(RateLimitDecision::Allowed);
            },
        };

        let cooldown_ms = i64::try_from(self.cooldown.as_millis()).unwrap_or(i64::MAX);

        if elapsed_ms >= cooldown_ms {
            return Ok(RateLimitDecision::Allowed);
        }

        let remaining_ms = (cooldown_ms - elapsed_ms) as u64;
        let wait_seconds = remaining_ms.div_ceil(1000);

        tracing::debug!(
            form_type = %form_type,
            elapsed_ms,
            wait_seconds,
            "Submission blocked by cooldown"
        );

        Ok(RateLimitDecision::Blocked { wait_seconds })
    }

    /// Record an accepted submission of `form_type` at the current time
    pub fn record(&self, form_type: FormType) -> Result<()> {
        let now_ms = self.clock.now().timestamp_millis();
        self.store.set(&self.key_for(form_type), &now_ms.to_string())
    }
}
