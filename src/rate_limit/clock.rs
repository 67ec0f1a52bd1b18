//! Clock adapters for time operations.
//!
//! See `MockClock` (in `crate::test_utils`) for a controllable test clock.

use chrono::{DateTime, Utc};

use super::Clock;

/// System clock implementation using `Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
