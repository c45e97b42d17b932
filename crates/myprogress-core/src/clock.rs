//! # Clock
//!
//! Time is injected into the store so timestamps are reproducible in tests.
//! [`SystemClock`] reads UTC wall time through `chrono`; [`FixedClock`]
//! returns a preset instant.

use crate::Timestamp;
use chrono::{DateTime, SecondsFormat, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant as an RFC 3339 UTC timestamp, millisecond precision.
    fn now(&self) -> Timestamp;

    /// Current calendar date as `YYYY-MM-DD`.
    fn today(&self) -> String {
        self.now().date_part().to_string()
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        format_instant(Utc::now())
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Timestamp,
}

impl FixedClock {
    /// Freeze the clock at `instant`, given as an RFC 3339 string.
    #[must_use]
    pub fn at(instant: impl Into<String>) -> Self {
        Self {
            instant: Timestamp::new(instant),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.instant.clone()
    }
}

/// Render an instant the way exported documents store it.
#[must_use]
pub fn format_instant(instant: DateTime<Utc>) -> Timestamp {
    Timestamp(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}
