//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Format used for server-authored event messages (`dd:MM:yyyy HH:mm:ss`).
pub const EVENT_TIME_FORMAT: &str = "%d:%m:%Y %H:%M:%S";

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        now_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render a Unix timestamp (milliseconds) in the given time zone
pub fn format_event_time_in<Tz>(timestamp_millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let utc = DateTime::<Utc>::from_timestamp_millis(timestamp_millis).unwrap_or_default();
    utc.with_timezone(tz).format(EVENT_TIME_FORMAT).to_string()
}

/// Render a Unix timestamp (milliseconds) as local `dd:MM:yyyy HH:mm:ss`
pub fn format_event_time(timestamp_millis: i64) -> String {
    format_event_time_in(timestamp_millis, &Local)
}
