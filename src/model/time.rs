use chrono::{DateTime, Utc};
use std::fmt::Debug;

/// A point on the timeline's time axis.
///
/// A timeline instance picks one representation through its type parameter:
/// calendar-aware `DateTime<Utc>` or raw epoch milliseconds (`i64`). All
/// mapping math runs on the millisecond value.
pub trait TimePoint: Copy + Ord + Debug + 'static {
    fn to_millis(self) -> i64;
    fn from_millis(ms: i64) -> Self;

    /// Shift by a signed number of milliseconds.
    fn offset_millis(self, delta: i64) -> Self {
        Self::from_millis(self.to_millis().saturating_add(delta))
    }
}

impl TimePoint for i64 {
    fn to_millis(self) -> i64 {
        self
    }

    fn from_millis(ms: i64) -> Self {
        ms
    }
}

impl TimePoint for DateTime<Utc> {
    fn to_millis(self) -> i64 {
        self.timestamp_millis()
    }

    /// Values outside chrono's range saturate to the representable bounds.
    fn from_millis(ms: i64) -> Self {
        DateTime::from_timestamp_millis(ms).unwrap_or(if ms < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
    }
}

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
