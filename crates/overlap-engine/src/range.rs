//! Immutable time ranges and their ISO 8601 wire form.
//!
//! All timestamps are naive: every participant's intervals are assumed to be
//! normalized to one zone before they reach the engine, so explicit UTC offsets
//! are rejected rather than silently converted.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Accepted input layouts, tried in order. `%.f` also matches an absent fraction.
const INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Output layout. The fractional part is only printed when non-zero.
const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Date-only layout, read as midnight.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a wire timestamp such as `"2023-10-01T09:00:00"`.
///
/// A bare date (`"2023-10-01"`) is midnight at the start of that day.
///
/// # Errors
/// Returns `EngineError::InvalidTimestamp` if the string matches none of the
/// accepted layouts or carries an explicit UTC offset.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let trimmed = s.trim();
    for format in INPUT_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    if DateTime::parse_from_rfc3339(trimmed).is_ok() {
        return Err(EngineError::InvalidTimestamp(format!(
            "'{}' carries a UTC offset; timestamps must share one implicit zone",
            s
        )));
    }

    Err(EngineError::InvalidTimestamp(format!(
        "'{}' is not an ISO 8601 local datetime (YYYY-MM-DD[THH:MM[:SS]])",
        s
    )))
}

/// Render a timestamp in the wire layout (`2023-10-01T09:00:00`).
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(OUTPUT_FORMAT).to_string()
}

/// The `{start, end}` wire object used on both sides of the batch contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
}

/// A half-open time range `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimeSlot", into = "TimeSlot")]
pub struct TimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeRange {
    /// Build a range from two timestamps.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidRange` if `start >= end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start >= end {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a `{start, end}` pair of wire timestamps.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Whole minutes between start and end, rounded down.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// True when `other` lies entirely inside this range.
    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn to_slot(&self) -> TimeSlot {
        TimeSlot::from(*self)
    }
}

impl TryFrom<TimeSlot> for TimeRange {
    type Error = EngineError;

    fn try_from(slot: TimeSlot) -> Result<Self> {
        Self::parse(&slot.start, &slot.end)
    }
}

impl From<TimeRange> for TimeSlot {
    fn from(range: TimeRange) -> Self {
        TimeSlot {
            start: format_timestamp(&range.start),
            end: format_timestamp(&range.end),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            format_timestamp(&self.start),
            format_timestamp(&self.end)
        )
    }
}
