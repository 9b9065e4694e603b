//! Block-grid alignment of interval boundaries.
//!
//! Timestamps are snapped to multiples of the block size counted from the top
//! of their hour. Rounding up past minute 60 carries into the following hour
//! (and day). Seconds and sub-seconds are dropped before rounding, so
//! `10:30:30` sits on the `10:30` grid point in both directions.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

use crate::config::Horizon;
use crate::range::TimeRange;

/// Which way to round a timestamp onto the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Round down (used for interval starts).
    Down,
    /// Round up (used for interval ends).
    Up,
}

/// Snap `ts` to the block grid.
///
/// `block_minutes` is taken as given; callers are expected to pass the
/// effective (floored) block size. A zero block size returns the timestamp
/// truncated to the minute.
pub fn align(ts: NaiveDateTime, block_minutes: u32, direction: Direction) -> NaiveDateTime {
    let hour_start = ts.date().and_time(NaiveTime::MIN) + Duration::hours(i64::from(ts.hour()));
    let minute = ts.minute();

    if block_minutes == 0 {
        return hour_start + Duration::minutes(i64::from(minute));
    }

    let floored = (minute / block_minutes) * block_minutes;

    let aligned = match direction {
        Direction::Down => floored,
        Direction::Up if floored == minute => floored,
        Direction::Up => floored + block_minutes,
    };

    hour_start + Duration::minutes(i64::from(aligned))
}

/// Collect the sorted, deduplicated grid points that bound every candidate interval.
///
/// Each range contributes its start rounded down and its end rounded up. The
/// horizon start (rounded down) and end (rounded up) are added when present.
pub fn boundary_points<'a, I>(ranges: I, block_minutes: u32, horizon: &Horizon) -> Vec<NaiveDateTime>
where
    I: IntoIterator<Item = &'a TimeRange>,
{
    let mut points = BTreeSet::new();

    for range in ranges {
        points.insert(align(range.start(), block_minutes, Direction::Down));
        points.insert(align(range.end(), block_minutes, Direction::Up));
    }

    if let Some(start) = horizon.start {
        points.insert(align(start, block_minutes, Direction::Down));
    }
    if let Some(end) = horizon.end {
        points.insert(align(end, block_minutes, Direction::Up));
    }

    points.into_iter().collect()
}
