//! Candidate enumeration, feasibility scan, and run merging.
//!
//! The intended objective is "maximize total minutes during which the whole
//! group is free". Candidates are non-overlapping by construction and each
//! one's feasibility is a hard, independent constraint, so selecting every
//! feasible candidate already attains the optimum. A single linear sweep over
//! the aligned boundary points does the job.

use crate::align::boundary_points;
use crate::config::{Grid, Horizon};
use crate::feasibility::is_feasible;
use crate::range::TimeRange;
use chrono::NaiveDateTime;

/// A grid-aligned candidate window and whether the whole group is free during it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub range: TimeRange,
    pub feasible: bool,
}

/// Enumerate candidate intervals between consecutive boundary points.
///
/// A pair of points is dropped when its span is not a whole number of blocks,
/// is shorter than the minimum run length, or lies entirely outside the horizon.
/// Survivors are tagged with their group feasibility.
pub fn candidate_intervals(participants: &[&[TimeRange]], grid: &Grid) -> Vec<Candidate> {
    let points = boundary_points(
        participants.iter().flat_map(|slots| slots.iter()),
        grid.block_minutes,
        &grid.horizon,
    );

    let block_secs = i64::from(grid.block_minutes) * 60;
    let min_secs = i64::from(grid.min_duration_minutes) * 60;

    points
        .windows(2)
        .filter_map(|pair| {
            let (start, end) = (pair[0], pair[1]);
            let span = (end - start).num_seconds();

            if block_secs == 0 || span % block_secs != 0 || span < min_secs {
                return None;
            }
            if outside_horizon(start, end, &grid.horizon) {
                return None;
            }

            // Points are strictly increasing, so this never fails.
            let range = TimeRange::new(start, end).ok()?;
            let feasible = is_feasible(&range, participants.iter().copied());
            Some(Candidate { range, feasible })
        })
        .collect()
}

/// Maximal windows during which every participant is free, in chronological order.
///
/// Every feasible candidate is selected; touching ones are merged and merged
/// runs shorter than the minimum run length are discarded.
pub fn find_overlapping_runs(participants: &[&[TimeRange]], grid: &Grid) -> Vec<TimeRange> {
    let candidates = candidate_intervals(participants, grid);
    let feasible = candidates.iter().filter(|c| c.feasible).map(|c| c.range);
    let min_minutes = i64::from(grid.min_duration_minutes);

    let runs: Vec<TimeRange> = merge_adjacent(feasible)
        .into_iter()
        .filter(|run| run.duration_minutes() >= min_minutes)
        .collect();

    tracing::debug!(
        candidates = candidates.len(),
        feasible = candidates.iter().filter(|c| c.feasible).count(),
        runs = runs.len(),
        "solved group overlap"
    );

    runs
}

/// Merge chronologically sorted ranges whenever one starts exactly where the previous ends.
///
/// Ranges separated by any gap stay apart.
pub fn merge_adjacent<I>(ranges: I) -> Vec<TimeRange>
where
    I: IntoIterator<Item = TimeRange>,
{
    let mut merged: Vec<TimeRange> = Vec::new();

    for range in ranges {
        if let Some(last) = merged.last_mut() {
            if range.start() == last.end() {
                // start < end holds for both pieces, so the union is valid.
                if let Ok(joined) = TimeRange::new(last.start(), range.end()) {
                    *last = joined;
                    continue;
                }
            }
        }
        merged.push(range);
    }

    merged
}

fn outside_horizon(start: NaiveDateTime, end: NaiveDateTime, horizon: &Horizon) -> bool {
    let before = horizon.start.is_some_and(|h| end <= h);
    let after = horizon.end.is_some_and(|h| start >= h);
    before || after
}
