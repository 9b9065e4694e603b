//! Tests for feasibility, candidate enumeration, run merging, and block splitting.

use overlap_engine::config::{EngineConfig, Grid};
use overlap_engine::feasibility::{is_feasible, participant_is_free};
use overlap_engine::range::TimeRange;
use overlap_engine::solver::{candidate_intervals, find_overlapping_runs, merge_adjacent};
use overlap_engine::splitter::split_into_blocks;

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Build a range on 2023-10-01 from "HH:MM" strings.
fn r(start: &str, end: &str) -> TimeRange {
    TimeRange::parse(
        &format!("2023-10-01T{}:00", start),
        &format!("2023-10-01T{}:00", end),
    )
    .unwrap()
}

fn grid(config: EngineConfig) -> Grid {
    config.grid().unwrap()
}

fn default_grid() -> Grid {
    grid(EngineConfig::default())
}

// ── Feasibility ─────────────────────────────────────────────────────────────

#[test]
fn participant_free_only_on_full_containment() {
    let slots = vec![r("09:00", "12:00"), r("14:00", "17:00")];

    assert!(participant_is_free(&r("09:00", "12:00"), &slots));
    assert!(participant_is_free(&r("15:00", "16:00"), &slots));
    assert!(!participant_is_free(&r("11:30", "12:30"), &slots));
    assert!(!participant_is_free(&r("12:00", "14:00"), &slots));
}

#[test]
fn group_feasible_only_when_everyone_is_free() {
    let a = vec![r("09:00", "12:00")];
    let b = vec![r("10:00", "11:30")];

    assert!(is_feasible(&r("10:00", "11:30"), [a.as_slice(), b.as_slice()]));
    assert!(!is_feasible(&r("09:00", "10:00"), [a.as_slice(), b.as_slice()]));
}

#[test]
fn feasibility_ignores_participant_order() {
    let a = vec![r("09:00", "12:00")];
    let b = vec![r("10:00", "11:30")];
    let c: Vec<TimeRange> = Vec::new();
    let candidate = r("10:00", "10:30");

    let forward = is_feasible(&candidate, [a.as_slice(), b.as_slice(), c.as_slice()]);
    let backward = is_feasible(&candidate, [c.as_slice(), b.as_slice(), a.as_slice()]);

    assert!(!forward);
    assert_eq!(forward, backward);
}

#[test]
fn overlapping_slots_for_one_participant_are_tolerated() {
    let a = vec![r("09:00", "11:00"), r("10:00", "12:00")];
    assert!(participant_is_free(&r("10:30", "11:30"), &a));
    assert!(!participant_is_free(&r("09:00", "12:00"), &a));
}

// ── Candidates ──────────────────────────────────────────────────────────────

#[test]
fn candidates_span_consecutive_boundary_points() {
    let a = vec![r("09:00", "12:00"), r("14:00", "17:00")];
    let b = vec![r("10:00", "11:30"), r("15:00", "16:00")];

    let candidates = candidate_intervals(&[&a, &b], &default_grid());

    let spans: Vec<(TimeRange, bool)> = candidates.iter().map(|c| (c.range, c.feasible)).collect();
    assert_eq!(
        spans,
        vec![
            (r("09:00", "10:00"), false),
            (r("10:00", "11:30"), true),
            (r("11:30", "12:00"), false),
            (r("12:00", "14:00"), false),
            (r("14:00", "15:00"), false),
            (r("15:00", "16:00"), true),
            (r("16:00", "17:00"), false),
        ]
    );
}

#[test]
fn candidates_not_a_multiple_of_the_block_are_dropped() {
    // With 45-minute blocks the grid is :00 and :45 of every hour, so the
    // 10:45-11:00 gap is only 15 minutes long.
    let a = vec![r("10:00", "10:45"), r("11:00", "11:45")];

    let candidates = candidate_intervals(&[&a], &grid(EngineConfig::with_block_minutes(45)));

    let spans: Vec<TimeRange> = candidates.iter().map(|c| c.range).collect();
    assert_eq!(spans, vec![r("10:00", "10:45"), r("11:00", "11:45")]);
    assert!(candidates.iter().all(|c| c.feasible));
}

#[test]
fn candidates_shorter_than_minimum_are_dropped() {
    let a = vec![r("09:00", "10:30"), r("13:00", "13:30")];
    let b = vec![r("08:00", "14:00")];
    let config = EngineConfig {
        min_duration_minutes: Some(60),
        ..EngineConfig::default()
    };

    let candidates = candidate_intervals(&[&a, &b], &grid(config));

    assert!(candidates.iter().all(|c| c.range.duration_minutes() >= 60));
    assert!(!candidates.iter().any(|c| c.range == r("13:00", "13:30")));
}

#[test]
fn candidates_outside_horizon_are_dropped() {
    let a = vec![r("08:00", "12:00")];
    let b = vec![r("08:00", "12:00")];
    let config = EngineConfig {
        horizon_start: Some("2023-10-01T10:00:00".to_string()),
        horizon_end: Some("2023-10-01T11:00:00".to_string()),
        ..EngineConfig::default()
    };

    let candidates = candidate_intervals(&[&a, &b], &grid(config));

    let spans: Vec<TimeRange> = candidates.iter().map(|c| c.range).collect();
    assert_eq!(spans, vec![r("10:00", "11:00")]);
}

// ── Runs ────────────────────────────────────────────────────────────────────

#[test]
fn runs_for_two_participants() {
    let a = vec![r("09:00", "12:00"), r("14:00", "17:00")];
    let b = vec![r("10:00", "11:30"), r("15:00", "16:00")];

    let runs = find_overlapping_runs(&[&a, &b], &default_grid());

    assert_eq!(runs, vec![r("10:00", "11:30"), r("15:00", "16:00")]);
}

#[test]
fn disjoint_participants_have_no_runs() {
    let a = vec![r("09:00", "11:00")];
    let b = vec![r("14:00", "16:00")];

    assert!(find_overlapping_runs(&[&a, &b], &default_grid()).is_empty());
}

#[test]
fn touching_feasible_candidates_merge_into_one_run() {
    let a = vec![r("09:00", "10:00"), r("10:00", "11:00")];
    let b = vec![r("09:00", "11:00")];

    let runs = find_overlapping_runs(&[&a, &b], &default_grid());

    assert_eq!(runs, vec![r("09:00", "11:00")]);
}

#[test]
fn single_participant_runs_are_their_own_slots() {
    let a = vec![r("09:00", "10:00"), r("13:30", "15:00")];

    let runs = find_overlapping_runs(&[&a], &default_grid());

    assert_eq!(runs, a);
}

#[test]
fn participant_without_slots_blocks_everything() {
    let a = vec![r("09:00", "12:00")];
    let b: Vec<TimeRange> = Vec::new();

    assert!(find_overlapping_runs(&[&a, &b], &default_grid()).is_empty());
}

#[test]
fn minimum_duration_filters_short_runs() {
    let a = vec![r("09:00", "10:30"), r("13:00", "13:30")];
    let b = vec![r("08:00", "14:00")];
    let config = EngineConfig {
        min_duration_minutes: Some(60),
        ..EngineConfig::default()
    };

    let runs = find_overlapping_runs(&[&a, &b], &grid(config));

    assert_eq!(runs, vec![r("09:00", "10:30")]);
}

#[test]
fn merge_adjacent_keeps_gaps() {
    let merged = merge_adjacent(vec![
        r("09:00", "09:30"),
        r("09:30", "10:00"),
        r("10:30", "11:00"),
    ]);

    assert_eq!(merged, vec![r("09:00", "10:00"), r("10:30", "11:00")]);
}

// ── Grid rules ──────────────────────────────────────────────────────────────

#[test]
fn block_size_is_raised_to_fifteen_minutes() {
    assert_eq!(EngineConfig::with_block_minutes(10).effective_block_minutes(), 15);
    assert_eq!(EngineConfig::with_block_minutes(0).effective_block_minutes(), 15);
    assert_eq!(EngineConfig::with_block_minutes(60).effective_block_minutes(), 60);
}

#[test]
fn minimum_duration_rounds_up_to_block_multiple() {
    let config = EngineConfig {
        min_duration_minutes: Some(45),
        ..EngineConfig::default()
    };
    assert_eq!(config.effective_min_duration_minutes(), 60);

    let tiny = EngineConfig {
        min_duration_minutes: Some(5),
        ..EngineConfig::default()
    };
    assert_eq!(tiny.effective_min_duration_minutes(), 30);

    assert_eq!(EngineConfig::default().effective_min_duration_minutes(), 30);
}

#[test]
fn oversized_minimum_duration_clamps_to_a_block_multiple() {
    let config = EngineConfig {
        min_duration_minutes: Some(u32::MAX),
        ..EngineConfig::default()
    };
    let min = config.effective_min_duration_minutes();
    assert_eq!(min % 30, 0);
    assert!(min > u32::MAX - 30);

    let three_quarter = EngineConfig {
        block_minutes: 45,
        min_duration_minutes: Some(u32::MAX - 1),
        ..EngineConfig::default()
    };
    let min = three_quarter.effective_min_duration_minutes();
    assert_eq!(min % 45, 0);
    assert!(min >= 45);
}

#[test]
fn oversized_minimum_duration_finds_no_runs() {
    let config = EngineConfig {
        min_duration_minutes: Some(u32::MAX),
        ..EngineConfig::default()
    };
    let a = vec![r("09:00", "17:00")];

    assert!(find_overlapping_runs(&[&a], &grid(config)).is_empty());
}

// ── Splitting ───────────────────────────────────────────────────────────────

#[test]
fn split_cuts_runs_into_fixed_blocks() {
    let blocks = split_into_blocks(&[r("10:00", "11:30"), r("15:00", "16:00")], 30);

    assert_eq!(
        blocks,
        vec![
            r("10:00", "10:30"),
            r("10:30", "11:00"),
            r("11:00", "11:30"),
            r("15:00", "15:30"),
            r("15:30", "16:00"),
        ]
    );
}

#[test]
fn split_drops_trailing_remainder() {
    let blocks = split_into_blocks(&[r("10:00", "11:20")], 30);

    assert_eq!(blocks, vec![r("10:00", "10:30"), r("10:30", "11:00")]);
}

#[test]
fn split_of_run_shorter_than_block_is_empty() {
    assert!(split_into_blocks(&[r("10:00", "10:20")], 30).is_empty());
}

#[test]
fn remainder_is_not_carried_into_the_next_run() {
    let blocks = split_into_blocks(&[r("10:00", "10:45"), r("10:50", "11:20")], 30);

    assert_eq!(blocks, vec![r("10:00", "10:30"), r("10:50", "11:20")]);
}
