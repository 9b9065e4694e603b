//! Tests for the `TimeRange` value type and its wire form.

use chrono::{NaiveDate, NaiveDateTime};
use overlap_engine::error::EngineError;
use overlap_engine::range::{format_timestamp, parse_timestamp, TimeRange, TimeSlot};

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 10, 1)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

// ── Construction ────────────────────────────────────────────────────────────

#[test]
fn new_accepts_start_before_end() {
    let range = TimeRange::new(at(9, 0), at(10, 30)).unwrap();
    assert_eq!(range.start(), at(9, 0));
    assert_eq!(range.end(), at(10, 30));
}

#[test]
fn new_rejects_empty_range() {
    let err = TimeRange::new(at(9, 0), at(9, 0)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidRange { .. }));
}

#[test]
fn new_rejects_reversed_range() {
    let err = TimeRange::new(at(11, 0), at(9, 0)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidRange { .. }));
}

// ── Duration ────────────────────────────────────────────────────────────────

#[test]
fn duration_is_whole_minutes() {
    let range = TimeRange::new(at(9, 0), at(10, 30)).unwrap();
    assert_eq!(range.duration_minutes(), 90);
}

#[test]
fn duration_floors_partial_minutes() {
    let range = TimeRange::parse("2023-10-01T09:00:00", "2023-10-01T09:01:59").unwrap();
    assert_eq!(range.duration_minutes(), 1);
}

#[test]
fn contains_requires_full_containment() {
    let outer = TimeRange::new(at(9, 0), at(12, 0)).unwrap();
    assert!(outer.contains(&TimeRange::new(at(9, 0), at(12, 0)).unwrap()));
    assert!(outer.contains(&TimeRange::new(at(10, 0), at(11, 0)).unwrap()));
    assert!(!outer.contains(&TimeRange::new(at(11, 30), at(12, 30)).unwrap()));
    assert!(!outer.contains(&TimeRange::new(at(8, 0), at(13, 0)).unwrap()));
}

// ── Timestamp parsing ───────────────────────────────────────────────────────

#[test]
fn parses_seconds_and_minutes_layouts() {
    assert_eq!(parse_timestamp("2023-10-01T09:30:00").unwrap(), at(9, 30));
    assert_eq!(parse_timestamp("2023-10-01T09:30").unwrap(), at(9, 30));
    assert_eq!(parse_timestamp("2023-10-01 09:30:00").unwrap(), at(9, 30));
}

#[test]
fn bare_date_is_midnight() {
    assert_eq!(parse_timestamp("2023-10-01").unwrap(), at(0, 0));

    let range = TimeRange::parse("2023-10-01", "2023-10-01T09:00").unwrap();
    assert_eq!(range.duration_minutes(), 540);
}

#[test]
fn parses_fractional_seconds() {
    let ts = parse_timestamp("2023-10-01T09:30:00.250").unwrap();
    assert_eq!(format_timestamp(&ts), "2023-10-01T09:30:00.250");
}

#[test]
fn rejects_explicit_offsets() {
    let err = parse_timestamp("2023-10-01T09:30:00+02:00").unwrap_err();
    match err {
        EngineError::InvalidTimestamp(msg) => assert!(msg.contains("UTC offset"), "{}", msg),
        other => panic!("expected InvalidTimestamp, got {:?}", other),
    }
    assert!(parse_timestamp("2023-10-01T09:30:00Z").is_err());
}

#[test]
fn rejects_garbage() {
    assert!(matches!(
        parse_timestamp("next tuesday"),
        Err(EngineError::InvalidTimestamp(_))
    ));
}

// ── Serialization ───────────────────────────────────────────────────────────

#[test]
fn serializes_as_start_end_object() {
    let range = TimeRange::new(at(10, 0), at(10, 30)).unwrap();
    let json = serde_json::to_string(&range).unwrap();
    assert_eq!(
        json,
        r#"{"start":"2023-10-01T10:00:00","end":"2023-10-01T10:30:00"}"#
    );
}

#[test]
fn deserialization_validates_ordering() {
    let bad = r#"{"start":"2023-10-01T11:00:00","end":"2023-10-01T10:00:00"}"#;
    assert!(serde_json::from_str::<TimeRange>(bad).is_err());
}

#[test]
fn slot_conversion_matches_wire_layout() {
    let slot = TimeSlot {
        start: "2023-10-01T14:00".to_string(),
        end: "2023-10-01T15:00".to_string(),
    };
    let range = TimeRange::try_from(slot).unwrap();
    assert_eq!(
        range.to_slot(),
        TimeSlot {
            start: "2023-10-01T14:00:00".to_string(),
            end: "2023-10-01T15:00:00".to_string(),
        }
    );
}

#[test]
fn display_uses_interval_notation() {
    let range = TimeRange::new(at(10, 0), at(10, 30)).unwrap();
    assert_eq!(
        range.to_string(),
        "2023-10-01T10:00:00/2023-10-01T10:30:00"
    );
}
