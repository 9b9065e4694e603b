//! # overlap-engine
//!
//! Deterministic group availability intersection for scheduling agents.
//!
//! Given groups of participants and each participant's free intervals, the
//! engine finds every window in which the whole group is free at once, aligned
//! to a block grid, and hands those windows back as fixed-size blocks. It is a
//! pure computation: no calendar access, no timezone conversion, no state kept
//! between calls.
//!
//! ## Quick start
//!
//! ```rust
//! use overlap_engine::{find_meeting_times, BatchResponse, EngineConfig};
//!
//! let request = r#"{
//!     "groups": [["123", "456"]],
//!     "availability": {
//!         "123": [{"start": "2023-10-01T09:00:00", "end": "2023-10-01T12:00:00"}],
//!         "456": [{"start": "2023-10-01T10:00:00", "end": "2023-10-01T11:00:00"}]
//!     }
//! }"#;
//!
//! let response = find_meeting_times(request, &EngineConfig::default());
//! let BatchResponse::Success(groups) = response else { panic!("batch failed") };
//! assert_eq!(groups[0].len(), 2); // 10:00-10:30, 10:30-11:00
//! ```
//!
//! ## Modules
//!
//! - [`range`] — `TimeRange` value type and ISO 8601 wire form
//! - [`align`] — Block-grid rounding and boundary point collection
//! - [`feasibility`] — Group-wide containment check for one candidate
//! - [`solver`] — Candidate sweep, selection, and run merging
//! - [`splitter`] — Runs → fixed-size blocks
//! - [`batch`] — Per-group verification and parallel batch execution
//! - [`wire`] — Request/response JSON shapes
//! - [`config`] — Engine configuration
//! - [`error`] — Error types

pub mod align;
pub mod batch;
pub mod config;
pub mod error;
pub mod feasibility;
pub mod range;
pub mod solver;
pub mod splitter;
pub mod wire;

pub use align::{align, boundary_points, Direction};
pub use batch::{find_meeting_times, verify_group, CancelToken, SchedulingEngine, SkipReason};
pub use config::{EngineConfig, Grid, Horizon};
pub use error::EngineError;
pub use feasibility::is_feasible;
pub use range::{TimeRange, TimeSlot};
pub use solver::{candidate_intervals, find_overlapping_runs, Candidate};
pub use splitter::split_into_blocks;
pub use wire::{
    parse_availability, parse_request, BatchRequest, BatchResponse, FetchResponse,
    ParticipantAvailability,
};
