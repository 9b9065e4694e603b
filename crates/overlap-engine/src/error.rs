//! Error types for overlap-engine operations.

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// A range whose start is not strictly before its end.
    #[error("Invalid range: start {start} is not before end {end}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// The batch request is structurally wrong (not a list of groups, etc.).
    #[error("Malformed batch input: {0}")]
    MalformedBatch(String),

    /// The availability fetch envelope carried `"status": "error"`.
    #[error("Availability fetch failed: {0}")]
    AvailabilityFetch(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Batch was cancelled")]
    Cancelled,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
