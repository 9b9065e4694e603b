//! JSON shapes of the batch contract and the companion availability fetch.
//!
//! Requests are checked structurally before anything is computed: a grouping
//! that is not a list of lists of participant IDs, or an availability mapping
//! that is not an object of `{start, end}` lists, aborts the whole batch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EngineError, Result};
use crate::range::{TimeRange, TimeSlot};

/// Participant ID to that participant's availability slots.
pub type ParticipantAvailability = BTreeMap<String, Vec<TimeRange>>;

/// One group of participant IDs that must all be free at once.
pub type Group = Vec<String>;

/// A parsed, validated batch request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub groups: Vec<Group>,
    pub availability: ParticipantAvailability,
}

/// Batch outcome as seen on the wire.
///
/// Serializes as `{"status": "success", "result": [[{start, end}, ...], ...]}`
/// or `{"status": "error", "result": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "lowercase")]
pub enum BatchResponse {
    Success(Vec<Vec<TimeRange>>),
    Error(String),
}

impl BatchResponse {
    pub fn from_result(result: Result<Vec<Vec<TimeRange>>>) -> Self {
        match result {
            Ok(blocks) => BatchResponse::Success(blocks),
            Err(e) => BatchResponse::Error(e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchResponse::Success(_))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Output of the external availability-fetch collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "lowercase")]
pub enum FetchResponse {
    Success(ParticipantAvailability),
    Error(String),
}

impl FetchResponse {
    /// Unwrap the mapping, turning a fetch error into `EngineError::AvailabilityFetch`.
    pub fn into_availability(self) -> Result<ParticipantAvailability> {
        match self {
            FetchResponse::Success(availability) => Ok(availability),
            FetchResponse::Error(message) => Err(EngineError::AvailabilityFetch(message)),
        }
    }
}

/// Parse and validate a batch request.
///
/// Expected shape:
///
/// ```json
/// {
///   "groups": [["123", "456"], ["789"]],
///   "availability": {"123": [{"start": "2023-10-01T09:00:00", "end": "2023-10-01T12:00:00"}]}
/// }
/// ```
///
/// `availability` may also be a whole fetch envelope
/// (`{"status": "success", "result": {...}}`).
///
/// # Errors
/// - `EngineError::MalformedBatch` for any structural problem.
/// - `EngineError::AvailabilityFetch` if the envelope reports an error.
/// - `EngineError::InvalidTimestamp` / `EngineError::InvalidRange` for a bad slot.
pub fn parse_request(json: &str) -> Result<BatchRequest> {
    let root: Value = serde_json::from_str(json)
        .map_err(|e| EngineError::MalformedBatch(format!("request is not valid JSON: {}", e)))?;

    let object = root
        .as_object()
        .ok_or_else(|| malformed("request must be a JSON object"))?;

    let groups = parse_groups(object.get("groups"))?;
    let availability = match object.get("availability") {
        Some(value) => parse_availability_source(value)?,
        None => return Err(malformed("missing 'availability'")),
    };

    Ok(BatchRequest {
        groups,
        availability,
    })
}

/// Parse the availability mapping on its own, bare or wrapped in a fetch envelope.
pub fn parse_availability(json: &str) -> Result<ParticipantAvailability> {
    let value: Value = serde_json::from_str(json).map_err(|e| {
        EngineError::MalformedBatch(format!("availability is not valid JSON: {}", e))
    })?;
    parse_availability_source(&value)
}

fn parse_groups(value: Option<&Value>) -> Result<Vec<Group>> {
    let outer = value
        .ok_or_else(|| malformed("missing 'groups'"))?
        .as_array()
        .ok_or_else(|| malformed("'groups' must be a list of lists of participant IDs"))?;

    outer
        .iter()
        .enumerate()
        .map(|(g, group)| {
            let members = group
                .as_array()
                .ok_or_else(|| malformed(format!("groups[{}] must be a list", g)))?;
            members
                .iter()
                .enumerate()
                .map(|(m, id)| match id.as_str() {
                    Some(id) if !id.is_empty() => Ok(id.to_string()),
                    Some(_) => Err(malformed(format!("groups[{}][{}] is an empty ID", g, m))),
                    None => Err(malformed(format!("groups[{}][{}] must be a string", g, m))),
                })
                .collect::<Result<Group>>()
        })
        .collect()
}

fn parse_availability_source(value: &Value) -> Result<ParticipantAvailability> {
    let object = value
        .as_object()
        .ok_or_else(|| malformed("'availability' must be an object"))?;

    match object.get("status").and_then(Value::as_str) {
        Some("success") => match object.get("result") {
            Some(Value::Object(mapping)) => parse_mapping(mapping),
            _ => Err(malformed("fetch envelope 'result' must be an object")),
        },
        Some("error") => {
            let message = match object.get("result") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => "no message".to_string(),
            };
            Err(EngineError::AvailabilityFetch(message))
        }
        _ => parse_mapping(object),
    }
}

fn parse_mapping(mapping: &Map<String, Value>) -> Result<ParticipantAvailability> {
    let mut availability = ParticipantAvailability::new();

    for (id, slots) in mapping {
        if id.is_empty() {
            return Err(malformed("availability has an empty participant ID"));
        }
        let wire: Vec<TimeSlot> = serde_json::from_value(slots.clone()).map_err(|e| {
            malformed(format!(
                "availability['{}'] must be a list of {{start, end}} objects: {}",
                id, e
            ))
        })?;
        let ranges = wire
            .into_iter()
            .map(TimeRange::try_from)
            .collect::<Result<Vec<_>>>()?;
        availability.insert(id.clone(), ranges);
    }

    Ok(availability)
}

fn malformed(message: impl Into<String>) -> EngineError {
    EngineError::MalformedBatch(message.into())
}
