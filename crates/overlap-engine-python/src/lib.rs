//! # overlap-engine-python
//!
//! Python bindings for overlap-engine, built with PyO3.
//!
//! Exposes the following functions to Python as the `_native` module:
//!
//! - `find_meeting_times(request_json, ...)` -- batch request JSON -> batch response JSON
//! - `split_into_blocks(slots_json, block_minutes)` -- slot list JSON -> block list JSON

use overlap_engine::{EngineConfig, TimeRange};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Compute common free blocks for every group in a batch request.
///
/// The request is a JSON object with `groups` (a list of lists of participant
/// ID strings) and `availability` (a mapping from ID to a list of
/// `{start, end}` objects, or a whole `{status, result}` fetch response).
///
/// Args:
///     request_json: The batch request as a JSON string.
///     block_minutes: Block size in minutes. Values below 15 are raised to 15.
///     min_duration_minutes: Shortest common run to report. Defaults to one block.
///     horizon_start: Optional ISO 8601 lower bound of the search window.
///     horizon_end: Optional ISO 8601 upper bound of the search window.
///
/// Returns:
///     A JSON string: `{"status": "success", "result": [[{start, end}, ...], ...]}`
///     or `{"status": "error", "result": "<message>"}`. Groups that reference
///     unknown participants come back as empty lists.
///
/// Raises:
///     ValueError: If the response cannot be serialized.
#[pyfunction]
#[pyo3(signature = (request_json, block_minutes=30, min_duration_minutes=None, horizon_start=None, horizon_end=None))]
fn find_meeting_times(
    py: Python<'_>,
    request_json: &str,
    block_minutes: u32,
    min_duration_minutes: Option<u32>,
    horizon_start: Option<String>,
    horizon_end: Option<String>,
) -> PyResult<String> {
    let config = EngineConfig {
        block_minutes,
        min_duration_minutes,
        horizon_start,
        horizon_end,
        workers: None,
    };

    let response = py.allow_threads(|| overlap_engine::find_meeting_times(request_json, &config));

    response
        .to_json()
        .map_err(|e| PyValueError::new_err(format!("Serialization error: {}", e)))
}

/// Cut a list of `{start, end}` slots into consecutive fixed-size blocks.
///
/// Args:
///     slots_json: JSON array of `{start, end}` objects with ISO 8601 strings.
///     block_minutes: Block size in minutes. Values below 15 are raised to 15.
///
/// Returns:
///     A JSON array of `{start, end}` blocks. Remainders shorter than a block are dropped.
///
/// Raises:
///     ValueError: If the JSON is malformed or a slot's start is not before its end.
#[pyfunction]
#[pyo3(signature = (slots_json, block_minutes=30))]
fn split_into_blocks(slots_json: &str, block_minutes: u32) -> PyResult<String> {
    let slots: Vec<TimeRange> = serde_json::from_str(slots_json)
        .map_err(|e| PyValueError::new_err(format!("Invalid slots JSON: {}", e)))?;
    let block = EngineConfig::with_block_minutes(block_minutes).effective_block_minutes();

    let blocks = overlap_engine::split_into_blocks(&slots, block);

    serde_json::to_string(&blocks)
        .map_err(|e| PyValueError::new_err(format!("Serialization error: {}", e)))
}

/// The native extension module.
#[pymodule]
fn _native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(find_meeting_times, m)?)?;
    m.add_function(wrap_pyfunction!(split_into_blocks, m)?)?;
    Ok(())
}
