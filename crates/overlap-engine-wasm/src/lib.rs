//! WASM bindings for overlap-engine.
//!
//! Exposes batch availability intersection and block splitting to JavaScript
//! via `wasm-bindgen`. All complex types cross the boundary as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p overlap-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/overlap-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/overlap_engine_wasm.wasm
//! ```
//!
//! Groups are evaluated on the calling thread unless the config asks for
//! more than one worker, since `wasm32-unknown-unknown` cannot spawn threads.

use overlap_engine::{EngineConfig, TimeRange};
use wasm_bindgen::prelude::*;

/// Parse an optional engine config JSON object (`{"block_minutes": 30, ...}`).
fn parse_config(config_json: Option<String>) -> Result<EngineConfig, JsValue> {
    let mut config: EngineConfig = match config_json.as_deref() {
        None | Some("") => EngineConfig::default(),
        Some(json) => serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {}", e)))?,
    };
    config.workers.get_or_insert(1);
    Ok(config)
}

/// Compute common free blocks for every group in a batch request.
///
/// `request_json` is `{"groups": [[id, ...], ...], "availability": {id: [{start, end}, ...]}}`.
/// Returns the batch response JSON string, which carries `"status": "error"`
/// rather than throwing when the request itself is malformed.
///
/// # Arguments
/// - `request_json` -- The batch request
/// - `config_json` -- Optional engine config (`block_minutes`, `min_duration_minutes`,
///   `horizon_start`, `horizon_end`, `workers`)
#[wasm_bindgen(js_name = "findMeetingTimes")]
pub fn find_meeting_times(request_json: &str, config_json: Option<String>) -> Result<String, JsValue> {
    let config = parse_config(config_json)?;

    overlap_engine::find_meeting_times(request_json, &config)
        .to_json()
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Cut a JSON array of `{start, end}` slots into consecutive fixed-size blocks.
///
/// Block sizes below 15 minutes are raised to 15. Remainders shorter than a
/// block are dropped.
#[wasm_bindgen(js_name = "splitIntoBlocks")]
pub fn split_into_blocks(slots_json: &str, block_minutes: u32) -> Result<String, JsValue> {
    let slots: Vec<TimeRange> = serde_json::from_str(slots_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid slots JSON: {}", e)))?;
    let block = EngineConfig::with_block_minutes(block_minutes).effective_block_minutes();

    let blocks = overlap_engine::split_into_blocks(&slots, block);

    serde_json::to_string(&blocks)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
