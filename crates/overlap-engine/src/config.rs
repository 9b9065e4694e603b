//! Engine configuration: block grid, minimum run length, search horizon, workers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::range::{format_timestamp, parse_timestamp};

/// Block size used when none is configured.
pub const DEFAULT_BLOCK_MINUTES: u32 = 30;

/// Smallest block size the engine will work with. Smaller requests are raised to this.
pub const MIN_BLOCK_MINUTES: u32 = 15;

/// Tunables for one engine instance.
///
/// Raw values are stored as supplied; the `effective_*` accessors apply the
/// floor and rounding rules, so a config read from a file never fails just
/// because a block size is too small.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Grid granularity in minutes.
    pub block_minutes: u32,
    /// Shortest merged run worth reporting. `None` means one block.
    pub min_duration_minutes: Option<u32>,
    /// Optional lower bound of the search window (wire timestamp).
    pub horizon_start: Option<String>,
    /// Optional upper bound of the search window (wire timestamp).
    pub horizon_end: Option<String>,
    /// Worker threads for batch evaluation. `None` shares rayon's global pool.
    pub workers: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            block_minutes: DEFAULT_BLOCK_MINUTES,
            min_duration_minutes: None,
            horizon_start: None,
            horizon_end: None,
            workers: None,
        }
    }
}

/// Resolved grid parameters handed to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    /// Effective block size (already floored).
    pub block_minutes: u32,
    /// Effective minimum run length (already a block multiple).
    pub min_duration_minutes: u32,
    pub horizon: Horizon,
}

/// Parsed, optional search window bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Horizon {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl EngineConfig {
    pub fn with_block_minutes(block_minutes: u32) -> Self {
        Self {
            block_minutes,
            ..Self::default()
        }
    }

    /// Block size after raising it to [`MIN_BLOCK_MINUTES`].
    pub fn effective_block_minutes(&self) -> u32 {
        self.block_minutes.max(MIN_BLOCK_MINUTES)
    }

    /// Minimum run length rounded up to a whole number of blocks, never below one block.
    ///
    /// Values too large to round up are clamped to the largest block multiple
    /// that fits in a `u32`.
    pub fn effective_min_duration_minutes(&self) -> u32 {
        let block = self.effective_block_minutes();
        let requested = self.min_duration_minutes.unwrap_or(block);
        requested
            .div_ceil(block)
            .max(1)
            .checked_mul(block)
            .unwrap_or((u32::MAX / block) * block)
    }

    /// Parse the horizon bounds.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidTimestamp` for an unparseable bound and
    /// `EngineError::InvalidConfig` when both bounds are set and start is not before end.
    pub fn horizon(&self) -> Result<Horizon> {
        let start = self
            .horizon_start
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;
        let end = self
            .horizon_end
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;

        if let (Some(s), Some(e)) = (start, end) {
            if s >= e {
                return Err(EngineError::InvalidConfig(format!(
                    "horizon start {} is not before horizon end {}",
                    format_timestamp(&s),
                    format_timestamp(&e)
                )));
            }
        }

        Ok(Horizon { start, end })
    }

    /// Resolve the effective grid parameters for the solver.
    pub fn grid(&self) -> Result<Grid> {
        Ok(Grid {
            block_minutes: self.effective_block_minutes(),
            min_duration_minutes: self.effective_min_duration_minutes(),
            horizon: self.horizon()?,
        })
    }

    /// Check every field that can be wrong independently of any request.
    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(EngineError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        self.horizon().map(|_| ())
    }
}
