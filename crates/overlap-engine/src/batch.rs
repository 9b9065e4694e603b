//! Batch orchestration: verify each group, solve it, split it, keep the order.
//!
//! Groups are independent pure computations and run in parallel on rayon's
//! global pool, on a dedicated pool when a worker count is configured, or on
//! the calling thread for a single worker. Results are collected by group
//! index, never by completion order.
//!
//! A group that fails verification is *skipped* and reported as an empty
//! list, exactly like a verified group with no common free time. The two
//! cases are only distinguishable in the logs.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::config::{EngineConfig, Grid};
use crate::error::{EngineError, Result};
use crate::range::TimeRange;
use crate::solver::find_overlapping_runs;
use crate::splitter::split_into_blocks;
use crate::wire::{parse_request, BatchRequest, BatchResponse, ParticipantAvailability};

/// Why a group was not computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The group lists no participants.
    EmptyGroup,
    /// A referenced participant has no availability entry.
    MissingParticipant(String),
    /// Fewer distinct entries matched than the group has members (duplicate IDs).
    CountMismatch { expected: usize, matched: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyGroup => write!(f, "group has no participants"),
            SkipReason::MissingParticipant(id) => {
                write!(f, "participant '{}' has no availability entry", id)
            }
            SkipReason::CountMismatch { expected, matched } => write!(
                f,
                "group lists {} participants but {} distinct entries matched",
                expected, matched
            ),
        }
    }
}

/// Terminal state of one group.
#[derive(Debug, Clone, PartialEq)]
enum GroupOutcome {
    Computed(Vec<TimeRange>),
    Skipped(SkipReason),
}

/// Cooperative cancellation flag shared between a caller and a running batch.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Resolve a group's members to their slot lists.
///
/// Slot lists come back ordered by participant ID, so the result does not
/// depend on the order the group was written in.
///
/// # Errors
/// Returns the [`SkipReason`] when the group is empty, references an unknown
/// participant, or repeats an ID.
pub fn verify_group<'a>(
    group: &[String],
    availability: &'a ParticipantAvailability,
) -> std::result::Result<Vec<&'a [TimeRange]>, SkipReason> {
    if group.is_empty() {
        return Err(SkipReason::EmptyGroup);
    }

    let mut matched: BTreeMap<&str, &'a [TimeRange]> = BTreeMap::new();
    for id in group {
        let slots = availability
            .get(id)
            .ok_or_else(|| SkipReason::MissingParticipant(id.clone()))?;
        matched.insert(id.as_str(), slots.as_slice());
    }

    if matched.len() != group.len() {
        return Err(SkipReason::CountMismatch {
            expected: group.len(),
            matched: matched.len(),
        });
    }

    Ok(matched.into_values().collect())
}

/// Verify, solve and split a single group.
fn solve_group(
    index: usize,
    group: &[String],
    availability: &ParticipantAvailability,
    grid: &Grid,
) -> GroupOutcome {
    match verify_group(group, availability) {
        Ok(participants) => {
            let runs = find_overlapping_runs(&participants, grid);
            let blocks = split_into_blocks(&runs, grid.block_minutes);
            tracing::debug!(
                group = index,
                runs = runs.len(),
                blocks = blocks.len(),
                "group computed"
            );
            GroupOutcome::Computed(blocks)
        }
        Err(reason) => {
            tracing::warn!(group = index, %reason, "group skipped");
            GroupOutcome::Skipped(reason)
        }
    }
}

/// Where a batch's groups are evaluated.
enum Executor {
    CallingThread,
    Global,
    Dedicated(ThreadPool),
}

/// Runs batches of groups against one configuration.
///
/// `workers = None` shares rayon's global pool, `Some(1)` stays on the calling
/// thread, and any other count gets a pool owned by this engine.
pub struct SchedulingEngine {
    config: EngineConfig,
    grid: Grid,
    executor: Executor,
}

impl SchedulingEngine {
    /// Validate `config` and start a dedicated pool if one is configured.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidConfig` / `EngineError::InvalidTimestamp`
    /// for a bad configuration or if the pool cannot be started.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let grid = config.grid()?;

        let executor = match config.workers {
            None => Executor::Global,
            Some(1) => Executor::CallingThread,
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("overlap-worker-{}", i))
                    .build()
                    .map_err(|e| {
                        EngineError::InvalidConfig(format!("cannot start worker pool: {}", e))
                    })?;
                Executor::Dedicated(pool)
            }
        };

        Ok(Self {
            config,
            grid,
            executor,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of threads groups may be spread over.
    pub fn worker_count(&self) -> usize {
        match &self.executor {
            Executor::CallingThread => 1,
            Executor::Global => rayon::current_num_threads(),
            Executor::Dedicated(pool) => pool.current_num_threads(),
        }
    }

    /// Compute fixed-size common free blocks for every group, in group order.
    pub fn run(
        &self,
        groups: &[Vec<String>],
        availability: &ParticipantAvailability,
    ) -> Result<Vec<Vec<TimeRange>>> {
        self.run_with_cancel(groups, availability, &CancelToken::new())
    }

    /// Like [`run`](Self::run), but stops dispatching groups once `cancel` fires.
    ///
    /// # Errors
    /// Returns `EngineError::Cancelled` if the token was cancelled at any point
    /// before the batch finished. Partial results are never returned.
    pub fn run_with_cancel(
        &self,
        groups: &[Vec<String>],
        availability: &ParticipantAvailability,
        cancel: &CancelToken,
    ) -> Result<Vec<Vec<TimeRange>>> {
        let span = tracing::info_span!("batch", groups = groups.len());
        let _entered = span.enter();

        let grid = &self.grid;
        let outcomes: Vec<Option<GroupOutcome>> = self.map_groups(groups, |index, group| {
            if cancel.is_cancelled() {
                return None;
            }
            Some(solve_group(index, group, availability, grid))
        });

        if cancel.is_cancelled() {
            tracing::info!("batch cancelled");
            return Err(EngineError::Cancelled);
        }

        let mut computed = 0usize;
        let mut skipped = 0usize;
        let mut results = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Some(GroupOutcome::Computed(blocks)) => {
                    computed += 1;
                    results.push(blocks);
                }
                Some(GroupOutcome::Skipped(_)) => {
                    skipped += 1;
                    results.push(Vec::new());
                }
                None => return Err(EngineError::Cancelled),
            }
        }

        tracing::info!(computed, skipped, "batch complete");
        Ok(results)
    }

    /// Run an already parsed request.
    pub fn run_request(&self, request: &BatchRequest) -> Result<Vec<Vec<TimeRange>>> {
        self.run(&request.groups, &request.availability)
    }

    /// Per-group merged runs before block splitting. Skipped groups yield empty lists.
    pub fn runs(
        &self,
        groups: &[Vec<String>],
        availability: &ParticipantAvailability,
    ) -> Vec<Vec<TimeRange>> {
        let grid = &self.grid;
        self.map_groups(groups, |_, group| match verify_group(group, availability) {
            Ok(participants) => find_overlapping_runs(&participants, grid),
            Err(_) => Vec::new(),
        })
    }

    /// Apply `f` to every group on the configured executor, keeping group order.
    fn map_groups<T, F>(&self, groups: &[Vec<String>], f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize, &[String]) -> T + Sync + Send,
    {
        let parallel = || -> Vec<T> {
            groups
                .par_iter()
                .enumerate()
                .map(|(index, group)| f(index, group.as_slice()))
                .collect()
        };

        match &self.executor {
            Executor::Global => parallel(),
            Executor::Dedicated(pool) => pool.install(parallel),
            Executor::CallingThread => groups
                .iter()
                .enumerate()
                .map(|(index, group)| f(index, group.as_slice()))
                .collect(),
        }
    }

    /// Parse `request_json`, run it, and wrap any failure in the error variant.
    pub fn respond(&self, request_json: &str) -> BatchResponse {
        let result = parse_request(request_json).and_then(|request| self.run_request(&request));
        if let Err(e) = &result {
            tracing::warn!(error = %e, "batch rejected");
        }
        BatchResponse::from_result(result)
    }
}

/// One-shot entry point: JSON request in, batch response out. Never fails.
pub fn find_meeting_times(request_json: &str, config: &EngineConfig) -> BatchResponse {
    match SchedulingEngine::new(config.clone()) {
        Ok(engine) => engine.respond(request_json),
        Err(e) => BatchResponse::Error(e.to_string()),
    }
}
