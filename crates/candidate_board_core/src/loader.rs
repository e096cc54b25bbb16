//! crates/candidate_board_core/src/loader.rs
//!
//! Runs one bulk load cycle against a `DatasetSource`.

use tracing::{info, warn};

use crate::domain::Dataset;
use crate::ports::{DatasetSource, EntityKind, LoadFailure};

/// Page size sent to the upstream collections so that one page holds everything.
pub const DEFAULT_BULK_PAGE_SIZE: usize = 1000;

/// The result of a load cycle. `dataset` is always usable; a failed collection
/// is simply empty and listed in `failures`.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub failures: Vec<LoadFailure>,
}

/// Fetches candidates and jobs concurrently and waits for both.
///
/// A failed fetch becomes an empty collection and is listed in the outcome.
/// Nothing is signalled here: whether the failures reach the user depends on
/// whether the board applies this load. There are no retries.
pub async fn load_dataset(source: &dyn DatasetSource, bulk_page_size: usize) -> LoadOutcome {
    let (candidates, jobs) = futures::join!(
        source.fetch_candidates(1, bulk_page_size),
        source.fetch_jobs(1, bulk_page_size)
    );

    let mut failures = Vec::new();

    let candidates = candidates.unwrap_or_else(|e| {
        warn!("Failed to load candidates: {}", e);
        failures.push(LoadFailure {
            entity: EntityKind::Candidates,
            message: e.to_string(),
        });
        Vec::new()
    });

    let jobs = jobs.unwrap_or_else(|e| {
        warn!("Failed to load jobs: {}", e);
        failures.push(LoadFailure {
            entity: EntityKind::Jobs,
            message: e.to_string(),
        });
        Vec::new()
    });

    info!(
        candidates = candidates.len(),
        jobs = jobs.len(),
        failures = failures.len(),
        "Bulk dataset loaded."
    );

    LoadOutcome {
        dataset: Dataset::new(candidates, jobs),
        failures,
    }
}
