//! crates/candidate_board_core/src/ports.rs
//!
//! Defines the contracts (traits) between the core and the outside world.
//! The core never talks to the network itself; adapters in the service crate
//! implement these traits.

use async_trait::async_trait;
use std::fmt;

use crate::domain::{Candidate, Job};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g. HTTP, decoding).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Upstream responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Malformed upstream response: {0}")]
    Malformed(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Load Failures
//=========================================================================================

/// The collection a bulk fetch was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Candidates,
    Jobs,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Candidates => f.write_str("candidates"),
            EntityKind::Jobs => f.write_str("jobs"),
        }
    }
}

/// A bulk fetch that failed and was replaced by an empty collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub entity: EntityKind,
    pub message: String,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Source of the bulk candidate and job collections.
///
/// `page_size` is always large enough to stand for "the whole collection".
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch_candidates(&self, page: usize, page_size: usize) -> PortResult<Vec<Candidate>>;

    async fn fetch_jobs(&self, page: usize, page_size: usize) -> PortResult<Vec<Job>>;
}

/// Receives the outcome of every load the board applied, tagged with the load's
/// sequence number.
///
/// A non-empty `failures` is the single user-facing signal for that load; an
/// empty one means the applied data is complete and any earlier notice is stale.
/// Loads that were dropped as stale are never reported.
#[async_trait]
pub trait LoadNotifier: Send + Sync {
    async fn report_applied_load(&self, sequence: u64, failures: &[LoadFailure]);
}
