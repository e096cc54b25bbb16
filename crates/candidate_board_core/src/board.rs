//! crates/candidate_board_core/src/board.rs
//!
//! Holds the currently displayed dataset and the values derived from it.
//!
//! Reloads are tagged with increasing sequence numbers and a completed load is
//! only applied when it is newer than the last applied one, so a slow, older
//! request can never overwrite fresher data. The dataset is swapped wholesale
//! behind an `Arc`; derivations always read a single snapshot.

use chrono::{DateTime, TimeZone};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{Candidate, Dataset, FilterCriteria};
use crate::filter::{filter_and_paginate, Page};
use crate::stats::{compute_stats, DashboardStats};

/// Issued when a load starts; hand it back with the loaded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    sequence: u64,
}

impl LoadTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

struct PageMemo {
    generation: u64,
    criteria: FilterCriteria,
    page: usize,
    page_size: usize,
    result: Arc<Page<Candidate>>,
}

#[derive(Default)]
pub struct CandidateBoard {
    snapshot: Arc<Dataset>,
    issued: u64,
    applied: u64,
    page_memo: Option<PageMemo>,
    last_stats: Option<DashboardStats>,
}

impl CandidateBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        debug!(sequence = self.issued, "Load issued.");
        LoadTicket {
            sequence: self.issued,
        }
    }

    /// Applies a finished load unless a newer one was already applied.
    /// Returns whether the dataset was replaced.
    pub fn complete_load(&mut self, ticket: LoadTicket, dataset: Dataset) -> bool {
        if ticket.sequence <= self.applied {
            warn!(
                sequence = ticket.sequence,
                applied = self.applied,
                "Dropping stale load result."
            );
            return false;
        }

        self.applied = ticket.sequence;
        self.snapshot = Arc::new(dataset);
        self.page_memo = None;
        info!(
            sequence = ticket.sequence,
            candidates = self.snapshot.candidates().len(),
            jobs = self.snapshot.jobs().len(),
            "Dataset replaced."
        );
        true
    }

    /// Sequence number of the dataset on display; 0 before the first load.
    pub fn generation(&self) -> u64 {
        self.applied
    }

    pub fn is_loaded(&self) -> bool {
        self.applied > 0
    }

    pub fn snapshot(&self) -> Arc<Dataset> {
        Arc::clone(&self.snapshot)
    }

    /// The requested page of the filtered candidates. Repeating the last
    /// request against the same dataset returns the cached page.
    pub fn page(
        &mut self,
        criteria: &FilterCriteria,
        page: usize,
        page_size: usize,
    ) -> Arc<Page<Candidate>> {
        if let Some(memo) = &self.page_memo {
            if memo.generation == self.applied
                && memo.page == page
                && memo.page_size == page_size
                && &memo.criteria == criteria
            {
                return Arc::clone(&memo.result);
            }
        }

        let result = Arc::new(filter_and_paginate(
            self.snapshot.candidates(),
            criteria,
            page,
            page_size,
        ));
        self.page_memo = Some(PageMemo {
            generation: self.applied,
            criteria: criteria.clone(),
            page,
            page_size,
            result: Arc::clone(&result),
        });
        result
    }

    /// Recomputes the dashboard for the current snapshot and records it as
    /// the last displayed one.
    pub fn refresh_stats<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> &DashboardStats {
        let stats = compute_stats(self.snapshot.jobs(), self.snapshot.candidates(), now);
        self.last_stats.insert(stats)
    }

    pub fn last_stats(&self) -> Option<&DashboardStats> {
        self.last_stats.as_ref()
    }
}
