//! crates/candidate_board_core/src/filter.rs
//!
//! The filter/paginate engine: applies the search, stage and job predicates to
//! the full in-memory candidate set and slices the result into pages.

use crate::domain::{Candidate, FilterCriteria};

/// Number of candidates shown per page in the list view.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// One page of a filtered sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Size of the whole filtered sequence, not of this page.
    pub total_filtered: usize,
    pub total_pages: usize,
    /// The 1-based page that was requested.
    pub page: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_filtered: self.total_filtered,
            total_pages: self.total_pages,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// True when the candidate satisfies every active predicate of `criteria`.
pub fn matches(candidate: &Candidate, criteria: &FilterCriteria) -> bool {
    if let Some(term) = criteria.search_term() {
        let hit = [&candidate.name, &candidate.email, &candidate.phone]
            .into_iter()
            .any(|field| field.to_lowercase().contains(term));
        if !hit {
            return false;
        }
    }

    if let Some(stage) = criteria.stage() {
        if candidate.stage != stage.as_str() {
            return false;
        }
    }

    if let Some(job_id) = criteria.job_id() {
        if candidate.job_id != job_id {
            return false;
        }
    }

    true
}

/// Keeps the candidates matching `criteria`, preserving their order.
pub fn filter_candidates<'a>(
    candidates: &'a [Candidate],
    criteria: &FilterCriteria,
) -> Vec<&'a Candidate> {
    candidates
        .iter()
        .filter(|candidate| matches(candidate, criteria))
        .collect()
}

/// `ceil(count / page_size)`; an empty sequence has zero pages.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Slices `[(page - 1) * page_size, page * page_size)` out of `items`.
///
/// The page is not clamped: page 0 or a page past the end yields an empty page.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let start = page
        .checked_sub(1)
        .and_then(|index| index.checked_mul(page_size))
        .filter(|&start| start < items.len());

    let page_items = match start {
        Some(start) => {
            let end = start.saturating_add(page_size).min(items.len());
            items[start..end].to_vec()
        }
        None => Vec::new(),
    };

    Page {
        items: page_items,
        total_filtered: items.len(),
        total_pages: total_pages(items.len(), page_size),
        page,
        page_size,
    }
}

/// Filters the full candidate set and returns the requested page of the result.
pub fn filter_and_paginate(
    candidates: &[Candidate],
    criteria: &FilterCriteria,
    page: usize,
    page_size: usize,
) -> Page<Candidate> {
    let filtered = filter_candidates(candidates, criteria);
    paginate(&filtered, page, page_size).map(Candidate::clone)
}

/// Maps a requested page into `1..=max(total_pages, 1)`.
///
/// The engine never clamps; callers that want a valid page after the criteria
/// changed use this.
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}
