//! services/api/src/web/reload.rs
//!
//! Runs one load cycle against the upstream backend and hands the result to
//! the board.

use crate::web::state::AppState;
use candidate_board_core::{
    load_dataset,
    ports::{LoadFailure, LoadNotifier},
};
use chrono::Local;
use tracing::info;

/// What happened during a reload.
#[derive(Debug, Clone)]
pub struct ReloadReport {
    pub sequence: u64,
    /// False when a newer load had already been applied.
    pub applied: bool,
    pub candidates: usize,
    pub jobs: usize,
    pub failures: Vec<LoadFailure>,
}

/// Fetches a fresh dataset and applies it if no newer load beat it.
///
/// Only an applied load reaches the notifier, and it does so before the board
/// lock is released, so notices follow the same order as the applied data.
pub async fn reload_dataset(app_state: &AppState) -> ReloadReport {
    let ticket = app_state.board.lock().await.begin_load();
    info!(sequence = ticket.sequence(), "Reloading dataset...");

    let outcome = load_dataset(app_state.source.as_ref(), app_state.config.bulk_page_size).await;

    let candidates = outcome.dataset.candidates().len();
    let jobs = outcome.dataset.jobs().len();

    let applied = {
        let mut board = app_state.board.lock().await;
        let applied = board.complete_load(ticket, outcome.dataset);
        if applied {
            board.refresh_stats(&Local::now());
            app_state
                .notifier
                .report_applied_load(ticket.sequence(), &outcome.failures)
                .await;
        }
        applied
    };

    ReloadReport {
        sequence: ticket.sequence(),
        applied,
        candidates,
        jobs,
        failures: outcome.failures,
    }
}
