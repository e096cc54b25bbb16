//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::LogNotifier;
use crate::config::Config;
use candidate_board_core::{ports::DatasetSource, CandidateBoard};
use std::sync::Arc;
use tokio::sync::Mutex;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// The board lock is only held for synchronous work: issuing a load ticket,
/// applying a finished load, or deriving a view. It is never held across a
/// network call.
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<dyn DatasetSource>,
    pub notifier: Arc<LogNotifier>,
    pub board: Mutex<CandidateBoard>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        source: Arc<dyn DatasetSource>,
        notifier: Arc<LogNotifier>,
    ) -> Self {
        Self {
            config,
            source,
            notifier,
            board: Mutex::new(CandidateBoard::new()),
        }
    }
}
