pub mod reload;
pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::web::state::AppState;

// Re-exported for the binary and the integration tests.
pub use reload::reload_dataset;
pub use rest::{dashboard_handler, filter_options_handler, list_candidates_handler, reload_handler};

/// Builds the view API router around the shared state.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/candidates", get(list_candidates_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/filters", get(filter_options_handler))
        .route("/reload", post(reload_handler))
        .with_state(app_state)
}
