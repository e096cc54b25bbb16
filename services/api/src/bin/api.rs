//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{HttpDatasetSource, LogNotifier},
    config::Config,
    error::ApiError,
    web::{reload_dataset, rest::ApiDoc, router, state::AppState},
};
use axum::http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let source = Arc::new(HttpDatasetSource::new(
        &config.backend_url,
        config.request_timeout,
    )?);
    let notifier = Arc::new(LogNotifier::new());

    // --- 3. Build the Shared AppState & Load the Initial Dataset ---
    let app_state = Arc::new(AppState::new(config.clone(), source, notifier));

    info!("Loading initial dataset from {}...", config.backend_url);
    let report = reload_dataset(&app_state).await;
    if report.failures.is_empty() {
        info!(
            "Initial dataset loaded: {} candidates, {} jobs.",
            report.candidates, report.jobs
        );
    } else {
        warn!(
            "Initial dataset loaded with {} failed collection(s); serving partial data.",
            report.failures.len()
        );
    }

    // --- 4. Create the Web Router ---
    let origin = config.allowed_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!(
            "Invalid ALLOWED_ORIGIN '{}': {}",
            config.allowed_origin, e
        ))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
