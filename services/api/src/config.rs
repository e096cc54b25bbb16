//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use candidate_board_core::{DEFAULT_BULK_PAGE_SIZE, DEFAULT_PAGE_SIZE};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// Base URL of the ATS backend serving `/api/candidates` and `/api/jobs`.
    pub backend_url: String,
    pub log_level: Level,
    /// Candidates per page in the list view.
    pub page_size: usize,
    /// Page size sent upstream; large enough to fetch a whole collection at once.
    pub bulk_page_size: usize,
    pub request_timeout: Duration,
    pub allowed_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Server and Upstream Settings ---
        let bind_address: SocketAddr = parse_var("BIND_ADDRESS", "0.0.0.0:3000")?;

        let backend_url = std::env::var("BACKEND_URL")
            .map_err(|_| ConfigError::MissingVar("BACKEND_URL".to_string()))?;

        let log_level: Level = parse_var("RUST_LOG", "INFO")?;

        let timeout_secs: u64 = parse_var("REQUEST_TIMEOUT_SECS", "10")?;

        let allowed_origin = std::env::var("ALLOWED_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        // --- View Settings ---
        let page_size = positive(
            "PAGE_SIZE",
            parse_var("PAGE_SIZE", &DEFAULT_PAGE_SIZE.to_string())?,
        )?;
        let bulk_page_size = positive(
            "BULK_PAGE_SIZE",
            parse_var("BULK_PAGE_SIZE", &DEFAULT_BULK_PAGE_SIZE.to_string())?,
        )?;

        Ok(Self {
            bind_address,
            backend_url,
            log_level,
            page_size,
            bulk_page_size,
            request_timeout: Duration::from_secs(timeout_secs),
            allowed_origin,
        })
    }
}

/// Reads `name` from the environment, falling back to `default`, and parses it.
fn parse_var<T>(name: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    parse_value(name, &raw)
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| {
        ConfigError::InvalidValue(name.to_string(), format!("'{}': {}", raw, e))
    })
}

fn positive(name: &str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue(
            name.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_value_reports_the_variable_name() {
        let parsed: usize = parse_value("PAGE_SIZE", " 24 ").unwrap();
        assert_eq!(parsed, 24);

        let err = parse_value::<usize>("PAGE_SIZE", "lots").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref name, _) if name == "PAGE_SIZE"));
    }

    #[test]
    fn log_levels_parse_case_insensitively() {
        let level: Level = parse_value("RUST_LOG", "debug").unwrap();
        assert_eq!(level, Level::DEBUG);
        assert!(parse_value::<Level>("RUST_LOG", "chatty").is_err());
    }

    #[test]
    fn zero_page_sizes_are_rejected() {
        assert!(positive("PAGE_SIZE", 0).is_err());
        assert_eq!(positive("PAGE_SIZE", 12).unwrap(), 12);
    }
}
