//! CLI command implementations.

pub mod customers;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod reports;
pub mod specials;

use serde::Serialize;
use terp_haus_storefront::config::{ConfigError, FlowhubConfig};
use terp_haus_storefront::error::AppError;
use terp_haus_storefront::flowhub::{FlowhubClient, FlowhubError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Flowhub configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The Flowhub client could not be built.
    #[error("Flowhub client error: {0}")]
    Client(#[from] FlowhubError),

    /// A Flowhub request failed or was rejected.
    #[error("{0}")]
    Request(#[from] AppError),

    /// Input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Input or output JSON was malformed.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The storefront refused or failed a request.
    #[error("Storefront request failed: {0}")]
    Storefront(String),
}

/// Build a Flowhub client from `FLOWHUB_*` environment variables.
pub fn flowhub_client() -> Result<FlowhubClient, CliError> {
    dotenvy::dotenv().ok();
    let config = FlowhubConfig::from_env()?;
    tracing::debug!(api_url = %config.api_url, "Using Flowhub");
    Ok(FlowhubClient::new(&config)?)
}

/// Print a value as pretty JSON on stdout.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
