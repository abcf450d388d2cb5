//! Specials publishing.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - Storefront to publish to when `--url` is not given

use std::path::Path;

use serde::Deserialize;
use terp_haus_storefront::services::specials::SpecialsDocument;

use super::CliError;

const DEFAULT_STOREFRONT_URL: &str = "http://localhost:3000";

#[derive(Debug, Deserialize)]
struct Ack {
    ok: bool,
}

/// Replace the specials list on a running storefront with the file's
/// contents.
pub async fn publish(file: &Path, url: Option<String>) -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let raw = std::fs::read_to_string(file).map_err(|source| CliError::Io {
        path: file.display().to_string(),
        source,
    })?;
    let document: SpecialsDocument = serde_json::from_str(&raw)?;

    let base_url = url
        .or_else(|| std::env::var("STOREFRONT_BASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_STOREFRONT_URL.to_string());
    let endpoint = format!("{}/api/specials", base_url.trim_end_matches('/'));

    tracing::info!(%endpoint, count = document.items.len(), "Publishing specials");

    let response = reqwest::Client::new()
        .post(&endpoint)
        .json(&document)
        .send()
        .await
        .map_err(|e| CliError::Storefront(e.to_string()))?;

    let status = response.status();
    let ack: Option<Ack> = response.json().await.ok();
    match ack {
        Some(Ack { ok: true }) if status.is_success() => {
            tracing::info!("Specials published");
            Ok(())
        }
        _ => Err(CliError::Storefront(format!("HTTP {status}"))),
    }
}
