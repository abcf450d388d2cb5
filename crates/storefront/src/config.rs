//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `FLOWHUB_API_KEY` - Flowhub API key (not a template placeholder)
//! - `FLOWHUB_CLIENT_ID` - Flowhub client identifier
//! - `FLOWHUB_LOCATION_ID` - Flowhub dispensary location
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `FLOWHUB_API_URL` - API base URL (default: <https://api.flowhub.com/v2>)
//! - `FLOWHUB_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `SPECIALS_SEED_PATH` - JSON file of specials loaded at startup
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default Flowhub API base URL.
pub const DEFAULT_FLOWHUB_API_URL: &str = "https://api.flowhub.com/v2";

/// Template values left in an unedited `.env` (case-insensitive).
///
/// The API key is issued by Flowhub, so only obvious placeholders are
/// refused; its shape and entropy are Flowhub's business.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "change-me",
    "placeholder",
    "todo",
    "fixme",
    "put-your",
    "add-your",
    "enter-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Flowhub API configuration
    pub flowhub: FlowhubConfig,
    /// Optional specials seed file
    pub specials_seed_path: Option<PathBuf>,
    /// Sentry error tracking
    pub sentry: SentryConfig,
}

/// Flowhub API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct FlowhubConfig {
    /// API base URL, without a trailing slash
    pub api_url: Url,
    /// API key sent as a bearer token
    pub api_key: SecretString,
    /// Sent as `X-Client-ID`
    pub client_id: String,
    /// Sent as `X-Location-ID`
    pub location_id: String,
    /// Upper bound on a single request
    pub timeout: Duration,
}

impl std::fmt::Debug for FlowhubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowhubConfig")
            .field("api_url", &self.api_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("client_id", &self.client_id)
            .field("location_id", &self.location_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Sentry settings.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.1,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key is still a template placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;

        Ok(Self {
            host,
            port,
            base_url,
            flowhub: FlowhubConfig::from_env()?,
            specials_seed_path: get_optional_env("SPECIALS_SEED_PATH").map(PathBuf::from),
            sentry: SentryConfig::from_env()?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl FlowhubConfig {
    /// Load the Flowhub section on its own.
    ///
    /// Used by the storefront and by `th-cli`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = get_env_or_default("FLOWHUB_API_URL", DEFAULT_FLOWHUB_API_URL);
        let api_url = Url::parse(api_url.trim_end_matches('/'))
            .map_err(|e| ConfigError::InvalidEnvVar("FLOWHUB_API_URL".to_string(), e.to_string()))?;
        let timeout_secs = parse_env_or_default::<u64>("FLOWHUB_TIMEOUT_SECS", "10")?;

        Ok(Self {
            api_url,
            api_key: get_validated_secret("FLOWHUB_API_KEY")?,
            client_id: get_required_env("FLOWHUB_CLIENT_ID")?,
            location_id: get_required_env("FLOWHUB_LOCATION_ID")?,
            timeout: Duration::from_secs(timeout_secs.max(1)),
        })
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// A value that is unset or only whitespace counts as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    non_blank(std::env::var(key).ok()).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    non_blank(std::env::var(key).ok())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default`.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Reject a secret that is still a template placeholder.
fn reject_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    match PLACEHOLDER_PATTERNS.iter().find(|pattern| lower.contains(*pattern)) {
        Some(pattern) => Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}'). Use the key issued by Flowhub."),
        )),
        None => Ok(()),
    }
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    reject_placeholder(&value, key)?;
    Ok(SecretString::from(value))
}
