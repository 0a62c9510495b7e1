//! Backend endpoint configuration.
//!
//! The base URL resolves the same way the UI shells do: explicit environment
//! override first, then the local development default.

use std::time::Duration;

/// Environment variable overriding the backend base URL.
const BASE_URL_ENV: &str = "STOREFRONT_API_URL";

/// Default backend URL for local development.
const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Connection settings for [`crate::ApiClient`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, without a trailing slash.
    pub base_url: String,
    /// Overall per-request timeout.
    pub timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
}

impl Config {
    /// Create a config for the given base URL with default timeouts.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Resolve the backend URL from `.env` / the environment, falling back to
    /// the local development default.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }
}
