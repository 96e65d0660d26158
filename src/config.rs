//! Runtime configuration for the catalog client and the search bar.

use std::time::Duration;

/// Default catalog endpoint, matching the backend's local dev port.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// How many candidates a suggestion lookup asks for.
pub const DEFAULT_SEARCH_LIMIT: usize = 8;

/// Settle interval after the last keystroke.
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Per-request timeout for catalog calls.
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the catalog API (no trailing slash required).
    pub api_base: String,
    /// `limit` passed to `/search`.
    pub search_limit: usize,
    /// Debounce settle interval.
    pub debounce: Duration,
    /// Request timeout.
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            http_timeout: Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    /// Load config from environment variables (and `.env`, via dotenvy).
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(base) = dotenvy::var("MEDI_API_BASE")
            && !base.trim().is_empty()
        {
            cfg.api_base = base.trim().to_string();
        }

        if let Ok(val) = dotenvy::var("MEDI_SEARCH_LIMIT")
            && let Ok(n) = val.parse::<usize>()
            && n > 0
        {
            cfg.search_limit = n;
        }

        if let Ok(val) = dotenvy::var("MEDI_DEBOUNCE_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            cfg.debounce = Duration::from_millis(ms);
        }

        if let Ok(val) = dotenvy::var("MEDI_HTTP_TIMEOUT_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            cfg.http_timeout = Duration::from_millis(ms);
        }

        cfg
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Join `path` onto the API base, tolerating a trailing slash on either side.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
