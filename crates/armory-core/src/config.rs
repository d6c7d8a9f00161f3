// ============================================================================
// ClientConfig — endpoint and tuning configuration
// ============================================================================
// Base URLs for the backend and reference APIs, page size for catalog
// ingestion, per-request timeout, and an optional bearer token for the
// backend. Env overrides: ARMORY_BACKEND_URL, ARMORY_REFERENCE_URL,
// ARMORY_TOKEN.
// ============================================================================

use std::time::Duration;

/// Default backend base URL (the paginated catalog + user overlay API).
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Default reference API base URL (weapons / content tiers / themes).
pub const DEFAULT_REFERENCE_URL: &str = "https://valorant-api.com";

/// Default catalog page size.
pub const DEFAULT_PAGE_SIZE: u32 = 300;

/// Default per-request timeout in seconds. A stuck network call must not
/// block an ingestion run indefinitely.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the engine's HTTP collaborators.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_url: String,
    pub reference_url: String,
    pub page_size: u32,
    pub request_timeout: Duration,
    /// Bearer token attached to backend requests when present. The reference
    /// API is public and never receives it.
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            reference_url: DEFAULT_REFERENCE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token: None,
        }
    }
}

impl ClientConfig {
    /// Build a config from defaults, then apply env-var overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("ARMORY_BACKEND_URL") {
            if !url.is_empty() {
                config.backend_url = url;
            }
        }
        if let Ok(url) = std::env::var("ARMORY_REFERENCE_URL") {
            if !url.is_empty() {
                config.reference_url = url;
            }
        }
        if let Ok(token) = std::env::var("ARMORY_TOKEN") {
            if !token.is_empty() {
                config.token = Some(token);
            }
        }
        config
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
