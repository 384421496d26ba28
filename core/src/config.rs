//! Client configuration.

use std::time::Duration;

/// Every request is bounded by this timeout unless the caller overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// File name for the persisted session token, used by `FileSessionStore`.
pub const TOKEN_FILE: &str = "taskmanager.token";

/// Connection settings for an `ApiClient`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.timeout
    }
}
