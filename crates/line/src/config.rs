use std::time::Duration;

use secrecy::Secret;

/// Configuration for one LINE official account.
pub struct LineAccountConfig {
    /// Long-lived channel access token used as the bearer credential.
    pub channel_access_token: Secret<String>,

    /// API origin, e.g. `https://api.line.me`. Overridden in tests.
    pub api_base_url: String,

    /// Per-request timeout for reply/push calls.
    pub timeout: Duration,
}

impl LineAccountConfig {
    pub fn new(channel_access_token: Secret<String>) -> Self {
        Self {
            channel_access_token,
            api_base_url: "https://api.line.me".into(),
            timeout: Duration::from_secs(10),
        }
    }

    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for LineAccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineAccountConfig")
            .field("channel_access_token", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
