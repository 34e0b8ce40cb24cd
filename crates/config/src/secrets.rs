use secrecy::{ExposeSecret, Secret};

use crate::error::{Error, Result};

pub const LINE_CHANNEL_ACCESS_TOKEN: &str = "LINE_CHANNEL_ACCESS_TOKEN";
pub const LINE_CHANNEL_SECRET: &str = "LINE_CHANNEL_SECRET";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Every variable [`Secrets::from_env`] requires, in check order.
pub const REQUIRED: [&str; 3] = [LINE_CHANNEL_ACCESS_TOKEN, LINE_CHANNEL_SECRET, GEMINI_API_KEY];

fn is_present(value: Option<String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Names of required secrets that are absent or blank in the environment.
pub fn missing_from_env() -> Vec<&'static str> {
    missing_with(|name| std::env::var(name).ok())
}

pub fn missing_with(lookup: impl Fn(&str) -> Option<String>) -> Vec<&'static str> {
    REQUIRED
        .into_iter()
        .filter(|name| !is_present(lookup(name)))
        .collect()
}

/// Credentials supplied out-of-band through the environment.
///
/// All three are required; the process refuses to start without them.
pub struct Secrets {
    /// Bearer token for the LINE reply/push endpoints.
    pub line_channel_access_token: Secret<String>,
    /// LINE signing secret. Not used to verify webhooks yet, but a channel
    /// without it is misconfigured.
    pub line_channel_secret: Secret<String>,
    pub gemini_api_key: Secret<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("line_channel_access_token", &"[REDACTED]")
            .field("line_channel_secret", &"[REDACTED]")
            .field("gemini_api_key", &"[REDACTED]")
            .finish()
    }
}

impl Secrets {
    /// Read all secrets from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read all secrets through a custom lookup, so tests never touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |name: &'static str| -> Result<Secret<String>> {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .map(Secret::new)
                .ok_or(Error::MissingSecret { name })
        };

        Ok(Self {
            line_channel_access_token: require(LINE_CHANNEL_ACCESS_TOKEN)?,
            line_channel_secret: require(LINE_CHANNEL_SECRET)?,
            gemini_api_key: require(GEMINI_API_KEY)?,
        })
    }

    /// Masked preview (`abcd…`) for diagnostics output.
    pub fn preview(secret: &Secret<String>) -> String {
        let value = secret.expose_secret();
        let head: String = value.chars().take(4).collect();
        if value.chars().count() <= 4 {
            "****".into()
        } else {
            format!("{head}…")
        }
    }
}
