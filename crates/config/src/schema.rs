/// Config schema types (server, LINE channel, Gemini provider, retraction tracker, metrics).
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BilingoConfig {
    pub server: ServerConfig,
    pub line: LineConfig,
    pub gemini: GeminiConfig,
    pub tracker: TrackerConfig,
    pub metrics: MetricsConfig,
}

/// Webhook server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "0.0.0.0".
    pub bind: String,
    /// Port to listen on. Defaults to 8080.
    pub port: u16,
    /// Route the LINE platform posts webhook batches to.
    pub webhook_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
            webhook_path: "/webhook".into(),
        }
    }
}

/// LINE Messaging API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    pub api_base_url: String,
    /// Per-request timeout for reply/push calls.
    pub timeout_secs: u64,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.line.me".into(),
            timeout_secs: 10,
        }
    }
}

/// Gemini `generateContent` settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub model: String,
    pub base_url: String,
    /// Per-request timeout for completion calls.
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-pro".into(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            timeout_secs: 30,
        }
    }
}

/// Bounds for the in-memory record of delivered translations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Records older than this are evicted. LINE only allows unsending
    /// within 24 hours, so a longer window never matches anything.
    pub retention_secs: u64,
    /// Hard cap on live records; the oldest is evicted first.
    pub max_entries: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            retention_secs: 24 * 60 * 60,
            max_entries: 10_000,
        }
    }
}

/// Metrics collection. Only takes effect in builds with the `metrics` feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled.
    pub enabled: bool,
    /// Whether to expose the `/metrics` Prometheus endpoint.
    pub prometheus_endpoint: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prometheus_endpoint: true,
        }
    }
}
