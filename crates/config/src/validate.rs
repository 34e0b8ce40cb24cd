//! Semantic checks on a loaded configuration.
//!
//! Parsing already rejects malformed files; this catches values that parse
//! but cannot work (unbindable address, zero timeouts, a webhook path that
//! shadows a built-in route).

use std::net::IpAddr;

use bilingo_common::normalize_route_path;

use crate::schema::BilingoConfig;

/// Routes the gateway always serves itself.
const RESERVED_PATHS: [&str; 3] = ["/", "/health", "/metrics"];

/// LINE accepts unsend only within 24 hours of sending.
const LINE_UNSEND_WINDOW_SECS: u64 = 24 * 60 * 60;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "server.port"
    pub path: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(&mut self, severity: Severity, path: &'static str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            path,
            message: message.into(),
        });
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

pub fn validate(config: &BilingoConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    let server = &config.server;
    if server.bind.trim().parse::<IpAddr>().is_err() {
        result.push(
            Severity::Error,
            "server.bind",
            format!("`{}` is not an IP address", server.bind),
        );
    }
    if server.port == 0 {
        result.push(
            Severity::Warning,
            "server.port",
            "port 0 binds a random port the platform cannot be pointed at",
        );
    }
    let path = server.webhook_path.trim();
    if path.is_empty() {
        result.push(Severity::Error, "server.webhook_path", "must not be empty");
    } else {
        if !path.starts_with('/') {
            result.push(
                Severity::Warning,
                "server.webhook_path",
                format!("`{path}` has no leading `/`; serving `/{path}`"),
            );
        }
        let normalized = normalize_route_path(path);
        if RESERVED_PATHS.contains(&normalized.as_str()) {
            result.push(
                Severity::Error,
                "server.webhook_path",
                format!("`{normalized}` collides with a built-in route"),
            );
        }
    }

    if !is_http_url(&config.line.api_base_url) {
        result.push(
            Severity::Error,
            "line.api_base_url",
            "must be an http:// or https:// URL",
        );
    }
    if config.line.timeout_secs == 0 {
        result.push(Severity::Error, "line.timeout_secs", "must be greater than 0");
    }

    if config.gemini.model.trim().is_empty() {
        result.push(Severity::Error, "gemini.model", "must not be empty");
    }
    if !is_http_url(&config.gemini.base_url) {
        result.push(
            Severity::Error,
            "gemini.base_url",
            "must be an http:// or https:// URL",
        );
    }
    if config.gemini.timeout_secs == 0 {
        result.push(Severity::Error, "gemini.timeout_secs", "must be greater than 0");
    }

    let tracker = &config.tracker;
    if tracker.retention_secs == 0 {
        result.push(
            Severity::Warning,
            "tracker.retention_secs",
            "0 expires every record immediately; retractions will never be acknowledged",
        );
    } else if tracker.retention_secs > LINE_UNSEND_WINDOW_SECS {
        result.push(
            Severity::Info,
            "tracker.retention_secs",
            "longer than LINE's 24h unsend window; older records are never matched",
        );
    }
    if tracker.max_entries == 0 {
        result.push(
            Severity::Warning,
            "tracker.max_entries",
            "0 is treated as 1",
        );
    }

    result
}
