//! Configuration section types.

use serde::{Deserialize, Serialize};

/// Listener section.
///
/// # Example
///
/// ```
/// use switchyard_config::ServerSection;
///
/// let server = ServerSection {
///     http_addr: "127.0.0.1:3000".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(server.request_timeout_ms, 30_000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Maximum number of concurrent connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Keep-alive timeout in seconds. None disables keep-alive.
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: Option<u64>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            max_connections: default_max_connections(),
            request_timeout_ms: default_request_timeout(),
            keep_alive_secs: default_keep_alive(),
        }
    }
}

fn default_http_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    10000
}

fn default_request_timeout() -> u64 {
    30000
}

#[allow(clippy::unnecessary_wraps)]
fn default_keep_alive() -> Option<u64> {
    Some(60)
}

/// Router and context pool section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RouterSection {
    /// Minimum parameter slots preallocated per request context.
    #[serde(default = "default_max_params")]
    pub max_params: usize,

    /// Maximum idle contexts kept for reuse.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle: usize,
}

impl Default for RouterSection {
    fn default() -> Self {
        Self {
            max_params: default_max_params(),
            pool_max_idle: default_pool_max_idle(),
        }
    }
}

fn default_max_params() -> usize {
    5
}

fn default_pool_max_idle() -> usize {
    1024
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Service name attached to log records.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Log level or filter directive (e.g. `info`, `switchyard_core=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            service_name: default_service_name(),
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_service_name() -> String {
    "switchyard".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_section_defaults() {
        let server = ServerSection::default();
        assert_eq!(server.http_addr, "0.0.0.0:8080");
        assert_eq!(server.shutdown_timeout_secs, 30);
        assert_eq!(server.keep_alive_secs, Some(60));
    }

    #[test]
    fn test_router_section_partial_toml() {
        let router: RouterSection = toml::from_str("max_params = 8").unwrap();
        assert_eq!(router.max_params, 8);
        assert_eq!(router.pool_max_idle, 1024);
    }

    #[test]
    fn test_logging_section_rejects_unknown_fields() {
        let result: Result<LoggingSection, _> = toml::from_str("colour = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_log_format_serde() {
        let json = serde_json::to_string(&LogFormat::Pretty).unwrap();
        assert_eq!(json, "\"pretty\"");
        let parsed: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(parsed, LogFormat::Json);
    }
}
