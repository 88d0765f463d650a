//! Listener configuration.
//!
//! ```rust
//! use std::time::Duration;
//! use switchyard_server::ServerConfig;
//!
//! let config = ServerConfig::builder()
//!     .http_addr("127.0.0.1:3000")
//!     .request_timeout(Duration::from_secs(5))
//!     .build();
//!
//! assert_eq!(config.http_addr(), "127.0.0.1:3000");
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use switchyard_config::ServerSection;

use crate::error::ServerError;

/// Default HTTP bind address.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// Default graceful shutdown window in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default per-request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Settings for a [`Server`](crate::Server).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    http_addr: String,
    shutdown_timeout: Duration,
    request_timeout: Duration,
    keep_alive: bool,
    max_connections: Option<usize>,
}

impl ServerConfig {
    /// Starts a builder with default values.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Bind address as configured.
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Parses the bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        self.http_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress {
                addr: self.http_addr.clone(),
                reason: e.to_string(),
            })
    }

    /// How long in-flight connections get to finish after shutdown starts.
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Upper bound on reading a body and running the handler chain.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Whether HTTP/1.1 keep-alive is enabled.
    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    /// Maximum concurrent connections, `None` for unlimited.
    pub fn max_connections(&self) -> Option<usize> {
        self.max_connections
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl From<&ServerSection> for ServerConfig {
    fn from(section: &ServerSection) -> Self {
        let max_connections = usize::try_from(section.max_connections)
            .ok()
            .filter(|max| *max > 0);
        Self::builder()
            .http_addr(section.http_addr.clone())
            .shutdown_timeout(Duration::from_secs(section.shutdown_timeout_secs))
            .request_timeout(Duration::from_millis(section.request_timeout_ms))
            .keep_alive(section.keep_alive_secs.is_some_and(|secs| secs > 0))
            .max_connections(max_connections)
            .build()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    http_addr: String,
    shutdown_timeout: Duration,
    request_timeout: Duration,
    keep_alive: bool,
    max_connections: Option<usize>,
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            keep_alive: true,
            max_connections: None,
        }
    }
}

impl ServerConfigBuilder {
    /// Sets the bind address.
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Sets the graceful shutdown window.
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Sets the per-request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enables or disables keep-alive.
    pub fn keep_alive(mut self, enabled: bool) -> Self {
        self.keep_alive = enabled;
        self
    }

    /// Caps concurrent connections.
    pub fn max_connections(mut self, max: Option<usize>) -> Self {
        self.max_connections = max;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            http_addr: self.http_addr,
            shutdown_timeout: self.shutdown_timeout,
            request_timeout: self.request_timeout,
            keep_alive: self.keep_alive,
            max_connections: self.max_connections,
        }
    }
}
