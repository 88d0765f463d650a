//! Root configuration type.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, LogFormat, LoggingSection, RouterSection, ServerSection};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Complete Switchyard configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and the
/// environment.
///
/// # Example
///
/// ```
/// use switchyard_config::SwitchyardConfig;
///
/// let config = SwitchyardConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert_eq!(config.router.max_params, 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct SwitchyardConfig {
    /// Listener configuration.
    #[serde(default)]
    pub server: ServerSection,

    /// Router and context pool configuration.
    #[serde(default)]
    pub router: RouterSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl SwitchyardConfig {
    /// Validates cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the bind address does not
    /// parse, a pool bound is zero, or the log level is unknown.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }

        if self.router.max_params == 0 {
            return Err(ConfigError::invalid("router.max_params", "must be at least 1"));
        }

        if self.router.pool_max_idle == 0 {
            return Err(ConfigError::invalid("router.pool_max_idle", "must be at least 1"));
        }

        // Directive lists such as "info,switchyard_core=debug" are checked
        // by their leading level only.
        let level = self
            .logging
            .level
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if !level.contains('=') && !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::invalid(
                "logging.level",
                format!("unknown log level: {}", self.logging.level),
            ));
        }

        Ok(())
    }

    /// Local development preset: pretty, colored debug logs.
    ///
    /// # Example
    ///
    /// ```
    /// use switchyard_config::SwitchyardConfig;
    ///
    /// let config = SwitchyardConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.server.http_addr = "127.0.0.1:8080".to_string();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.include_location = true;
        config
    }

    /// Production preset: JSON logs at info level.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi_enabled = false;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        SwitchyardConfig::default().validate().unwrap();
        SwitchyardConfig::development().validate().unwrap();
        SwitchyardConfig::production().validate().unwrap();
    }

    #[test]
    fn test_validate_bad_addr() {
        let mut config = SwitchyardConfig::default();
        config.server.http_addr = "not-an-address".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.http_addr"));
    }

    #[test]
    fn test_validate_zero_bounds() {
        let mut config = SwitchyardConfig::default();
        config.router.max_params = 0;
        assert!(config.validate().is_err());

        let mut config = SwitchyardConfig::default();
        config.router.pool_max_idle = 0;
        assert!(config.validate().is_err());

        let mut config = SwitchyardConfig::default();
        config.server.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = SwitchyardConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "WARN".to_string();
        config.validate().unwrap();

        config.logging.level = "info,switchyard_core=trace".to_string();
        config.validate().unwrap();

        config.logging.level = "switchyard_router=debug".to_string();
        config.validate().unwrap();
    }
}
