//! Layered configuration loader.

use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, LogFormat, SwitchyardConfig};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "SWITCHYARD";

/// Configuration loader with layered approach.
///
/// Layers are applied in order, later ones overriding earlier ones:
/// 1. Default values (built into the code)
/// 2. Configuration file (TOML or JSON)
/// 3. Variables from a `.env` file
/// 4. Environment variables
///
/// # Example
///
/// ```no_run
/// use switchyard_config::ConfigLoader;
///
/// # fn main() -> Result<(), switchyard_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_optional_file("switchyard.toml")?
///     .with_dotenv()?
///     .with_env_prefix("SWITCHYARD")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: SwitchyardConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SwitchyardConfig::default(),
            env_prefix: None,
        }
    }

    /// Reset to default configuration values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = SwitchyardConfig::default();
        self
    }

    /// Start from the development preset.
    ///
    /// # Example
    ///
    /// ```
    /// use switchyard_config::{ConfigLoader, LogFormat};
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = SwitchyardConfig::development();
        self
    }

    /// Start from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = SwitchyardConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format is chosen by extension: `.toml` or `.json`. Fields missing
    /// from the file take their default values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file does not exist, cannot be read, has
    /// an unsupported extension, or contains invalid or unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        self.config = parse(&content, &format)?;
        Ok(self)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in the given format (`toml` or `json`).
    ///
    /// # Example
    ///
    /// ```
    /// use switchyard_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [router]
    ///     max_params = 8
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.router.max_params, 8);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unknown.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse(content, &format.to_lowercase())?;
        Ok(self)
    }

    /// Set the environment variable prefix for overrides.
    ///
    /// Variables use the format `PREFIX__SECTION__KEY`, for example
    /// `SWITCHYARD__SERVER__HTTP_ADDR=0.0.0.0:9000` or
    /// `SWITCHYARD__ROUTER__MAX_PARAMS=8`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load variables from a `.env` file in the current directory or its
    /// parents, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if a `.env` file exists but is malformed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(err) if err.not_found() => Ok(self),
            Err(err) => Err(ConfigError::Dotenv(err.to_string())),
        }
    }

    /// Load variables from a specific `.env` file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if the file is missing or malformed.
    pub fn with_dotenv_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        dotenvy::from_path(path.as_ref()).map_err(|err| ConfigError::Dotenv(err.to_string()))?;
        Ok(self)
    }

    /// Apply overrides from an explicit list of variables instead of the
    /// process environment.
    ///
    /// Only variables starting with `prefix` are considered.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvVar` if a value does not parse.
    pub fn with_vars<I, K, V>(mut self, prefix: &str, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let prefix = prefix.to_uppercase();
        for (key, value) in vars {
            if key.as_ref().starts_with(&prefix) {
                self.apply_env_var(key.as_ref(), value.as_ref(), &prefix)?;
            }
        }
        Ok(self)
    }

    /// Finalize: apply environment overrides (if a prefix was set) and
    /// validate.
    ///
    /// # Example
    ///
    /// ```
    /// use switchyard_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().load().unwrap();
    /// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override does not parse or validation
    /// fails.
    pub fn load(mut self) -> Result<SwitchyardConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self = self.with_vars(&prefix, env::vars())?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Finalize without validation.
    #[must_use]
    pub fn load_unvalidated(self) -> SwitchyardConfig {
        self.config
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(rest) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            return Ok(());
        };

        let parts: Vec<&str> = rest.split("__").collect();

        match parts.as_slice() {
            // Server section
            ["SERVER", "HTTP_ADDR"] => {
                self.config.server.http_addr = value.to_string();
            }
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                self.config.server.shutdown_timeout_secs = parse_number(key, value)?;
            }
            ["SERVER", "MAX_CONNECTIONS"] => {
                self.config.server.max_connections = parse_number(key, value)?;
            }
            ["SERVER", "REQUEST_TIMEOUT_MS"] => {
                self.config.server.request_timeout_ms = parse_number(key, value)?;
            }
            ["SERVER", "KEEP_ALIVE_SECS"] => {
                self.config.server.keep_alive_secs = if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(parse_number(key, value)?)
                };
            }

            // Router section
            ["ROUTER", "MAX_PARAMS"] => {
                self.config.router.max_params = parse_number(key, value)?;
            }
            ["ROUTER", "POOL_MAX_IDLE"] => {
                self.config.router.pool_max_idle = parse_number(key, value)?;
            }

            // Logging section
            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_var(key, "expected boolean"))?;
            }
            ["LOGGING", "SERVICE_NAME"] => {
                self.config.logging.service_name = value.to_string();
            }
            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => return Err(ConfigError::env_var(key, "expected 'json' or 'pretty'")),
                };
            }
            ["LOGGING", "ANSI_ENABLED"] => {
                self.config.logging.ansi_enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_var(key, "expected boolean"))?;
            }
            ["LOGGING", "INCLUDE_LOCATION"] => {
                self.config.logging.include_location = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_var(key, "expected boolean"))?;
            }

            // Unknown keys under the prefix are ignored.
            _ => {}
        }

        Ok(())
    }
}

fn parse(content: &str, format: &str) -> Result<SwitchyardConfig, ConfigError> {
    match format {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::env_var(key, "expected integer"))
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
