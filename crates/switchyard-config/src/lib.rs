//! Typed configuration for Switchyard.
//!
//! This crate provides a strongly-typed configuration with support for:
//! - TOML and JSON configuration files
//! - `.env` files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//!
//! # Example
//!
//! ```no_run
//! use switchyard_config::ConfigLoader;
//!
//! # fn main() -> Result<(), switchyard_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_file("switchyard.toml")?
//!     .with_env_prefix("SWITCHYARD")
//!     .load()?;
//!
//! println!("listening on {}", config.server.http_addr);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! max_connections = 10000
//! request_timeout_ms = 30000
//! keep_alive_secs = 60
//!
//! [router]
//! max_params = 5
//! pool_max_idle = 1024
//!
//! [logging]
//! service_name = "inventory"
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with variables of the form `PREFIX__SECTION__KEY`:
//!
//! - `SWITCHYARD__SERVER__HTTP_ADDR=0.0.0.0:9000`
//! - `SWITCHYARD__ROUTER__MAX_PARAMS=8`
//! - `SWITCHYARD__LOGGING__FORMAT=pretty`

#![doc(html_root_url = "https://docs.rs/switchyard-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::SwitchyardConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{LogFormat, LoggingSection, RouterSection, ServerSection};
