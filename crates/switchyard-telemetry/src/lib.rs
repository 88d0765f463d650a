//! Logging setup for Switchyard.
//!
//! Switchyard crates emit events through [`tracing`]. This crate installs
//! the subscriber that formats them: JSON for production, pretty output for
//! development, filtered by an `EnvFilter` directive.

#![doc(html_root_url = "https://docs.rs/switchyard-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{create_env_filter, init_logging, request_span, LogConfig};
