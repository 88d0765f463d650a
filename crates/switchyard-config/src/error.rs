//! Configuration errors.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why a configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The named file does not exist.
    #[error("config file {path} does not exist")]
    FileNotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// The file exists but reading it failed.
    #[error("cannot read config file {path}")]
    Read {
        /// Requested path.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: io::Error,
    },

    /// TOML input did not match the schema.
    #[error("bad TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON input did not match the schema.
    #[error("bad JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// Neither TOML nor JSON.
    #[error("unsupported config format '{0}'")]
    UnsupportedFormat(String),

    /// A value parsed but failed validation.
    #[error("{field}: {reason}")]
    InvalidValue {
        /// Dotted field path, e.g. `router.max_params`.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An override variable could not be parsed.
    #[error("environment override {var}: {reason}")]
    EnvVar {
        /// Variable name.
        var: String,
        /// What was expected.
        reason: String,
    },

    /// A `.env` file could not be loaded.
    #[error(".env: {0}")]
    Dotenv(String),
}

impl ConfigError {
    /// Maps a failed read of `path`, reporting a missing file as
    /// [`ConfigError::FileNotFound`].
    pub fn read(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::Read { path, source }
        }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn env_var(var: &str, reason: &str) -> Self {
        Self::EnvVar {
            var: var.to_string(),
            reason: reason.to_string(),
        }
    }
}
