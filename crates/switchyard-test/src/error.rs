//! Test error types.

use thiserror::Error;

/// Errors raised while building requests or reading responses.
#[derive(Debug, Error)]
pub enum TestError {
    /// The request could not be assembled.
    #[error("Request build error: {0}")]
    RequestBuild(String),

    /// A header name or value was rejected.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The response body is not UTF-8.
    #[error("Body is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
