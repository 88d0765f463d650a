//! Dispatch errors.

use thiserror::Error;

/// Errors recorded on a [`Context`](crate::Context) while a request is dispatched.
///
/// These never escape the dispatch call. They are stored on the context and
/// rendered by the internal-error handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A JSON response body could not be serialized.
    #[error("failed to encode response body: {0}")]
    Encode(String),

    /// A handler panicked.
    #[error("handler panicked: {0}")]
    HandlerPanic(String),
}

impl DispatchError {
    /// Builds an [`DispatchError::Encode`] from a serializer error.
    #[must_use]
    pub fn encode(err: &serde_json::Error) -> Self {
        Self::Encode(err.to_string())
    }

    /// Builds a [`DispatchError::HandlerPanic`] from a panic payload.
    #[must_use]
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::HandlerPanic(message)
    }
}
