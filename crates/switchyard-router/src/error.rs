//! Route registration errors.

use thiserror::Error;

/// Errors raised while registering a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Patterns must be absolute.
    #[error("route pattern '{0}' must start with '/'")]
    MissingLeadingSlash(String),

    /// A `:` was not followed by a parameter name.
    #[error("route pattern '{pattern}' has an unnamed parameter at byte {position}")]
    EmptyParamName {
        /// The offending pattern.
        pattern: String,
        /// Byte offset of the `:`.
        position: usize,
    },

    /// A `*` appeared before the end of the pattern.
    #[error("route pattern '{0}' has a catch-all that is not the final segment")]
    CatchAllNotLast(String),

    /// Two patterns declare different parameter names at the same position.
    #[error("parameter ':{new}' in '{pattern}' conflicts with existing parameter ':{existing}'")]
    ConflictingParam {
        /// The offending pattern.
        pattern: String,
        /// The name already registered at this position.
        existing: String,
        /// The name the new pattern tried to use.
        new: String,
    },

    /// The method is not one of the nine routable methods.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
}
