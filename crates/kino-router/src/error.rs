//! Error types for kino-router

use thiserror::Error;

/// Result type alias for router operations
pub type Result<T> = std::result::Result<T, RouterError>;

/// Errors surfaced by route registration and navigation
///
/// Path resolution itself never fails: the catch-all route makes it total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The route table is malformed (duplicate names, misplaced catch-all, bad pattern)
    #[error("Invalid route configuration: {0}")]
    Configuration(String),

    /// No route is registered under this name
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    /// A required parameter was not supplied for a named navigation
    #[error("Missing parameter `{param}` for route `{route}`")]
    MissingParameter { route: String, param: String },

    /// A supplied parameter does not satisfy the segment's pattern
    #[error("Invalid value `{value}` for parameter `{param}` of route `{route}`")]
    InvalidParameter {
        route: String,
        param: String,
        value: String,
    },

    /// A navigation is still waiting for its hook to proceed
    #[error("Navigation to {pending} is still in progress")]
    NavigationInProgress { pending: String },

    /// `back()` or `forward()` with no entry in that direction
    #[error("No history entry to navigate to")]
    NothingToNavigate,
}

impl RouterError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether the caller can retry or correct the call and continue
    ///
    /// Configuration errors surface at startup and are fatal.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Configuration(_))
    }
}
