use std::time::Duration;

use actionpack_core::CoreError;
use thiserror::Error;

/// Errors that can occur while executing an action.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The requested action was not found in the registry.
    #[error("action not found: {0}")]
    NotFound(String),

    /// One or more inputs failed validation.
    #[error("{}", .0.join("\n"))]
    InvalidInputs(Vec<String>),

    /// The action failed to do its work.
    #[error("{0}")]
    ExecutionFailed(String),

    /// The remote system did not respond within the allowed duration.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// A network or transport-level error occurred.
    #[error("connection error: {0}")]
    Connection(String),

    /// The action was given invalid configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A local file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ActionError {
    /// Returns `true` if the error is transient and the action may succeed
    /// on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Connection(_))
    }
}

impl From<CoreError> for ActionError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInputs(messages) => Self::InvalidInputs(messages),
            CoreError::InvalidInput(message) => Self::InvalidInputs(vec![message]),
            CoreError::Document(message) => Self::Configuration(message),
        }
    }
}
