use std::time::Duration;

use actionpack_action::ActionError;
use thiserror::Error;

/// Errors raised while configuring or using the HTTP client.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An input could not be turned into client configuration.
    #[error("{0}")]
    InvalidConfig(String),

    /// The trust keystore could not be read.
    #[error("could not read trust keystore {path}: {source}")]
    TrustStore {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An HTTP-level transport error occurred.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<HttpError> for ActionError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::InvalidConfig(msg) => ActionError::InvalidInputs(vec![msg]),
            HttpError::TrustStore { .. } => ActionError::Configuration(err.to_string()),
            HttpError::Http(e) => {
                if e.is_timeout() {
                    ActionError::Timeout(Duration::from_secs(0))
                } else if e.is_builder() {
                    ActionError::Configuration(e.to_string())
                } else {
                    ActionError::Connection(e.to_string())
                }
            }
        }
    }
}
