use actionpack_action::ActionError;
use actionpack_http::HttpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerraformError {
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The request document could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<TerraformError> for ActionError {
    fn from(err: TerraformError) -> Self {
        match err {
            TerraformError::Http(e) => e.into(),
            TerraformError::Encode(e) => ActionError::ExecutionFailed(e.to_string()),
        }
    }
}
