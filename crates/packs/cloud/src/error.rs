use actionpack_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CloudError {
    #[error(transparent)]
    Inputs(#[from] CoreError),

    /// A request URL could not be built from the inputs.
    #[error("invalid URL: {0}")]
    Url(String),
}

impl CloudError {
    /// The validation messages, one per invalid input.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Inputs(e) => e.messages(),
            Self::Url(_) => vec![self.to_string()],
        }
    }
}
