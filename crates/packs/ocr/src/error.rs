use actionpack_action::ActionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("The file {0} does not exist.")]
    FileNotFound(String),

    /// The external tool could not be started.
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The external tool exited with a failure status.
    #[error("{tool} exited with {status}: {stderr}")]
    Tool {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("invalid PDF document: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Page {page} is outside the document, which has {count} pages.")]
    PageOutOfRange { page: i64, count: usize },

    #[error("The pageIndex input is not valid: '{0}' is not a page number.")]
    InvalidPageIndex(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<OcrError> for ActionError {
    fn from(err: OcrError) -> Self {
        match err {
            OcrError::Io(e) => ActionError::Io(e),
            other => ActionError::ExecutionFailed(other.to_string()),
        }
    }
}
