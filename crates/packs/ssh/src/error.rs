use actionpack_action::ActionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SshError {
    #[error("Either a private key file or private key data must be provided.")]
    MissingKey,

    #[error("Only one of private key file or private key data may be provided.")]
    ConflictingKey,

    #[error("could not read private key file {path}: {source}")]
    ReadKey {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<SshError> for ActionError {
    fn from(err: SshError) -> Self {
        match err {
            SshError::MissingKey | SshError::ConflictingKey => {
                ActionError::InvalidInputs(vec![err.to_string()])
            }
            SshError::ReadKey { .. } => ActionError::Configuration(err.to_string()),
        }
    }
}
