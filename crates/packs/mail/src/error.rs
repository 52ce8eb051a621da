use actionpack_action::ActionError;
use thiserror::Error;

/// Errors raised while building or delivering a message.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid {field} address '{address}': {reason}")]
    InvalidAddress {
        field: &'static str,
        address: String,
        reason: String,
    },

    #[error("failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

impl From<MailError> for ActionError {
    fn from(err: MailError) -> Self {
        match &err {
            MailError::Smtp(e) if e.is_permanent() => {
                ActionError::ExecutionFailed(format!("permanent SMTP error: {e}"))
            }
            MailError::Smtp(e) => ActionError::Connection(format!("SMTP error: {e}")),
            MailError::InvalidAddress { .. } | MailError::Message(_) => {
                ActionError::ExecutionFailed(err.to_string())
            }
        }
    }
}
