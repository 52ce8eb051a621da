use thiserror::Error;

/// Errors raised while reading or validating action inputs.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A single input value could not be interpreted.
    #[error("{0}")]
    InvalidInput(String),

    /// One or more inputs failed validation. Displayed one message per line.
    #[error("{}", .0.join("\n"))]
    InvalidInputs(Vec<String>),

    /// A structured input document (JSON or TOML) could not be parsed.
    #[error("invalid inputs document: {0}")]
    Document(String),
}

impl CoreError {
    /// Returns the individual validation messages carried by this error.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::InvalidInputs(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_inputs_joins_with_newlines() {
        let err = CoreError::InvalidInputs(vec!["first".into(), "second".into()]);
        assert_eq!(err.to_string(), "first\nsecond");
    }

    #[test]
    fn messages_of_single_error() {
        let err = CoreError::InvalidInput("bad port".into());
        assert_eq!(err.messages(), vec!["bad port".to_owned()]);
    }
}
