use actionpack_action::{Action, ActionError};
use actionpack_core::{ActionSpec, Inputs, ResultMap};

use crate::config::{self, SendMailConfig};
use crate::smtp::{SENT_MAIL_SUCCESSFULLY, send_mail};

/// Send an email over SMTP, optionally upgraded with STARTTLS.
pub struct SendMail {
    spec: ActionSpec,
}

impl SendMail {
    pub fn new() -> Self {
        let mut spec = ActionSpec::new("Send Mail", "Sends an email message over SMTP.");
        for input in config::input_specs() {
            spec = spec.input(input);
        }
        Self { spec }
    }
}

impl Default for SendMail {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for SendMail {
    fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError> {
        let config = SendMailConfig::from_inputs(inputs)?;
        send_mail(&config).await?;
        Ok(ResultMap::success(SENT_MAIL_SUCCESSFULLY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FROM, HOSTNAME, TO};

    #[tokio::test]
    async fn rejects_missing_inputs() {
        let err = SendMail::new()
            .execute(&Inputs::new().with(HOSTNAME, "localhost"))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::InvalidInputs(_)));
    }

    #[tokio::test]
    async fn bad_recipient_fails_before_connecting() {
        let inputs = Inputs::new()
            .with(HOSTNAME, "localhost")
            .with(FROM, "ops@example.com")
            .with(TO, "not an address");
        let err = SendMail::new().execute(&inputs).await.unwrap_err();
        assert!(err.to_string().contains("invalid to address"));
    }

    #[test]
    fn password_is_encrypted() {
        let action = SendMail::new();
        assert!(
            Action::spec(&action)
                .find_input(config::PASSWORD)
                .is_some_and(|i| i.encrypted)
        );
    }
}
