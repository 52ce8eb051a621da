use actionpack_action::{Action, ActionError};
use actionpack_core::strings::replace_invalid_xml_characters;
use actionpack_core::{
    ActionSpec, InputSpec, Inputs, RETURN_CODE, RETURN_RESULT, ResultMap, ReturnCode, Validation,
};
use tracing::warn;

use crate::connection::{self, LdapConnection};
use crate::error::LdapActionError;
use crate::service::{self, RESULT_OU_DN};

pub const ROOT_DN: &str = "rootDN";
pub const COMPUTER_COMMON_NAME: &str = "computerCommonName";
pub const COMPUTER_DN: &str = "computerDN";

/// Failure map for a directory error.
///
/// A missing entry is a plain failure; other errors keep their detail in
/// `exception` and a sanitized message in `returnResult`.
fn failure(err: &LdapActionError) -> ResultMap {
    warn!(error = %err, "LDAP action failed");
    if matches!(err, LdapActionError::NotFound) {
        return ResultMap::new()
            .with(RETURN_RESULT, err.to_string())
            .with(RETURN_CODE, ReturnCode::Failure.as_str());
    }
    let mut map = ResultMap::from_error(err);
    map.insert(RETURN_RESULT, replace_invalid_xml_characters(&err.to_string()));
    map
}

fn with_connection_inputs(mut spec: ActionSpec) -> ActionSpec {
    for input in connection::input_specs() {
        spec = spec.input(input);
    }
    spec
}

/// Look up the OU that holds a computer account.
pub struct GetComputerAccountOu {
    spec: ActionSpec,
}

impl GetComputerAccountOu {
    pub fn new() -> Self {
        let spec = with_connection_inputs(ActionSpec::new(
            "Get Computer Account OU",
            "Returns the organizational unit of a computer account.",
        ))
        .input(
            InputSpec::new(ROOT_DN)
                .required()
                .describe("Search base, e.g. DC=example,DC=com."),
        )
        .input(
            InputSpec::new(COMPUTER_COMMON_NAME)
                .required()
                .describe("Common name of the computer account."),
        )
        .output(RESULT_OU_DN, "Distinguished name of the OU.");
        Self { spec }
    }
}

impl Default for GetComputerAccountOu {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for GetComputerAccountOu {
    fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError> {
        let connection = LdapConnection::from_inputs(inputs)?;
        Validation::new()
            .required(ROOT_DN, inputs.get(ROOT_DN))
            .required(COMPUTER_COMMON_NAME, inputs.get(COMPUTER_COMMON_NAME))
            .finish()?;
        let result = service::get_computer_account_ou(
            &connection,
            inputs.get(ROOT_DN).trim(),
            inputs.get(COMPUTER_COMMON_NAME).trim(),
        )
        .await;
        Ok(result.unwrap_or_else(|e| failure(&e)))
    }
}

/// Reset a computer account password to its initial value.
pub struct ResetComputerAccount {
    spec: ActionSpec,
}

impl ResetComputerAccount {
    pub fn new() -> Self {
        let spec = with_connection_inputs(ActionSpec::new(
            "Reset Computer Account",
            "Resets a computer account in Active Directory to its initial password.",
        ))
        .input(
            InputSpec::new(COMPUTER_DN)
                .required()
                .describe("Distinguished name of the computer account."),
        );
        Self { spec }
    }
}

impl Default for ResetComputerAccount {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for ResetComputerAccount {
    fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError> {
        let connection = LdapConnection::from_inputs(inputs)?;
        Validation::new()
            .required(COMPUTER_DN, inputs.get(COMPUTER_DN))
            .finish()?;
        let result =
            service::reset_computer_account(&connection, inputs.get(COMPUTER_DN).trim()).await;
        Ok(result.unwrap_or_else(|e| failure(&e)))
    }
}
