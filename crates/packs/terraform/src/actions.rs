use std::collections::BTreeMap;

use actionpack_action::{Action, ActionError};
use actionpack_core::strings::to_boolean_lenient;
use actionpack_core::{
    ActionSpec, EXCEPTION, InputSpec, Inputs, RETURN_CODE, RETURN_RESULT, ResultMap, ReturnCode,
    STATUS_CODE, Validation,
};
use actionpack_http::HttpClientInputs;
use actionpack_http::inputs::RESPONSE_CHARACTER_SET;
use tracing::{info, instrument, warn};

use crate::client::TerraformClient;
use crate::types::{VariableAttributes, VariableDocument, VariableEntry, created_id, parse_variables};

pub const HOST_URL: &str = "hostUrl";
pub const AUTH_TOKEN: &str = "authToken";
pub const SENSITIVE_VARIABLE_NAME: &str = "sensitiveVariableName";
pub const SENSITIVE_VARIABLE_VALUE: &str = "sensitiveVariableValue";
pub const VARIABLE_CATEGORY: &str = "variableCategory";
pub const SENSITIVE: &str = "sensitive";
pub const HCL: &str = "hcl";
pub const WORKSPACE_ID: &str = "workspaceId";
pub const REQUEST_BODY: &str = "requestBody";
pub const VARIABLES_JSON: &str = "variablesJson";

pub const VARIABLE_ID: &str = "variableId";

pub const DEFAULT_HOST_URL: &str = "https://app.terraform.io";
pub const DEFAULT_CATEGORY: &str = "terraform";

const CATEGORIES: [&str; 2] = ["terraform", "env"];

/// Create one or many variables in a Terraform Cloud workspace.
pub struct CreateVariables {
    spec: ActionSpec,
}

impl CreateVariables {
    pub fn new() -> Self {
        let mut spec = ActionSpec::new(
            "Create Variables",
            "Creates workspace variables through the Terraform Cloud API.",
        )
        .input(
            InputSpec::new(HOST_URL)
                .describe("Base URL of the Terraform API.")
                .default_value(DEFAULT_HOST_URL),
        )
        .input(
            InputSpec::new(AUTH_TOKEN)
                .required()
                .encrypted()
                .describe("Terraform Cloud API token."),
        )
        .input(InputSpec::new(SENSITIVE_VARIABLE_NAME).describe("Name of the variable."))
        .input(
            InputSpec::new(SENSITIVE_VARIABLE_VALUE)
                .encrypted()
                .describe("Value of the variable."),
        )
        .input(
            InputSpec::new(VARIABLE_CATEGORY)
                .describe("Variable category: terraform or env.")
                .default_value(DEFAULT_CATEGORY),
        )
        .input(InputSpec::new(SENSITIVE).default_value("false"))
        .input(
            InputSpec::new(HCL)
                .describe("true to parse the value as HCL.")
                .default_value("false"),
        )
        .input(InputSpec::new(WORKSPACE_ID).describe("Id of the target workspace."))
        .input(
            InputSpec::new(REQUEST_BODY)
                .describe("Raw JSON:API document sent instead of the built one."),
        )
        .input(InputSpec::new(VARIABLES_JSON).describe(
            "JSON array of {propertyName, propertyValue, HCL, Category, Sensitive} entries.",
        ));
        for input in HttpClientInputs::input_specs() {
            spec = spec.input(input);
        }
        let spec = spec
            .output(STATUS_CODE, "HTTP status of a single variable request.")
            .output(VARIABLE_ID, "Id of the created variable.");
        Self { spec }
    }
}

impl Default for CreateVariables {
    fn default() -> Self {
        Self::new()
    }
}

/// Validated form of the variable inputs.
struct VariableRequest {
    name: String,
    value: String,
    category: String,
    sensitive: bool,
    hcl: bool,
    workspace_id: String,
    request_body: String,
    entries: Option<Vec<VariableEntry>>,
}

impl VariableRequest {
    fn from_inputs(inputs: &Inputs, http: &HttpClientInputs) -> Result<Self, ActionError> {
        let category = inputs.get_or(VARIABLE_CATEGORY, DEFAULT_CATEGORY);
        let sensitive = inputs.get_or(SENSITIVE, "false");
        let hcl = inputs.get_or(HCL, "false");
        let workspace_id = inputs.get(WORKSPACE_ID).trim();
        let request_body = inputs.get(REQUEST_BODY).trim();
        let variables_json = inputs.get(VARIABLES_JSON).trim();

        let mut validation = Validation::new()
            .extend(http.verify())
            .required(AUTH_TOKEN, inputs.get(AUTH_TOKEN))
            .one_of(VARIABLE_CATEGORY, category.trim(), &CATEGORIES)
            .boolean(SENSITIVE, sensitive.trim())
            .boolean(HCL, hcl.trim())
            .check(!workspace_id.is_empty() || !request_body.is_empty(), || {
                format!("The {WORKSPACE_ID} input is required when no {REQUEST_BODY} is given.")
            });

        let entries = if variables_json.is_empty() {
            None
        } else {
            match parse_variables(variables_json) {
                Ok(entries) => {
                    for entry in &entries {
                        if !entry.category.is_empty()
                            && !CATEGORIES.contains(&entry.category.to_ascii_lowercase().as_str())
                        {
                            validation = validation.error(format!(
                                "The Category of variable {} is not valid. Valid values: terraform, env.",
                                entry.property_name
                            ));
                        }
                    }
                    Some(entries)
                }
                Err(e) => {
                    validation = validation.error(format!(
                        "The {VARIABLES_JSON} input is not a valid JSON array of variables: {e}"
                    ));
                    None
                }
            }
        };
        validation.finish()?;

        Ok(Self {
            name: inputs.get(SENSITIVE_VARIABLE_NAME).to_owned(),
            value: inputs.get(SENSITIVE_VARIABLE_VALUE).to_owned(),
            category: category.trim().to_ascii_lowercase(),
            sensitive: to_boolean_lenient(&sensitive),
            hcl: to_boolean_lenient(&hcl),
            workspace_id: workspace_id.to_owned(),
            request_body: request_body.to_owned(),
            entries,
        })
    }

    fn single_body(&self) -> Result<String, serde_json::Error> {
        if !self.request_body.is_empty() {
            return Ok(self.request_body.clone());
        }
        serde_json::to_string(&VariableDocument::new(
            VariableAttributes {
                key: self.name.clone(),
                value: self.value.clone(),
                category: self.category.clone(),
                hcl: self.hcl,
                sensitive: self.sensitive,
            },
            &self.workspace_id,
        ))
    }

    fn entry_body(&self, entry: &VariableEntry) -> Result<String, serde_json::Error> {
        let category = if entry.category.is_empty() {
            self.category.clone()
        } else {
            entry.category.to_ascii_lowercase()
        };
        serde_json::to_string(&VariableDocument::new(
            VariableAttributes {
                key: entry.property_name.clone(),
                value: entry.property_value.clone(),
                category,
                hcl: entry.hcl,
                sensitive: entry.sensitive,
            },
            &self.workspace_id,
        ))
    }
}

impl Action for CreateVariables {
    fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    #[instrument(name = "terraform.create_variables", skip_all)]
    async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError> {
        let http = HttpClientInputs::from_inputs(inputs);
        let request = VariableRequest::from_inputs(inputs, &http)?;
        let client = TerraformClient::new(
            http.build_client()?,
            &inputs.get_or(HOST_URL, DEFAULT_HOST_URL),
            inputs.get(AUTH_TOKEN),
            inputs.get_or(RESPONSE_CHARACTER_SET, "UTF-8"),
        );

        let Some(entries) = &request.entries else {
            let body = request.single_body().map_err(crate::TerraformError::from)?;
            let result = client.create_variable(body).await?;
            let variable_id = result
                .is_success()
                .then(|| created_id(&result.body).unwrap_or_default());
            let map = result.into_result_map();
            return Ok(match variable_id {
                Some(id) => map.with(VARIABLE_ID, id),
                None => map,
            });
        };

        let mut bodies = BTreeMap::new();
        let mut failed = Vec::new();
        for entry in entries {
            let body = request.entry_body(entry).map_err(crate::TerraformError::from)?;
            let result = client.create_variable(body).await?;
            if !result.is_success() {
                warn!(variable = %entry.property_name, status = result.status_code, "variable was not created");
                failed.push(entry.property_name.clone());
            }
            bodies.insert(entry.property_name.clone(), result.body);
        }
        info!(created = entries.len() - failed.len(), failed = failed.len(), "variables processed");

        let summary = serde_json::to_string(&bodies).map_err(crate::TerraformError::from)?;
        let mut map = ResultMap::new().with(RETURN_RESULT, summary);
        if failed.is_empty() {
            map.insert(RETURN_CODE, ReturnCode::Success.as_str());
        } else {
            map.insert(RETURN_CODE, ReturnCode::Failure.as_str());
            map.insert(
                EXCEPTION,
                format!("Failed to create variables: {}.", failed.join(", ")),
            );
        }
        for (name, body) in bodies {
            map.insert(name, body);
        }
        Ok(map)
    }
}
