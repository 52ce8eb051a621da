use serde::Serialize;

use crate::inputs::Inputs;
use crate::outputs::{EXCEPTION, RETURN_CODE, RETURN_RESULT, ReturnCode};

/// How a response rule compares the output field with its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    CompareEqual,
    CompareNotEqual,
    AlwaysMatch,
}

/// Kind of engine transition a response resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseType {
    Resolved,
    Error,
}

/// Declared input of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSpec {
    pub name: String,
    pub required: bool,
    /// Encrypted inputs are never logged or printed.
    pub encrypted: bool,
    pub description: String,
    /// Value applied when the input is empty.
    pub default: Option<String>,
}

impl InputSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            encrypted: false,
            description: String::new(),
            default: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn encrypted(mut self) -> Self {
        self.encrypted = true;
        self
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Declared output of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSpec {
    pub name: String,
    pub description: String,
}

impl OutputSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Rule mapping an output value to an engine response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseSpec {
    pub text: String,
    pub field: String,
    pub value: String,
    pub match_type: MatchType,
    pub response_type: ResponseType,
}

impl ResponseSpec {
    /// `returnCode == "0"` resolves to `success`.
    pub fn success() -> Self {
        Self {
            text: "success".into(),
            field: RETURN_CODE.into(),
            value: ReturnCode::Success.as_str().into(),
            match_type: MatchType::CompareEqual,
            response_type: ResponseType::Resolved,
        }
    }

    /// `returnCode == "-1"` resolves to `failure`.
    pub fn failure() -> Self {
        Self {
            text: "failure".into(),
            field: RETURN_CODE.into(),
            value: ReturnCode::Failure.as_str().into(),
            match_type: MatchType::CompareEqual,
            response_type: ResponseType::Error,
        }
    }
}

/// Metadata describing an action: its name, inputs, outputs and responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSpec {
    pub name: String,
    pub description: String,
    pub inputs: Vec<InputSpec>,
    pub outputs: Vec<OutputSpec>,
    pub responses: Vec<ResponseSpec>,
}

impl ActionSpec {
    /// New spec with the standard outputs and success/failure responses.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            inputs: Vec::new(),
            outputs: vec![
                OutputSpec::new(RETURN_RESULT, "The primary result, or the error message on failure."),
                OutputSpec::new(RETURN_CODE, "\"0\" on success, \"-1\" on failure."),
                OutputSpec::new(EXCEPTION, "The error detail when the action fails."),
            ],
            responses: vec![ResponseSpec::success(), ResponseSpec::failure()],
        }
    }

    #[must_use]
    pub fn input(mut self, input: InputSpec) -> Self {
        self.inputs.push(input);
        self
    }

    #[must_use]
    pub fn output(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.outputs.push(OutputSpec::new(name, description));
        self
    }

    pub fn find_input(&self, name: &str) -> Option<&InputSpec> {
        self.inputs.iter().find(|i| i.name == name)
    }

    /// Names of required inputs that are blank in `inputs`.
    pub fn missing_required(&self, inputs: &Inputs) -> Vec<&str> {
        self.inputs
            .iter()
            .filter(|i| i.required && inputs.get(&i.name).trim().is_empty())
            .map(|i| i.name.as_str())
            .collect()
    }

    /// Declared defaults as `(name, value)` pairs.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inputs
            .iter()
            .filter_map(|i| i.default.as_deref().map(|d| (i.name.as_str(), d)))
    }

    /// Copy of `inputs` with encrypted values replaced by `[REDACTED]`.
    pub fn redact(&self, inputs: &Inputs) -> Inputs {
        Inputs::from_pairs(inputs.iter().map(|(name, value)| {
            let encrypted = self.find_input(name).is_some_and(|i| i.encrypted);
            (name, if encrypted { "[REDACTED]" } else { value })
        }))
    }
}
