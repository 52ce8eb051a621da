use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::strings::is_blank;

/// String-typed inputs handed to an action.
///
/// Every input is a string, as delivered by the orchestration engine. A
/// missing input reads as the empty string so actions can apply defaults
/// uniformly.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inputs(BTreeMap<String, String>);

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build inputs from `(name, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Parse `name=value` assignments. The value may itself contain `=`.
    pub fn parse_assignments<'a>(
        assignments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, CoreError> {
        let mut inputs = Self::new();
        for assignment in assignments {
            let (name, value) = assignment.split_once('=').ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "expected name=value, got '{assignment}'"
                ))
            })?;
            if name.trim().is_empty() {
                return Err(CoreError::InvalidInput(format!(
                    "input name is empty in '{assignment}'"
                )));
            }
            inputs.insert(name.trim(), value);
        }
        Ok(inputs)
    }

    /// Parse a JSON object. Non-string scalar values are converted to text.
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| CoreError::Document(e.to_string()))?;
        let serde_json::Value::Object(object) = value else {
            return Err(CoreError::Document("expected a JSON object".into()));
        };
        let mut inputs = Self::new();
        for (name, value) in object {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            inputs.insert(name, text);
        }
        Ok(inputs)
    }

    /// Parse a flat TOML table. Non-string scalar values are converted to text.
    pub fn from_toml(text: &str) -> Result<Self, CoreError> {
        let table: toml::Table =
            toml::from_str(text).map_err(|e| CoreError::Document(e.to_string()))?;
        let mut inputs = Self::new();
        for (name, value) in table {
            let text = match value {
                toml::Value::String(s) => s,
                other => other.to_string(),
            };
            inputs.insert(name, text);
        }
        Ok(inputs)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// The raw value of an input, or `""` when absent.
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map_or("", String::as_str)
    }

    /// Owned value, falling back to `default` when the input is empty.
    pub fn get_or(&self, name: &str, default: &str) -> String {
        let value = self.get(name);
        let chosen = if value.is_empty() { default } else { value };
        chosen.to_owned()
    }

    /// Owned value, falling back to `default` when the input is blank.
    pub fn get_or_blank(&self, name: &str, default: &str) -> String {
        let value = self.get(name);
        let chosen = if is_blank(value) { default } else { value };
        chosen.to_owned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Fill in `defaults` for every input that is missing or empty.
    pub fn merge_defaults<'a>(&mut self, defaults: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (name, value) in defaults {
            let entry = self.0.entry(name.to_owned()).or_default();
            if entry.is_empty() {
                value.clone_into(entry);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Inputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(k, v)| {
                let shown = if is_secret_name(k) { "[REDACTED]" } else { v.as_str() };
                (k, shown)
            }))
            .finish()
    }
}

/// Heuristic used by `Debug` when no action metadata is at hand.
fn is_secret_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.contains("password") || lower.contains("token") || lower.contains("secret")
}
