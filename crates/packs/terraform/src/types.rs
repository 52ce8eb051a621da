use actionpack_core::strings::to_boolean_lenient;
use serde::{Deserialize, Deserializer, Serialize};

/// JSON:API resource type of workspace variables.
pub const VARS_TYPE: &str = "vars";
/// JSON:API resource type of workspaces.
pub const WORKSPACES_TYPE: &str = "workspaces";

/// Request document for `POST /api/v2/vars`.
#[derive(Debug, Clone, Serialize)]
pub struct VariableDocument {
    pub data: VariableData,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariableData {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: VariableAttributes,
    pub relationships: VariableRelationships,
}

/// Attributes of a workspace variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableAttributes {
    pub key: String,
    pub value: String,
    /// `terraform` or `env`.
    pub category: String,
    pub hcl: bool,
    pub sensitive: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariableRelationships {
    pub workspace: Relationship,
}

#[derive(Debug, Clone, Serialize)]
pub struct Relationship {
    pub data: ResourceRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceRef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl VariableDocument {
    /// Document creating `attributes` in the given workspace.
    pub fn new(attributes: VariableAttributes, workspace_id: impl Into<String>) -> Self {
        Self {
            data: VariableData {
                kind: VARS_TYPE.to_owned(),
                attributes,
                relationships: VariableRelationships {
                    workspace: Relationship {
                        data: ResourceRef {
                            id: workspace_id.into(),
                            kind: WORKSPACES_TYPE.to_owned(),
                        },
                    },
                },
            },
        }
    }
}

/// One entry of the `variablesJson` input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VariableEntry {
    #[serde(rename = "propertyName")]
    pub property_name: String,
    #[serde(rename = "propertyValue", default)]
    pub property_value: String,
    #[serde(rename = "HCL", default, deserialize_with = "lenient_bool")]
    pub hcl: bool,
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "Sensitive", default, deserialize_with = "lenient_bool")]
    pub sensitive: bool,
}

/// Accept both JSON booleans and `"true"`/`"false"` strings.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => to_boolean_lenient(&s),
    })
}

/// Parse the `variablesJson` input.
pub fn parse_variables(json: &str) -> Result<Vec<VariableEntry>, serde_json::Error> {
    serde_json::from_str(json)
}

/// The `data.id` of a created resource.
pub fn created_id(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/data/id")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_shape() {
        let document = VariableDocument::new(
            VariableAttributes {
                key: "region".into(),
                value: "us-east-1".into(),
                category: "terraform".into(),
                hcl: false,
                sensitive: true,
            },
            "ws-123",
        );
        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data": {
                    "type": "vars",
                    "attributes": {
                        "key": "region",
                        "value": "us-east-1",
                        "category": "terraform",
                        "hcl": false,
                        "sensitive": true
                    },
                    "relationships": {
                        "workspace": { "data": { "id": "ws-123", "type": "workspaces" } }
                    }
                }
            })
        );
    }

    #[test]
    fn entries_accept_string_and_bool_flags() {
        let entries = parse_variables(
            r#"[
                {"propertyName": "a", "propertyValue": "1", "HCL": "true", "Category": "env", "Sensitive": false},
                {"propertyName": "b"}
            ]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].hcl);
        assert!(!entries[0].sensitive);
        assert_eq!(entries[0].category, "env");
        assert_eq!(entries[1].property_value, "");
        assert!(!entries[1].hcl);
    }

    #[test]
    fn entries_require_a_name() {
        assert!(parse_variables(r#"[{"propertyValue": "1"}]"#).is_err());
        assert!(parse_variables(r#"{"propertyName": "a"}"#).is_err());
    }

    #[test]
    fn created_id_reads_data_id() {
        assert_eq!(
            created_id(r#"{"data":{"id":"var-EavQ1LztoRTQHSNT","type":"vars"}}"#).as_deref(),
            Some("var-EavQ1LztoRTQHSNT")
        );
        assert_eq!(created_id(r#"{"errors":[]}"#), None);
        assert_eq!(created_id("not json"), None);
    }
}
