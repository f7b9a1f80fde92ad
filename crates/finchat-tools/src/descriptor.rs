//! Tool catalog descriptors
//!
//! A [`ToolDescriptor`] is the planner-facing view of a tool: its name,
//! description and flattened parameter list, derived once per session from
//! the tool's JSON input schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One declared parameter of a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,

    /// JSON-schema type tag; defaults to "string" when the schema omits it
    #[serde(rename = "type")]
    pub type_tag: String,

    /// Human-readable description; empty when the schema omits it
    pub description: String,

    /// Whether the schema lists this parameter as required
    pub required: bool,
}

/// Planner-facing description of a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name
    pub name: String,

    /// Tool description
    pub description: String,

    /// Declared parameters in schema order
    pub parameters: Vec<ToolParameter>,
}

impl ToolDescriptor {
    /// Build a descriptor from a tool's name, description and input schema
    ///
    /// Reads `properties` and `required` from the schema object. Schemas
    /// without properties produce an empty parameter list.
    pub fn from_schema(name: impl Into<String>, description: impl Into<String>, schema: &Value) -> Self {
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let parameters = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(param_name, prop)| ToolParameter {
                        name: param_name.clone(),
                        type_tag: prop
                            .get("type")
                            .and_then(Value::as_str)
                            .unwrap_or("string")
                            .to_string(),
                        description: prop
                            .get("description")
                            .and_then(Value::as_str)
                            .unwrap_or("")
                            .to_string(),
                        required: required.contains(&param_name.as_str()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Render the parameter list as a single prompt-friendly line
    ///
    /// Example output: `ticker (string): Stock ticker symbol, period (string): Time range`
    pub fn parameters_line(&self) -> String {
        self.parameters
            .iter()
            .map(|p| format!("{} ({}): {}", p.name, p.type_tag, p.description))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_schema() {
        let schema = json!({
            "type": "object",
            "properties": {
                "ticker": {
                    "type": "string",
                    "description": "Stock ticker symbol"
                },
                "limit": { "type": "number" }
            },
            "required": ["ticker"]
        });

        let descriptor = ToolDescriptor::from_schema("get_stock_price", "Price lookup", &schema);
        assert_eq!(descriptor.name, "get_stock_price");
        assert_eq!(descriptor.parameters.len(), 2);

        let ticker = descriptor
            .parameters
            .iter()
            .find(|p| p.name == "ticker")
            .unwrap();
        assert_eq!(ticker.type_tag, "string");
        assert_eq!(ticker.description, "Stock ticker symbol");
        assert!(ticker.required);

        let limit = descriptor
            .parameters
            .iter()
            .find(|p| p.name == "limit")
            .unwrap();
        assert_eq!(limit.type_tag, "number");
        assert_eq!(limit.description, "");
        assert!(!limit.required);
    }

    #[test]
    fn test_from_schema_defaults() {
        let schema = json!({
            "type": "object",
            "properties": {
                "name": {}
            }
        });

        let descriptor = ToolDescriptor::from_schema("lookup", "", &schema);
        assert_eq!(descriptor.parameters[0].type_tag, "string");
        assert!(!descriptor.parameters[0].required);
    }

    #[test]
    fn test_from_schema_no_properties() {
        let descriptor = ToolDescriptor::from_schema("ping", "liveness", &json!({}));
        assert!(descriptor.parameters.is_empty());
    }

    #[test]
    fn test_parameters_line() {
        let schema = json!({
            "properties": {
                "ticker": { "type": "string", "description": "Symbol" }
            }
        });
        let descriptor = ToolDescriptor::from_schema("t", "d", &schema);
        assert_eq!(descriptor.parameters_line(), "ticker (string): Symbol");
    }
}
