//! Tool registry with call-by-name dispatch

use crate::{Result, Tool, ToolContent, ToolDescriptor, ToolError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Registry of the tools available to the assistant
///
/// Tools are registered once at startup; the planner reads descriptors from
/// here and the executor dispatches [`ToolRegistry::call`] requests. Supplied
/// parameters are validated against the tool's declared schema before
/// dispatch, so a mistyped plan surfaces as a validation error instead of an
/// opaque failure deep inside the tool.
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let mut tools = self.tools.write().expect("tool registry lock poisoned");
        tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().expect("tool registry lock poisoned");
        tools.get(name).cloned()
    }

    /// List all registered tools
    pub fn list(&self) -> Vec<Arc<dyn Tool>> {
        let tools = self.tools.read().expect("tool registry lock poisoned");
        tools.values().cloned().collect()
    }

    /// Build the planner-facing catalog, sorted by tool name
    ///
    /// Sorting keeps the planning prompt stable across runs; HashMap order
    /// would reshuffle it every execution.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        let mut descriptors: Vec<_> = self
            .list()
            .iter()
            .map(|tool| {
                ToolDescriptor::from_schema(tool.name(), tool.description(), &tool.input_schema())
            })
            .collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Dispatch a call to the named tool
    ///
    /// Fails with [`ToolError::UnknownTool`] for unregistered names and
    /// [`ToolError::InvalidParams`] when the parameters do not satisfy the
    /// tool's declared schema.
    pub async fn call(&self, name: &str, params: Value) -> Result<Vec<ToolContent>> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        validate_params(name, &tool.input_schema(), &params)?;

        debug!(tool = name, "Dispatching tool call");
        tool.execute(params).await
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        let tools = self.tools.read().expect("tool registry lock poisoned");
        tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validate supplied parameters against a tool's declared schema
///
/// Checks that required properties are present and that supplied values
/// match their declared type tags (string/number/boolean/object/array).
/// Undeclared type tags and extra parameters pass through untouched.
fn validate_params(tool: &str, schema: &Value, params: &Value) -> Result<()> {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };

    let supplied = params.as_object().ok_or_else(|| ToolError::InvalidParams {
        tool: tool.to_string(),
        reason: "parameters must be a JSON object".to_string(),
    })?;

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if !supplied.contains_key(name) {
                return Err(ToolError::InvalidParams {
                    tool: tool.to_string(),
                    reason: format!("missing required parameter '{name}'"),
                });
            }
        }
    }

    for (name, value) in supplied {
        let Some(declared) = properties.get(name).and_then(|p| p.get("type")).and_then(Value::as_str)
        else {
            continue;
        };

        let matches = match declared {
            "string" => value.is_string(),
            "number" | "integer" => value.is_number(),
            "boolean" => value.is_boolean(),
            "object" => value.is_object(),
            "array" => value.is_array(),
            _ => true,
        };

        if !matches {
            return Err(ToolError::InvalidParams {
                tool: tool.to_string(),
                reason: format!("parameter '{name}' must be of type {declared}"),
            });
        }
    }

    Ok(())
}
