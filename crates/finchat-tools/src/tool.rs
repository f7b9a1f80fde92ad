//! Tool trait definition

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One part of a tool result
///
/// Tool results are an ordered sequence of content parts. Today every tool in
/// the workspace emits text, but the sequence shape is the wire contract the
/// executor consumes, so it stays a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolContent {
    /// Plain text content
    Text {
        /// Text payload
        text: String,
    },
}

impl ToolContent {
    /// Create a text content part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Extract the text of the first content part
///
/// Returns the literal string `"No result"` when the sequence is empty; the
/// executor records that marker in the trace instead of skipping the entry.
pub fn first_text(parts: &[ToolContent]) -> String {
    match parts.first() {
        Some(ToolContent::Text { text }) => text.clone(),
        None => "No result".to_string(),
    }
}

/// Trait for tools the assistant can execute
///
/// Each tool provides a name, a description the planner reads, and a JSON
/// schema for its input. Execution is fallible for any reason (bad params,
/// upstream provider failure); callers must treat failures as data, not as
/// turn-ending faults.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with the given parameters
    ///
    /// # Arguments
    ///
    /// * `params` - Tool input as a JSON value matching `input_schema`
    async fn execute(&self, params: Value) -> Result<Vec<ToolContent>>;

    /// Get the tool's name
    ///
    /// Must be unique within a [`crate::ToolRegistry`].
    fn name(&self) -> &str;

    /// Get the tool's description
    ///
    /// This description tells the planner when to pick this tool.
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    fn input_schema(&self) -> Value;
}
