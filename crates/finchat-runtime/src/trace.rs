//! Turn-scoped execution trace
//!
//! One [`ExecutionTrace`] lives for exactly one user turn. Every tool
//! invocation, successful or failed, appends one entry in call order; the
//! planner re-reads the rendered trace each round and the synthesizer
//! consumes it at the end of the turn.

use serde::Serialize;
use serde_json::Value;

/// Record of one executed tool invocation
#[derive(Debug, Clone, Serialize)]
pub struct ExecutedTool {
    /// Name of the tool that was dispatched
    pub tool_name: String,

    /// Parameters the planner supplied
    pub parameters: Value,

    /// First text part of the tool result, or an "Error: ..." string when
    /// the invocation failed
    pub result: String,
}

/// Append-only, invocation-ordered record of a turn's tool calls
#[derive(Debug, Clone, Default)]
pub struct ExecutionTrace {
    entries: Vec<ExecutedTool>,
}

impl ExecutionTrace {
    /// Create an empty trace
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an executed tool record
    pub fn push(&mut self, entry: ExecutedTool) {
        self.entries.push(entry);
    }

    /// Entries in invocation order
    pub fn entries(&self) -> &[ExecutedTool] {
        &self.entries
    }

    /// Number of recorded invocations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether any tool has run this turn
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the trace as "- tool_name: result" lines for the planner
    pub fn render_for_prompt(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("- {}: {}", entry.tool_name, entry.result))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
