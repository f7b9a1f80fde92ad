//! Error types for tool dispatch

use thiserror::Error;

/// Result type for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors that can occur during tool dispatch and execution
#[derive(Error, Debug)]
pub enum ToolError {
    /// No tool registered under the requested name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Supplied parameters do not match the tool's declared schema
    #[error("Invalid parameters for {tool}: {reason}")]
    InvalidParams {
        tool: String,
        reason: String,
    },

    /// The tool ran and failed
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),
}
