//! Tool abstractions for finchat
//!
//! Defines the [`Tool`] trait implemented by data-fetching tools, the
//! [`ToolDescriptor`] catalog entries fed to the planner, and the
//! [`ToolRegistry`] that dispatches call-by-name requests.

pub mod descriptor;
pub mod error;
pub mod registry;
pub mod tool;

pub use descriptor::{ToolDescriptor, ToolParameter};
pub use error::{Result, ToolError};
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolContent, first_text};
