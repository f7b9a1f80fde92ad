//! Completion client abstraction layer for finchat
//!
//! This crate provides provider-agnostic access to chat-completion models:
//!
//! - Message types for model communication
//! - The [`CompletionClient`] trait implemented by concrete providers
//! - Thinking-tag stripping for models that emit `<think>` spans
//! - Concrete provider implementations (behind feature flags)

pub mod client;
pub mod error;
pub mod messages;
pub mod think;

// Re-export main types
pub use client::CompletionClient;
pub use error::{LLMError, Result};
pub use messages::{ChatMessage, Role};
pub use think::strip_thinking;

// Provider implementations (feature-gated)
#[cfg(any(feature = "ollama", feature = "openai"))]
pub mod providers;
