//! Completion client trait definition

use crate::{ChatMessage, Result};
use async_trait::async_trait;

/// Trait for chat-completion providers
///
/// Implementations send an ordered message list to a model endpoint and
/// return the assistant's reply as plain text. Callers see a synchronous
/// request/response exchange; streaming is not consumed anywhere in finchat.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the conversation to the model and return the reply text
    ///
    /// # Arguments
    ///
    /// * `messages` - Ordered conversation, oldest first
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Get the provider name (e.g., "ollama", "openai-compat")
    fn name(&self) -> &str;
}
