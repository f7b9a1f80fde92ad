//! Ollama provider implementation
//!
//! Talks to a local (or remote) Ollama daemon over its native chat endpoint.
//! See: https://github.com/ollama/ollama/blob/main/docs/api.md#generate-a-chat-completion
//!
//! # Example
//!
//! ```no_run
//! use finchat_llm::{ChatMessage, CompletionClient};
//! use finchat_llm::providers::{OllamaClient, OllamaConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OllamaConfig::new("qwen3:8b")
//!         .with_base_url("http://localhost:11434");
//!     let client = OllamaClient::with_config(config)?;
//!
//!     let reply = client.complete(&[ChatMessage::user("Hello!")]).await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

use crate::{ChatMessage, CompletionClient, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the Ollama provider
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Model tag to run (e.g., "qwen3:8b", "llama3.2")
    pub model: String,

    /// Base URL of the Ollama daemon (default: "http://localhost:11434")
    pub base_url: String,

    /// Request timeout in seconds (default: 120)
    ///
    /// Local models can take a while to load on first use; the timeout keeps
    /// a hung daemon from stalling a chat turn forever.
    pub timeout_secs: u64,
}

impl OllamaConfig {
    /// Create a new config for the given model with default settings
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the model tag from `FINCHAT_MODEL` and optionally the daemon
    /// address from `OLLAMA_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let model = std::env::var("FINCHAT_MODEL").map_err(|_| {
            crate::LLMError::ConfigurationError(
                "FINCHAT_MODEL environment variable not set".to_string(),
            )
        })?;

        let base_url = std::env::var("OLLAMA_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_OLLAMA_BASE_URL.to_string());

        Ok(Self {
            model,
            base_url,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Set a custom daemon base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Ollama completion client
///
/// Sends non-streaming chat requests to an Ollama daemon and returns the
/// assistant message content. Reasoning models served by Ollama may embed
/// `<think>` spans in the content; stripping those is the caller's business
/// (see [`crate::strip_thinking`]).
pub struct OllamaClient {
    client: Client,
    config: OllamaConfig,
}

impl OllamaClient {
    /// Create a new client with custom configuration
    pub fn with_config(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a new client for the given model with default settings
    pub fn new(model: impl Into<String>) -> Result<Self> {
        Self::with_config(OllamaConfig::new(model))
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(OllamaConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }
}

#[async_trait]
impl CompletionClient for OllamaClient {
    #[instrument(skip(self, messages), fields(model = %self.config.model, base_url = %self.config.base_url))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        debug!(message_count = messages.len(), "Sending chat request to Ollama");

        let request = OllamaChatRequest {
            model: &self.config.model,
            messages,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.config.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(crate::LLMError::ApiError { status, message });
        }

        let chat_response: OllamaChatResponse = response.json().await.map_err(|e| {
            crate::LLMError::RequestFailed(format!("Failed to parse Ollama response: {e}"))
        })?;

        let content = chat_response.message.content;
        if content.is_empty() {
            return Err(crate::LLMError::EmptyResponse);
        }

        debug!(response_length = content.len(), "Ollama reply received");
        Ok(content)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

// ============================================================================
// Ollama wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaChatMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaChatMessage {
    #[serde(default)]
    content: String,
}
