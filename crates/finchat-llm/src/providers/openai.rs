//! OpenAI-compatible provider implementation
//!
//! Works against any server speaking the `/chat/completions` dialect:
//! OpenAI itself, vLLM, llama.cpp, LM Studio, text-generation-webui, etc.
//! See: https://platform.openai.com/docs/api-reference/chat

use crate::{ChatMessage, CompletionClient, Result, Role};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for an OpenAI-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAICompatConfig {
    /// Model identifier (e.g., "gpt-4o-mini", or whatever the server hosts)
    pub model: String,

    /// API key; local servers usually accept any placeholder
    pub api_key: Option<String>,

    /// Base URL (default: "https://api.openai.com/v1")
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl OpenAICompatConfig {
    /// Create a new config for the given model with default settings
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the model from `FINCHAT_MODEL`, the key from `OPENAI_API_KEY`
    /// (optional) and the base URL from `OPENAI_API_BASE` (optional).
    pub fn from_env() -> Result<Self> {
        let model = std::env::var("FINCHAT_MODEL").map_err(|_| {
            crate::LLMError::ConfigurationError(
                "FINCHAT_MODEL environment variable not set".to_string(),
            )
        })?;

        let api_base =
            std::env::var("OPENAI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        Ok(Self {
            model,
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            api_base,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set a custom API base URL
    ///
    /// Useful for local deployments ("http://localhost:8000/v1") and other
    /// OpenAI-compatible services.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// OpenAI-compatible completion client
pub struct OpenAICompatClient {
    client: Client,
    config: OpenAICompatConfig,
}

impl OpenAICompatClient {
    /// Create a new client with custom configuration
    pub fn with_config(config: OpenAICompatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(OpenAICompatConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &OpenAICompatConfig {
        &self.config
    }
}

#[async_trait]
impl CompletionClient for OpenAICompatClient {
    #[instrument(skip(self, messages), fields(model = %self.config.model, api_base = %self.config.api_base))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        debug!(message_count = messages.len(), "Sending chat request");

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: messages.iter().map(WireMessage::from).collect(),
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .header("Content-Type", "application/json");

        if let Some(key) = &self.config.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }

        let response = builder.json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(crate::LLMError::ApiError { status, message });
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            crate::LLMError::RequestFailed(format!("Failed to parse response: {e}"))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(crate::LLMError::EmptyResponse)?;

        if content.is_empty() {
            return Err(crate::LLMError::EmptyResponse);
        }

        debug!(response_length = content.len(), "Chat reply received");
        Ok(content)
    }

    fn name(&self) -> &'static str {
        "openai-compat"
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(msg: &ChatMessage) -> Self {
        let role = match msg.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self {
            role,
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = OpenAICompatConfig::new("gpt-4o-mini")
            .with_api_key("sk-test")
            .with_api_base("http://localhost:8000/v1")
            .with_timeout(60);

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.api_base, "http://localhost:8000/v1");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_wire_message_roles() {
        let wire = WireMessage::from(&ChatMessage::system("s"));
        assert_eq!(wire.role, "system");

        let wire = WireMessage::from(&ChatMessage::assistant("a"));
        assert_eq!(wire.role, "assistant");
    }

    #[test]
    fn test_response_parsing() {
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "hello"}}]
        });
        let parsed: ChatCompletionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("hello")
        );
    }
}
