//! Response synthesis from the execution trace

use crate::prompts::{DIRECT_RESPONSE_SYSTEM, render_synthesis};
use crate::trace::ExecutionTrace;
use finchat_llm::{ChatMessage, CompletionClient, strip_thinking};
use std::sync::Arc;
use tracing::warn;

/// Produces the turn's final text from the trace (or the bare query)
///
/// Both entry points absorb model failures: synthesis falls back to a
/// deterministic concatenation of the trace results, direct responses fall
/// back to an error-description string. Neither ever errors out of the turn.
pub struct ResponseSynthesizer {
    client: Arc<dyn CompletionClient>,
}

impl ResponseSynthesizer {
    /// Create a synthesizer over a completion client
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Combine all trace results into one conversational answer
    pub async fn synthesize(&self, query: &str, trace: &ExecutionTrace) -> String {
        let prompt = match render_synthesis(query, trace) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "Failed to render synthesis prompt, falling back");
                return fallback_answer(trace);
            }
        };

        match self.client.complete(&[ChatMessage::user(prompt)]).await {
            Ok(reply) => strip_thinking(&reply).trim().to_string(),
            Err(e) => {
                warn!(error = %e, "Synthesis completion failed, falling back");
                fallback_answer(trace)
            }
        }
    }

    /// Answer a query that needed no tools
    pub async fn direct_response(&self, query: &str) -> String {
        let messages = [
            ChatMessage::system(DIRECT_RESPONSE_SYSTEM),
            ChatMessage::user(query),
        ];

        match self.client.complete(&messages).await {
            Ok(reply) => strip_thinking(&reply).trim().to_string(),
            Err(e) => format!("Error generating response: {e}"),
        }
    }
}

/// Deterministic fallback: every trace result joined in order
fn fallback_answer(trace: &ExecutionTrace) -> String {
    let joined = trace
        .entries()
        .iter()
        .map(|entry| entry.result.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    format!("Based on the collected information: {joined}")
}
