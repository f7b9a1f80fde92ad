//! The sequential tool-orchestration loop
//!
//! One [`ChatExecutor::run`] call processes one user turn:
//!
//! 1. Ask the planner for the next tool call given the query and trace
//! 2. Dispatch the call through the tool registry
//! 3. Append the result (or the error) to the trace and re-plan
//! 4. When the planner finishes - or the round bound is hit - synthesize a
//!    final answer from the trace, or answer directly if no tool ever ran
//!
//! Tool failures are recorded as trace entries, never propagated; the loop is
//! bounded by `max_rounds` so a planner that never stops still terminates.

use crate::planner::{PlanOutcome, Planner};
use crate::synthesizer::ResponseSynthesizer;
use crate::trace::{ExecutedTool, ExecutionTrace};
use finchat_llm::CompletionClient;
use finchat_tools::{ToolRegistry, first_text};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for turn execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum planning rounds per turn (prevents infinite re-planning)
    pub max_rounds: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { max_rounds: 8 }
    }
}

/// The outcome of one processed turn
#[derive(Debug, Clone)]
pub struct TurnResult {
    /// Final answer text shown to the user
    pub answer: String,

    /// The turn's execution trace, in invocation order
    pub trace: ExecutionTrace,
}

/// Executes one user turn: plan, dispatch, accumulate, synthesize
pub struct ChatExecutor {
    planner: Planner,
    synthesizer: ResponseSynthesizer,
    registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl ChatExecutor {
    /// Create a new executor
    pub fn new(
        client: Arc<dyn CompletionClient>,
        registry: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            planner: Planner::new(Arc::clone(&client)),
            synthesizer: ResponseSynthesizer::new(client),
            registry,
            config,
        }
    }

    /// Create a builder for an executor
    pub fn builder() -> ChatExecutorBuilder {
        ChatExecutorBuilder::new()
    }

    /// Process one user turn to completion
    ///
    /// Never fails: every failure mode inside the turn degrades to some
    /// answer text (synthesis, concatenation fallback or an error
    /// description).
    pub async fn run(&self, query: &str) -> TurnResult {
        let catalog = self.registry.descriptors();
        let mut trace = ExecutionTrace::new();

        let mut round = 0;
        loop {
            round += 1;
            if round > self.config.max_rounds {
                warn!(
                    max_rounds = self.config.max_rounds,
                    "Round bound reached, synthesizing from current trace"
                );
                break;
            }

            info!(round, executed = trace.len(), "Planning round started");

            match self.planner.plan_next(query, &trace, &catalog).await {
                PlanOutcome::Finish => {
                    debug!(round, "Planner finished");
                    break;
                }
                PlanOutcome::Call(request) => {
                    info!(round, tool = %request.tool, "Executing planned tool call");

                    let result = match self
                        .registry
                        .call(&request.tool, request.params.clone())
                        .await
                    {
                        Ok(parts) => first_text(&parts),
                        Err(e) => {
                            // The error becomes trace context for the next
                            // planning round; the turn keeps going.
                            warn!(tool = %request.tool, error = %e, "Tool call failed");
                            format!("Error: {e}")
                        }
                    };

                    debug!(
                        tool = %request.tool,
                        result_preview = %result.chars().take(200).collect::<String>(),
                        "Tool call recorded"
                    );

                    trace.push(ExecutedTool {
                        tool_name: request.tool,
                        parameters: request.params,
                        result,
                    });
                }
            }
        }

        let answer = if trace.is_empty() {
            info!("No tools executed, generating direct response");
            self.synthesizer.direct_response(query).await
        } else {
            info!(executed = trace.len(), "Synthesizing final response");
            self.synthesizer.synthesize(query, &trace).await
        };

        TurnResult { answer, trace }
    }
}

/// Builder for [`ChatExecutor`]
pub struct ChatExecutorBuilder {
    client: Option<Arc<dyn CompletionClient>>,
    registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl ChatExecutorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            client: None,
            registry: Arc::new(ToolRegistry::new()),
            config: ExecutorConfig::default(),
        }
    }

    /// Set the completion client
    pub fn client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the tool registry
    pub fn registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the maximum planning rounds
    pub fn max_rounds(mut self, max: usize) -> Self {
        self.config.max_rounds = max;
        self
    }

    /// Build the executor
    ///
    /// Returns `None` when no completion client was set.
    pub fn build(self) -> Option<ChatExecutor> {
        let client = self.client?;
        Some(ChatExecutor::new(client, self.registry, self.config))
    }
}

impl Default for ChatExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use finchat_llm::{ChatMessage, LLMError};
    use finchat_tools::{Tool, ToolContent, ToolError};
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Completion client that pops scripted replies in order
    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<String, String>>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<&str, &str>>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .map(|r| r.map(String::from).map_err(String::from))
                        .collect(),
                ),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, _messages: &[ChatMessage]) -> finchat_llm::Result<String> {
            let next = self
                .replies
                .lock()
                .expect("scripted replies lock poisoned")
                .pop_front()
                .unwrap_or_else(|| Err("script exhausted".to_string()));
            next.map_err(LLMError::RequestFailed)
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    /// Tool returning a fixed JSON payload
    struct FixedTool {
        name: &'static str,
        payload: Value,
    }

    #[async_trait]
    impl Tool for FixedTool {
        async fn execute(&self, _params: Value) -> finchat_tools::Result<Vec<ToolContent>> {
            Ok(vec![ToolContent::text(self.payload.to_string())])
        }

        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "test tool"
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object", "properties": {} })
        }
    }

    /// Tool that always fails
    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        async fn execute(&self, _params: Value) -> finchat_tools::Result<Vec<ToolContent>> {
            Err(ToolError::ExecutionFailed("upstream outage".to_string()))
        }

        fn name(&self) -> &str {
            "broken_tool"
        }

        fn description(&self) -> &str {
            "always fails"
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object", "properties": {} })
        }
    }

    fn market_like_registry() -> Arc<ToolRegistry> {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(FixedTool {
            name: "get_ticker_from_name",
            payload: json!({"symbol": "AAPL"}),
        }));
        registry.register(Arc::new(FixedTool {
            name: "get_stock_price",
            payload: json!({"price": 190.5}),
        }));
        Arc::new(registry)
    }

    fn executor(client: ScriptedClient, registry: Arc<ToolRegistry>) -> ChatExecutor {
        ChatExecutor::builder()
            .client(Arc::new(client))
            .registry(registry)
            .build()
            .expect("client was set")
    }

    /// Two-round resolution: name -> ticker -> price, then synthesis.
    #[tokio::test]
    async fn test_sequential_two_tool_turn() {
        let client = ScriptedClient::new(vec![
            Ok(r#"[{"tool": "get_ticker_from_name", "params": {"name": "Apple Inc"}}]"#),
            Ok(r#"[{"tool": "get_stock_price", "params": {"ticker": "AAPL"}}]"#),
            Ok("[]"),
            Ok("Apple Inc (AAPL) is trading at $190.5."),
        ]);

        let result = executor(client, market_like_registry())
            .run("What is the stock price of Apple Inc")
            .await;

        assert_eq!(result.trace.len(), 2);
        assert_eq!(result.trace.entries()[0].tool_name, "get_ticker_from_name");
        assert_eq!(result.trace.entries()[0].parameters["name"], "Apple Inc");
        assert!(result.trace.entries()[0].result.contains("AAPL"));
        assert_eq!(result.trace.entries()[1].tool_name, "get_stock_price");
        assert!(result.trace.entries()[1].result.contains("190.5"));
        assert_eq!(result.answer, "Apple Inc (AAPL) is trading at $190.5.");
    }

    /// A query needing no tools goes straight to the direct response.
    #[tokio::test]
    async fn test_direct_response_when_no_tool_needed() {
        let client = ScriptedClient::new(vec![
            Ok("[]"),
            Ok("Hello! How can I help you with the markets today?"),
        ]);

        let result = executor(client, market_like_registry()).run("hello").await;

        assert!(result.trace.is_empty());
        assert_eq!(
            result.answer,
            "Hello! How can I help you with the markets today?"
        );
    }

    /// A failing tool is recorded as an "Error:" entry and the loop goes on.
    #[tokio::test]
    async fn test_tool_failure_recorded_and_loop_continues() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(BrokenTool));
        registry.register(Arc::new(FixedTool {
            name: "get_stock_price",
            payload: json!({"price": 42.0}),
        }));

        let client = ScriptedClient::new(vec![
            Ok(r#"[{"tool": "broken_tool", "params": {}}]"#),
            Ok(r#"[{"tool": "get_stock_price", "params": {}}]"#),
            Ok("[]"),
            Ok("The price is 42."),
        ]);

        let result = executor(client, Arc::new(registry)).run("price?").await;

        assert_eq!(result.trace.len(), 2);
        assert!(result.trace.entries()[0].result.starts_with("Error:"));
        assert!(result.trace.entries()[1].result.contains("42"));
        assert_eq!(result.answer, "The price is 42.");
    }

    /// Unknown tool names surface at dispatch, not before, and are absorbed.
    #[tokio::test]
    async fn test_unknown_tool_recorded_as_error() {
        let client = ScriptedClient::new(vec![
            Ok(r#"[{"tool": "get_weather", "params": {}}]"#),
            Ok("[]"),
            Ok("I could not fetch that."),
        ]);

        let result = executor(client, market_like_registry()).run("weather?").await;

        assert_eq!(result.trace.len(), 1);
        assert!(result.trace.entries()[0].result.contains("Unknown tool"));
    }

    /// A planner that never stops is cut off at max_rounds and the turn
    /// still ends in synthesis.
    #[tokio::test]
    async fn test_round_bound_forces_synthesis() {
        let replies: Vec<Result<&str, &str>> = vec![
            Ok(r#"[{"tool": "get_stock_price", "params": {}}]"#),
            Ok(r#"[{"tool": "get_stock_price", "params": {}}]"#),
            Ok(r#"[{"tool": "get_stock_price", "params": {}}]"#),
        ];

        let client = ScriptedClient::new(replies);
        let executor = ChatExecutor::builder()
            .client(Arc::new(client))
            .registry(market_like_registry())
            .max_rounds(3)
            .build()
            .expect("client was set");

        let result = executor.run("price?").await;

        // Three rounds ran, then the bound tripped; the exhausted script
        // fails the synthesis call, so the concatenation fallback answers.
        assert_eq!(result.trace.len(), 3);
        assert!(result.answer.starts_with("Based on the collected information:"));
        assert!(result.answer.contains("190.5"));
    }

    /// A planning transport failure on the first round degrades to a direct
    /// response, not a crash.
    #[tokio::test]
    async fn test_planner_failure_on_empty_trace_direct_responds() {
        let client = ScriptedClient::new(vec![
            Err("model offline"),
            Ok("Sorry, I could not reach the model."),
        ]);

        let result = executor(client, market_like_registry()).run("anything").await;

        assert!(result.trace.is_empty());
        assert_eq!(result.answer, "Sorry, I could not reach the model.");
    }

    /// Malformed planner output after a successful round settles on
    /// synthesis over the partial trace.
    #[tokio::test]
    async fn test_malformed_plan_after_progress_synthesizes() {
        let client = ScriptedClient::new(vec![
            Ok(r#"[{"tool": "get_ticker_from_name", "params": {"name": "Apple"}}]"#),
            Ok("I think we should call the price tool next"),
            Ok("AAPL resolved."),
        ]);

        let result = executor(client, market_like_registry()).run("ticker of apple?").await;

        assert_eq!(result.trace.len(), 1);
        assert_eq!(result.answer, "AAPL resolved.");
    }

    #[test]
    fn test_builder_defaults() {
        let config = ExecutorConfig::default();
        assert_eq!(config.max_rounds, 8);

        assert!(ChatExecutorBuilder::new().build().is_none());
    }
}
