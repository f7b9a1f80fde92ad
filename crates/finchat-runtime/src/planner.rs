//! Planner: asks the model for the next tool call
//!
//! Each planning round sends the original query, the tool catalog and the
//! rendered execution trace to the model and parses the reply as a JSON
//! array holding zero or one `{"tool", "params"}` objects.

use crate::prompts::render_planning;
use crate::trace::ExecutionTrace;
use finchat_llm::{ChatMessage, CompletionClient, strip_thinking};
use finchat_tools::ToolDescriptor;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// A single planned tool invocation
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolCallRequest {
    /// Tool name; validated against the registry only at dispatch
    pub tool: String,

    /// Parameters for the call
    #[serde(default = "empty_params")]
    pub params: Value,
}

fn empty_params() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Outcome of one planning round
///
/// At most one tool is acted on per round by design: the executor re-plans
/// after every single result so newly discovered identifiers (a resolved
/// ticker, say) inform the next choice. Extra array elements in the model
/// reply are ignored rather than queued.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// No further tool is needed, or planning degraded (malformed reply or
    /// transport failure); either way the executor moves to its terminal
    /// state with whatever trace exists
    Finish,

    /// Execute exactly this tool next
    Call(ToolCallRequest),
}

/// Drives the per-round planning exchange with the model
pub struct Planner {
    client: Arc<dyn CompletionClient>,
}

impl Planner {
    /// Create a planner over a completion client
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Ask the model which tool (if any) to run next
    ///
    /// Never fails: prompt-render errors, transport errors and unparseable
    /// replies all degrade to [`PlanOutcome::Finish`], logged at warn level.
    pub async fn plan_next(
        &self,
        query: &str,
        trace: &ExecutionTrace,
        catalog: &[ToolDescriptor],
    ) -> PlanOutcome {
        let prompt = match render_planning(query, trace, catalog) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "Failed to render planning prompt");
                return PlanOutcome::Finish;
            }
        };

        let reply = match self.client.complete(&[ChatMessage::user(prompt)]).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Planning completion failed");
                return PlanOutcome::Finish;
            }
        };

        let plan_text = strip_thinking(&reply);
        let plan_text = plan_text.trim();
        debug!(plan = plan_text, "Planner reply");

        parse_plan(plan_text)
    }
}

/// Parse a planner reply into an outcome
///
/// Empty array means done; a populated array yields its first element only.
/// Anything unparseable is treated as done so the turn can settle on the
/// trace gathered so far instead of retrying the plan.
fn parse_plan(text: &str) -> PlanOutcome {
    match serde_json::from_str::<Vec<ToolCallRequest>>(text) {
        Ok(requests) => match requests.into_iter().next() {
            Some(request) => PlanOutcome::Call(request),
            None => PlanOutcome::Finish,
        },
        Err(e) => {
            warn!(error = %e, "Failed to parse planner reply, finishing turn");
            PlanOutcome::Finish
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use finchat_llm::LLMError;
    use serde_json::json;
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

    fn catalog() -> Vec<ToolDescriptor> {
        vec![ToolDescriptor::from_schema(
            "get_stock_price",
            "Price lookup",
            &json!({"properties": {"ticker": {"type": "string"}}}),
        )]
    }

    #[tokio::test]
    async fn test_empty_array_means_finish() {
        let planner = Planner::new(Arc::new(ScriptedClient::new(vec![Ok("[]")])));
        let outcome = planner
            .plan_next("hello", &ExecutionTrace::new(), &catalog())
            .await;
        assert_eq!(outcome, PlanOutcome::Finish);
    }

    #[tokio::test]
    async fn test_single_call_parsed() {
        let planner = Planner::new(Arc::new(ScriptedClient::new(vec![Ok(
            r#"[{"tool": "get_stock_price", "params": {"ticker": "AAPL"}}]"#,
        )])));
        let outcome = planner
            .plan_next("price of AAPL", &ExecutionTrace::new(), &catalog())
            .await;

        match outcome {
            PlanOutcome::Call(request) => {
                assert_eq!(request.tool, "get_stock_price");
                assert_eq!(request.params["ticker"], "AAPL");
            }
            PlanOutcome::Finish => panic!("expected a tool call"),
        }
    }

    #[tokio::test]
    async fn test_thinking_tags_stripped_before_parse() {
        let planner = Planner::new(Arc::new(ScriptedClient::new(vec![Ok(
            "<think>which tool?</think>[{\"tool\": \"get_stock_price\", \"params\": {\"ticker\": \"MSFT\"}}]",
        )])));
        let outcome = planner
            .plan_next("price of MSFT", &ExecutionTrace::new(), &catalog())
            .await;
        assert!(matches!(outcome, PlanOutcome::Call(r) if r.tool == "get_stock_price"));
    }

    #[tokio::test]
    async fn test_extra_elements_ignored() {
        let planner = Planner::new(Arc::new(ScriptedClient::new(vec![Ok(
            r#"[{"tool": "first", "params": {}}, {"tool": "second", "params": {}}]"#,
        )])));
        let outcome = planner
            .plan_next("q", &ExecutionTrace::new(), &catalog())
            .await;
        assert!(matches!(outcome, PlanOutcome::Call(r) if r.tool == "first"));
    }

    #[tokio::test]
    async fn test_malformed_reply_finishes() {
        for reply in ["not json", "{\"tool\": \"x\"}", "[{\"params\": {}}]"] {
            let planner = Planner::new(Arc::new(ScriptedClient::new(vec![Ok(reply)])));
            let outcome = planner
                .plan_next("q", &ExecutionTrace::new(), &catalog())
                .await;
            assert_eq!(outcome, PlanOutcome::Finish, "reply: {reply}");
        }
    }

    #[tokio::test]
    async fn test_transport_failure_finishes() {
        let planner = Planner::new(Arc::new(ScriptedClient::new(vec![Err("boom")])));
        let outcome = planner
            .plan_next("q", &ExecutionTrace::new(), &catalog())
            .await;
        assert_eq!(outcome, PlanOutcome::Finish);
    }

    #[test]
    fn test_missing_params_defaults_to_empty_object() {
        let outcome = parse_plan(r#"[{"tool": "get_stock_news"}]"#);
        match outcome {
            PlanOutcome::Call(request) => {
                assert_eq!(request.tool, "get_stock_news");
                assert!(request.params.as_object().is_some_and(|m| m.is_empty()));
            }
            PlanOutcome::Finish => panic!("expected a tool call"),
        }
    }
}
