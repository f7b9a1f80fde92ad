//! Prompt templates for planning and synthesis
//!
//! Templates are rendered through MiniJinja. A fresh environment is built per
//! render; the templates are small and the renders infrequent (one or two per
//! planning round).

use crate::trace::ExecutionTrace;
use finchat_tools::ToolDescriptor;
use minijinja::{Environment, context};

/// System instruction for tool-free direct responses
pub const DIRECT_RESPONSE_SYSTEM: &str =
    "You are a helpful assistant. Respond naturally to the user's query.";

const PLANNING_TEMPLATE: &str = r#"You are a helpful assistant with access to financial data tools.

Available tools:
{% for tool in tools %}- {{ tool.name }}: {{ tool.description }}
{% if tool.params %}  Parameters: {{ tool.params }}
{% endif %}{% endfor %}
The user originally asked: "{{ query }}"
{% if trace %}
Previous tool results:
{{ trace }}
{% endif %}
ANALYZE THE SITUATION:
- What is the user asking for?
- What tools have already been executed?
- What information is still missing to fully answer the user's question?

RULES:
1. If the user asks about a stock by company name and no ticker symbol is known yet, use get_ticker_from_name first
2. If a ticker symbol is available from previous results, use get_stock_price next when price data is needed
3. If the user asks for news and a ticker is known, use get_stock_news
4. If you have all the information needed, return an empty array []

Respond with ONLY a JSON array with ONE tool (or empty array), in this exact format:
[{"tool": "tool_name", "params": {"param1": "value1"}}]

Examples:
- Need ticker first: [{"tool": "get_ticker_from_name", "params": {"name": "Apple Inc"}}]
- Have ticker, need price: [{"tool": "get_stock_price", "params": {"ticker": "AAPL"}}]
- Have ticker, need news: [{"tool": "get_stock_news", "params": {"ticker": "AAPL"}}]
- All done: []

Do not include any explanation, just the JSON array."#;

const SYNTHESIS_TEMPLATE: &str = r#"The user asked: "{{ query }}"

I used {{ count }} tool(s) and got these results:

{% for entry in results %}Tool {{ loop.index }} ({{ entry.tool_name }}): {{ entry.result }}

{% endfor %}Please provide a comprehensive, natural response to the user based on ALL this information.
Combine and synthesize the data from all tools to give a complete answer.
Do not mention the technical details about using tools, just give a conversational response that addresses the user's query."#;

/// Render the planning prompt for one round
pub fn render_planning(
    query: &str,
    trace: &ExecutionTrace,
    catalog: &[ToolDescriptor],
) -> Result<String, minijinja::Error> {
    let tools: Vec<_> = catalog
        .iter()
        .map(|descriptor| {
            context! {
                name => &descriptor.name,
                description => &descriptor.description,
                params => descriptor.parameters_line(),
            }
        })
        .collect();

    let trace_block = if trace.is_empty() {
        String::new()
    } else {
        trace.render_for_prompt()
    };

    let env = Environment::new();
    env.template_from_str(PLANNING_TEMPLATE)?.render(context! {
        tools => tools,
        query => query,
        trace => trace_block,
    })
}

/// Render the synthesis prompt from a non-empty trace
pub fn render_synthesis(
    query: &str,
    trace: &ExecutionTrace,
) -> Result<String, minijinja::Error> {
    let env = Environment::new();
    env.template_from_str(SYNTHESIS_TEMPLATE)?.render(context! {
        query => query,
        count => trace.len(),
        results => trace.entries(),
    })
}
