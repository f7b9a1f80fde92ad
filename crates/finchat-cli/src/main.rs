//! Interactive chat front end for finchat
//!
//! Reads free-text stock questions from stdin, runs each through the
//! executor loop, and prints the synthesized answer. `quit` exits, `clear`
//! drops the conversation history, `tools` lists the registered tool set.

mod logging;

use anyhow::Context;
use clap::Parser;
use comfy_table::{Table, presets::UTF8_FULL};
use finchat_llm::providers::{OllamaClient, OllamaConfig, OpenAICompatClient, OpenAICompatConfig};
use finchat_llm::{CompletionClient, strip_thinking};
use finchat_market::{MarketConfig, register_market_tools};
use finchat_runtime::{ChatExecutor, ChatSession, ExecutorConfig};
use finchat_tools::ToolRegistry;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "finchat")]
#[command(about = "Chat assistant for stock questions, driven by local models", long_about = None)]
struct Args {
    /// Model tag to run (e.g., "qwen3:8b")
    #[arg(short, long, default_value = "qwen3:8b")]
    model: String,

    /// Ollama daemon address
    #[arg(long, default_value = "http://localhost:11434")]
    ollama_url: String,

    /// Use an OpenAI-compatible endpoint at this base URL instead of Ollama
    #[arg(long)]
    openai_base: Option<String>,

    /// Maximum planning rounds per turn
    #[arg(long, default_value_t = 8)]
    max_rounds: usize,

    /// Log planner and tool activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn build_client(args: &Args) -> anyhow::Result<Arc<dyn CompletionClient>> {
    if let Some(api_base) = &args.openai_base {
        let config = OpenAICompatConfig::new(&args.model).with_api_base(api_base);
        let client =
            OpenAICompatClient::with_config(config).context("building OpenAI-compatible client")?;
        Ok(Arc::new(client))
    } else {
        let config = OllamaConfig::new(&args.model).with_base_url(&args.ollama_url);
        let client = OllamaClient::with_config(config).context("building Ollama client")?;
        Ok(Arc::new(client))
    }
}

fn print_tool_table(registry: &ToolRegistry) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Tool", "Description"]);

    for descriptor in registry.descriptors() {
        table.add_row(vec![descriptor.name.clone(), descriptor.description.clone()]);
    }

    println!("{table}");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_tracing(args.verbose);

    let client = build_client(&args)?;
    info!(provider = client.name(), model = %args.model, "Completion client ready");

    let registry = Arc::new(ToolRegistry::new());
    register_market_tools(&registry, Arc::new(MarketConfig::default()));

    let executor = ChatExecutor::new(
        Arc::clone(&client),
        Arc::clone(&registry),
        ExecutorConfig {
            max_rounds: args.max_rounds,
        },
    );
    let mut session = ChatSession::new();

    println!("finchat assistant started ({} via {})", args.model, client.name());
    println!("Type 'quit' to exit, 'clear' to clear history, 'tools' to see available tools");
    println!("{}", "-".repeat(60));
    println!("Loaded {} tools", registry.len());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\nYou: ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await.context("reading stdin")? else {
            break; // EOF
        };
        let input = line.trim();

        match input {
            "" => continue,
            "quit" => break,
            "clear" => {
                session.clear();
                println!("Conversation history cleared.");
                continue;
            }
            "tools" => {
                print_tool_table(&registry);
                continue;
            }
            query => {
                session.record_user(query);

                let result = executor.run(query).await;
                let answer = strip_thinking(&result.answer);
                let answer = answer.trim();

                println!("\nAssistant: {answer}");
                session.record_assistant(answer);
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}
