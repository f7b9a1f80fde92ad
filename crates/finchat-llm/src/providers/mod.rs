//! Concrete completion providers
//!
//! Each provider is gated behind a cargo feature so downstream crates only
//! compile the endpoints they use.

#[cfg(feature = "ollama")]
mod ollama;

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaClient, OllamaConfig};

#[cfg(feature = "openai")]
pub use openai::{OpenAICompatClient, OpenAICompatConfig};
