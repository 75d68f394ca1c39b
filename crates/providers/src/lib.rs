//! Model backend implementations for AgentWire.
//!
//! - [`openai_compat`] — any OpenAI-compatible `/chat/completions` endpoint
//!   (OpenAI, OpenRouter, Ollama, vLLM, ...), streaming or atomic
//! - [`scripted`] — a deterministic offline backend for tests and demos

pub mod openai_compat;
pub mod scripted;

pub use openai_compat::OpenAiCompatProvider;
pub use scripted::ScriptedProvider;

use agentwire_config::AppConfig;
use agentwire_core::{Error, Provider};
use std::sync::Arc;

/// Build the provider named by the configuration.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, Error> {
    match config.provider.backend.as_str() {
        "openai" => {
            let api_key = config.api_key.clone().ok_or_else(|| Error::Config {
                message: "No API key configured for the openai backend".into(),
            })?;
            Ok(Arc::new(OpenAiCompatProvider::new(
                "openai",
                &config.provider.api_url,
                api_key,
            )))
        }
        "scripted" => Ok(Arc::new(ScriptedProvider::canned_demo())),
        other => Err(Error::Config {
            message: format!("Unknown provider backend: {other}"),
        }),
    }
}
