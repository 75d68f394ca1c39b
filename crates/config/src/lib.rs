//! Configuration loading, validation, and management for AgentWire.
//!
//! Loads configuration from `~/.agentwire/config.toml` with environment
//! variable overrides. Every setting has a default so a missing file is a
//! valid (if minimal) configuration.

use agentwire_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The root configuration structure.
///
/// Maps directly to `~/.agentwire/config.toml`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model backend configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Agent runner configuration
    #[serde(default)]
    pub agent: AgentConfig,

    /// Worker process configuration (host side)
    #[serde(default)]
    pub worker: WorkerConfig,

    /// Stream demultiplexing configuration (host side)
    #[serde(default)]
    pub streaming: StreamingConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("agent", &self.agent)
            .field("worker", &self.worker)
            .field("streaming", &self.streaming)
            .finish()
    }
}

/// Model backend selection and endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which backend to use: "openai" (any OpenAI-compatible endpoint) or
    /// "scripted" (deterministic offline backend)
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Base URL of the chat-completions endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model name sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_backend() -> String {
    "openai".into()
}
fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_temperature() -> f32 {
    0.7
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

/// Agent runner behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum think/act steps per run
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Conversation memory bound (messages)
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,

    /// Tool observations longer than this are truncated
    #[serde(default = "default_max_observe")]
    pub max_observe: usize,

    /// Optional per-step timeout in seconds. No timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_timeout_secs: Option<u64>,

    /// Whether the worker streams model output as it arrives
    #[serde(default = "default_true")]
    pub streaming_output: bool,

    /// System prompt for the agent
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Appended after the transcript on every think step
    #[serde(default = "default_next_step_prompt")]
    pub next_step_prompt: String,

    /// Optional namespace prefix for federated tool collections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_namespace: Option<String>,
}

fn default_max_steps() -> u32 {
    20
}
fn default_max_messages() -> usize {
    100
}
fn default_max_observe() -> usize {
    10_000
}
fn default_true() -> bool {
    true
}
fn default_system_prompt() -> String {
    "You are AgentWire, an all-capable assistant. You have various tools at \
     your disposal that you can call upon to efficiently complete complex requests."
        .into()
}
fn default_next_step_prompt() -> String {
    "Decide the next action. Use the respond tool to talk to the user and the \
     terminate tool when the request is fully handled."
        .into()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            max_messages: default_max_messages(),
            max_observe: default_max_observe(),
            step_timeout_secs: None,
            streaming_output: default_true(),
            system_prompt: default_system_prompt(),
            next_step_prompt: default_next_step_prompt(),
            tool_namespace: None,
        }
    }
}

/// How the host launches the worker process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Executable to spawn. Defaults to this binary re-invoked in worker mode.
    #[serde(default = "default_worker_command")]
    pub command: String,

    /// Arguments passed to the worker executable
    #[serde(default = "default_worker_args")]
    pub args: Vec<String>,

    /// Environment variables scrubbed from the worker's environment so it
    /// cannot pick up the wrong interpreter or library path
    #[serde(default = "default_scrub_env")]
    pub scrub_env: Vec<String>,
}

fn default_worker_command() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "agentwire".into())
}
fn default_worker_args() -> Vec<String> {
    vec!["worker".into()]
}
fn default_scrub_env() -> Vec<String> {
    vec![
        "PYTHONPATH".into(),
        "PYTHONHOME".into(),
        "LD_LIBRARY_PATH".into(),
    ]
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            command: default_worker_command(),
            args: default_worker_args(),
            scrub_env: default_scrub_env(),
        }
    }
}

/// Which tools stream text and how the host extracts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Tools whose argument stream carries a user-visible text field
    #[serde(default = "default_text_tools")]
    pub text_tools: Vec<String>,

    /// The argument key extracted from text-producing tools
    #[serde(default = "default_extract_key")]
    pub extract_key: String,

    /// The tool whose invocation marks the end of a run
    #[serde(default = "default_terminal_tool")]
    pub terminal_tool: String,
}

fn default_text_tools() -> Vec<String> {
    vec!["respond".into()]
}
fn default_extract_key() -> String {
    "response".into()
}
fn default_terminal_tool() -> String {
    "terminate".into()
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            text_tools: default_text_tools(),
            extract_key: default_extract_key(),
            terminal_tool: default_terminal_tool(),
        }
    }
}

impl AppConfig {
    /// The configuration directory (`~/.agentwire`).
    pub fn config_dir() -> PathBuf {
        dirs_home()
            .map(|h| h.join(".agentwire"))
            .unwrap_or_else(|| PathBuf::from(".agentwire"))
    }

    /// Load config from the default location, falling back to defaults when
    /// the file does not exist. Environment overrides apply either way.
    pub fn load() -> Result<Self> {
        let path = Self::config_dir().join("config.toml");
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&text).map_err(|e| Error::Config {
            message: format!("Failed to parse {}: {e}", path.display()),
        })
    }

    /// Apply environment variable overrides on top of the loaded file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("AGENTWIRE_API_KEY") {
            self.api_key = Some(key);
        } else if self.api_key.is_none()
            && let Ok(key) = std::env::var("OPENAI_API_KEY")
        {
            self.api_key = Some(key);
        }

        if let Ok(model) = std::env::var("AGENTWIRE_MODEL") {
            self.provider.model = model;
        }
        if let Ok(url) = std::env::var("AGENTWIRE_API_URL") {
            self.provider.api_url = url;
        }
        if let Ok(backend) = std::env::var("AGENTWIRE_BACKEND") {
            self.provider.backend = backend;
        }
    }
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
