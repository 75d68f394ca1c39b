//! Error types for the AgentWire domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the taxonomy mirrors how
//! failures are recovered — decode errors keep the stream alive, tool errors
//! become observations the model can react to, transport errors end the
//! session.

use thiserror::Error;

/// The top-level error type for all AgentWire operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Protocol errors ---
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Agent run errors ---
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    // --- Transport errors ---
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures in the framing layer. Decode errors are recovered locally:
/// the decoder logs, skips to the next plausible object start, and the
/// stream continues.
#[derive(Debug, Clone, Error)]
pub enum ProtocolError {
    #[error("Malformed frame: {0}")]
    Decode(String),

    #[error("Frame encoding failed: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model backend unavailable: {0}")]
    Unavailable(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Tool failures are surfaced to the model as observations; a run never
/// aborts because one call had bad arguments or raised during execution.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },
}

/// Failures that end the current run but leave memory and the process
/// intact for the next turn.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("Step budget exceeded after {max_steps} think/act steps")]
    StepBudgetExceeded { max_steps: u32 },

    #[error("Run interrupted: {0}")]
    Interrupted(String),
}

/// Failures that end the whole session. The transport must surface these
/// and never silently restart the worker.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Failed to spawn worker: {0}")]
    SpawnFailed(String),

    #[error("Worker exited unexpectedly (code: {code:?})")]
    WorkerExited { code: Option<i32> },

    #[error("Pipe I/O failed: {0}")]
    Io(String),
}
