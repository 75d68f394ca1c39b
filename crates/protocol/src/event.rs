//! Host-side stream events.
//!
//! Every observable fact about the worker's output stream is delivered as
//! one `StreamEvent` on a single ordered channel. This replaces ad-hoc
//! per-concern callbacks: one consumer loop sees text, boundaries, status,
//! and errors in exactly the order they were produced.

use serde::{Deserialize, Serialize};

/// An ordered event produced by the receive path.
///
/// - `text`          — user-visible output (plain message content, or
///   characters extracted live from a text-producing tool's arguments)
/// - `tool_started`  — the worker began streaming a tool call
/// - `tool_finished` — the frame run for that tool ended
/// - `run_finished`  — the worker invoked the terminal tool
/// - `status`        — informational output
/// - `error`         — a recoverable error reported by the worker
/// - `worker_exited` — the worker process is gone; the session is over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// User-visible text, in arrival order.
    Text { content: String },

    /// A new tool-call run began.
    ToolStarted { name: String },

    /// The current tool-call run ended.
    ToolFinished { name: String },

    /// The worker's terminal tool was invoked; the turn is complete.
    RunFinished,

    /// Status information from the worker.
    Status { message: String },

    /// A recoverable error; the conversation continues.
    Error { message: String },

    /// The worker process exited. Fatal to the session.
    WorkerExited { code: Option<i32> },
}

impl StreamEvent {
    /// Short name for this event kind, for logs and displays.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::ToolStarted { .. } => "tool_started",
            Self::ToolFinished { .. } => "tool_finished",
            Self::RunFinished => "run_finished",
            Self::Status { .. } => "status",
            Self::Error { .. } => "error",
            Self::WorkerExited { .. } => "worker_exited",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization_text() {
        let event = StreamEvent::Text {
            content: "Hello".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"text""#));
        assert!(json.contains(r#""content":"Hello""#));
    }

    #[test]
    fn event_serialization_boundaries() {
        let json = serde_json::to_string(&StreamEvent::ToolStarted {
            name: "respond".into(),
        })
        .unwrap();
        assert!(json.contains(r#""type":"tool_started""#));

        let json = serde_json::to_string(&StreamEvent::RunFinished).unwrap();
        assert!(json.contains(r#""type":"run_finished""#));
    }

    #[test]
    fn event_deserialization() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"worker_exited","code":1}"#).unwrap();
        assert_eq!(event, StreamEvent::WorkerExited { code: Some(1) });
    }

    #[test]
    fn kind_names() {
        assert_eq!(
            StreamEvent::Error {
                message: "x".into()
            }
            .kind(),
            "error"
        );
        assert_eq!(StreamEvent::RunFinished.kind(), "run_finished");
    }
}
