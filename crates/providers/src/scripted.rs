//! Scripted provider — a deterministic offline model backend.
//!
//! Returns a fixed sequence of assistant messages, wrapping around when the
//! script is exhausted so multi-turn sessions keep working. Used by tests
//! and by the `scripted` backend setting for running the full host/worker
//! pipeline without network access.

use agentwire_core::error::ProviderError;
use agentwire_core::message::{Message, ToolCallDelta};
use agentwire_core::provider::{Provider, ProviderRequest};
use async_trait::async_trait;
use std::sync::Mutex;

/// A model backend that replays a fixed script of assistant messages.
pub struct ScriptedProvider {
    script: Vec<Message>,
    cursor: Mutex<usize>,
}

impl ScriptedProvider {
    /// Replay the given messages in order, wrapping around at the end.
    pub fn new(script: Vec<Message>) -> Self {
        Self {
            script,
            cursor: Mutex::new(0),
        }
    }

    /// A two-step demo script: stream a canned response, then terminate.
    pub fn canned_demo() -> Self {
        Self::new(vec![
            Message::assistant_with_tool_calls(
                None,
                vec![ToolCallDelta::complete(
                    0,
                    "call_respond",
                    "respond",
                    r#"{"response": "Hello! I'm running on the scripted backend, so this reply is canned, but it streamed to you exactly like a live one."}"#,
                )],
            ),
            Message::assistant_with_tool_calls(
                None,
                vec![ToolCallDelta::complete(
                    0,
                    "call_terminate",
                    "terminate",
                    r#"{"status": "success"}"#,
                )],
            ),
        ])
    }

    /// How many completions have been served.
    pub fn calls(&self) -> usize {
        *self.cursor.lock().unwrap()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        _request: ProviderRequest,
    ) -> std::result::Result<Message, ProviderError> {
        if self.script.is_empty() {
            return Err(ProviderError::NotConfigured("Empty script".into()));
        }
        let mut cursor = self.cursor.lock().unwrap();
        let message = self.script[*cursor % self.script.len()].clone();
        *cursor += 1;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "scripted".into(),
            messages: vec![Message::user("hi")],
            temperature: 0.0,
            max_tokens: None,
            tools: vec![],
            stream: false,
        }
    }

    #[tokio::test]
    async fn replays_script_in_order_and_wraps() {
        let provider = ScriptedProvider::new(vec![
            Message::assistant("one"),
            Message::assistant("two"),
        ]);

        let a = provider.complete(request()).await.unwrap();
        let b = provider.complete(request()).await.unwrap();
        let c = provider.complete(request()).await.unwrap();

        assert_eq!(a.content.as_deref(), Some("one"));
        assert_eq!(b.content.as_deref(), Some("two"));
        assert_eq!(c.content.as_deref(), Some("one"));
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn empty_script_is_an_error() {
        let provider = ScriptedProvider::new(vec![]);
        assert!(provider.complete(request()).await.is_err());
    }

    #[tokio::test]
    async fn canned_demo_ends_with_terminate() {
        let provider = ScriptedProvider::canned_demo();
        let first = provider.complete(request()).await.unwrap();
        let second = provider.complete(request()).await.unwrap();

        assert_eq!(first.tool_calls[0].function_name(), Some("respond"));
        assert_eq!(second.tool_calls[0].function_name(), Some("terminate"));
    }
}
