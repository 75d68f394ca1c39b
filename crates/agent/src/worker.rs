//! The worker stdio loop.
//!
//! Reads newline-delimited frames from the host, dispatches them, and
//! reports everything back through the frame channel. Only `message` and
//! `command` frames are meaningful inbound; anything else (including
//! malformed lines) is answered with an `error` frame rather than crashing
//! the loop.

use crate::runner::AgentRunner;
use agentwire_core::error::TransportError;
use agentwire_core::{Frame, FrameType, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Commands understood on the inbound `command` frame.
const CMD_CLEAR: &str = "clear";
const CMD_EXIT: &str = "exit";

/// The worker: one runner plus the inbound frame dispatch loop.
pub struct Worker {
    runner: AgentRunner,
    progress: mpsc::Sender<Frame>,
}

impl Worker {
    pub fn new(runner: AgentRunner, progress: mpsc::Sender<Frame>) -> Self {
        Self { runner, progress }
    }

    /// Consume inbound frames until `exit` or EOF.
    ///
    /// Generic over the reader so tests can drive the loop from a byte
    /// slice instead of a real stdin.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, reader: R) -> Result<()> {
        let mut lines = reader.lines();

        loop {
            let line = lines
                .next_line()
                .await
                .map_err(|e| TransportError::Io(e.to_string()))?;
            let Some(line) = line else {
                info!("Input stream closed, worker exiting");
                return Ok(());
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let frame: Frame = match serde_json::from_str(line) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(error = %e, "Malformed inbound frame");
                    self.emit(Frame::error(format!("Malformed inbound frame: {e}")))
                        .await;
                    continue;
                }
            };

            match frame.frame_type {
                FrameType::Message => self.handle_message(&frame.content).await,
                FrameType::Command => {
                    if self.handle_command(&frame.content).await {
                        return Ok(());
                    }
                }
                other => {
                    warn!(frame_type = ?other, "Unexpected inbound frame type");
                    self.emit(Frame::error(format!(
                        "Unexpected inbound frame type: {other:?}"
                    )))
                    .await;
                }
            }
        }
    }

    async fn handle_message(&mut self, content: &str) {
        if content.is_empty() {
            self.emit(Frame::error("No question provided.")).await;
            return;
        }

        match self.runner.run(content).await {
            Ok(summary) => {
                info!(steps = summary.steps, state = ?summary.state, "Turn handled");
            }
            Err(e) => {
                error!(error = %e, "Run failed");
                self.emit(Frame::error(format!("Run failed: {e}"))).await;
            }
        }
    }

    /// Returns true when the loop should exit.
    async fn handle_command(&mut self, command: &str) -> bool {
        match command {
            CMD_CLEAR => {
                self.runner.clear();
                self.emit(Frame::info("Memory cleared")).await;
                false
            }
            CMD_EXIT => {
                info!("Exit command received");
                true
            }
            other => {
                self.emit(Frame::error(format!("Unknown command: {other}")))
                    .await;
                false
            }
        }
    }

    async fn emit(&self, frame: Frame) {
        let _ = self.progress.send(frame).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentwire_config::AgentConfig;
    use agentwire_core::message::ToolCallDelta;
    use agentwire_core::Message;
    use agentwire_providers::ScriptedProvider;
    use agentwire_tools::default_router;
    use std::sync::Arc;

    fn scripted_worker(script: Vec<Message>) -> (Worker, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(256);
        let config = AgentConfig {
            streaming_output: false,
            ..AgentConfig::default()
        };
        let runner = AgentRunner::new(
            Arc::new(ScriptedProvider::new(script)),
            "mock-model",
            default_router(),
            config,
            tx.clone(),
        );
        (Worker::new(runner, tx), rx)
    }

    fn terminate_message() -> Message {
        Message::assistant_with_tool_calls(
            None,
            vec![ToolCallDelta::complete(
                0,
                "call_t",
                "terminate",
                r#"{"status": "success"}"#,
            )],
        )
    }

    fn drain(rx: &mut mpsc::Receiver<Frame>) -> Vec<Frame> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(frame);
        }
        frames
    }

    #[tokio::test]
    async fn message_frame_starts_a_run_and_exit_stops() {
        let (mut worker, mut rx) = scripted_worker(vec![terminate_message()]);

        let input = concat!(
            r#"{"type":"message","content":"hello"}"#,
            "\n",
            r#"{"type":"command","content":"exit"}"#,
            "\n",
        );
        worker.run(input.as_bytes()).await.unwrap();

        let frames = drain(&mut rx);
        assert!(frames
            .iter()
            .any(|f| f.frame_type == FrameType::ToolCall
                && f.name.as_deref() == Some("terminate")));
    }

    #[tokio::test]
    async fn eof_ends_the_loop_cleanly() {
        let (mut worker, _rx) = scripted_worker(vec![terminate_message()]);
        worker.run(&b""[..]).await.unwrap();
    }

    #[tokio::test]
    async fn empty_message_yields_error_frame() {
        let (mut worker, mut rx) = scripted_worker(vec![terminate_message()]);

        let input = concat!(
            r#"{"type":"message","content":""}"#,
            "\n",
            r#"{"type":"command","content":"exit"}"#,
            "\n",
        );
        worker.run(input.as_bytes()).await.unwrap();

        let frames = drain(&mut rx);
        assert!(frames
            .iter()
            .any(|f| f.frame_type == FrameType::Error && f.content.contains("No question")));
    }

    #[tokio::test]
    async fn malformed_line_yields_error_frame_and_loop_survives() {
        let (mut worker, mut rx) = scripted_worker(vec![terminate_message()]);

        let input = concat!(
            "this is not json\n",
            r#"{"type":"message","content":"hi"}"#,
            "\n",
            r#"{"type":"command","content":"exit"}"#,
            "\n",
        );
        worker.run(input.as_bytes()).await.unwrap();

        let frames = drain(&mut rx);
        assert!(frames
            .iter()
            .any(|f| f.frame_type == FrameType::Error && f.content.contains("Malformed")));
        // The later message was still processed.
        assert!(frames
            .iter()
            .any(|f| f.frame_type == FrameType::ToolCall));
    }

    #[tokio::test]
    async fn clear_command_resets_memory() {
        let (mut worker, mut rx) = scripted_worker(vec![terminate_message()]);

        let input = concat!(
            r#"{"type":"message","content":"hello"}"#,
            "\n",
            r#"{"type":"command","content":"clear"}"#,
            "\n",
            r#"{"type":"command","content":"exit"}"#,
            "\n",
        );
        worker.run(input.as_bytes()).await.unwrap();

        let frames = drain(&mut rx);
        assert!(frames
            .iter()
            .any(|f| f.frame_type == FrameType::Info && f.content.contains("Memory cleared")));
    }

    #[tokio::test]
    async fn unknown_command_is_reported() {
        let (mut worker, mut rx) = scripted_worker(vec![terminate_message()]);

        let input = concat!(
            r#"{"type":"command","content":"reboot"}"#,
            "\n",
            r#"{"type":"command","content":"exit"}"#,
            "\n",
        );
        worker.run(input.as_bytes()).await.unwrap();

        let frames = drain(&mut rx);
        assert!(frames
            .iter()
            .any(|f| f.frame_type == FrameType::Error && f.content.contains("Unknown command")));
    }

    #[tokio::test]
    async fn unexpected_inbound_type_is_reported() {
        let (mut worker, mut rx) = scripted_worker(vec![terminate_message()]);

        let input = concat!(
            r#"{"type":"toolcall","name":"respond","content":"{}"}"#,
            "\n",
            r#"{"type":"command","content":"exit"}"#,
            "\n",
        );
        worker.run(input.as_bytes()).await.unwrap();

        let frames = drain(&mut rx);
        assert!(frames
            .iter()
            .any(|f| f.frame_type == FrameType::Error
                && f.content.contains("Unexpected inbound frame type")));
    }
}
