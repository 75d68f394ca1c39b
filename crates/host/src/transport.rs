//! Worker process transport.
//!
//! Owns the worker child process lifecycle: spawn with piped stdio and a
//! scrubbed environment, write outbound frames to its stdin, and pump its
//! stdout through the frame decoder and demultiplexer into one ordered
//! event channel. The receive pump never blocks waiting for a complete
//! frame — partial data stays buffered in the decoder until the next read.
//!
//! Lifecycle events surface as [`StreamEvent::WorkerExited`] rather than
//! panics or silent restarts: when the pipe closes, the handle reaps the
//! process and reports its exit code as the final event.

use agentwire_config::WorkerConfig;
use agentwire_core::error::TransportError;
use agentwire_core::{Frame, Result};
use agentwire_protocol::{codec, Demultiplexer, DemuxConfig, StreamEvent};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Unique identifier for one worker session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build the worker command: piped stdio, scrubbed environment.
fn build_command(config: &WorkerConfig) -> Command {
    let mut cmd = Command::new(&config.command);
    cmd.args(&config.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Scrub inherited interpreter/search-path variables so the worker
    // cannot pick up the wrong runtime.
    for var in &config.scrub_env {
        cmd.env_remove(var);
    }

    cmd
}

/// A handle to one running worker.
///
/// Events arrive through [`next_event`](Self::next_event) in exactly the
/// order the worker produced them; after the output pipe closes, the final
/// event is always `WorkerExited` with the reaped exit code.
pub struct WorkerHandle {
    session: SessionId,
    child: Child,
    stdin: Option<ChildStdin>,
    events: mpsc::Receiver<StreamEvent>,
    exited: bool,
}

impl WorkerHandle {
    /// Launch the worker and start the receive pump.
    pub async fn spawn(config: &WorkerConfig, demux_config: DemuxConfig) -> Result<Self> {
        let session = SessionId::new();
        let mut cmd = build_command(config);

        let mut child = cmd.spawn().map_err(|e| {
            TransportError::SpawnFailed(format!("{}: {e}", config.command))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransportError::SpawnFailed("Worker stdin not piped".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TransportError::SpawnFailed("Worker stdout not piped".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| TransportError::SpawnFailed("Worker stderr not piped".into()))?;

        info!(session = %session, command = %config.command, "Worker spawned");

        // Forward worker logs (stderr) into our own tracing output.
        let log_session = session.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(session = %log_session, "[worker] {line}");
            }
        });

        // The receive pump: raw bytes → frames → events, single task,
        // strictly ordered, never blocking on partial frames.
        let (tx, events) = mpsc::channel(256);
        let pump_session = session.clone();
        tokio::spawn(async move {
            let mut stdout = stdout;
            let mut decoder = codec::FrameDecoder::new();
            let mut demux = Demultiplexer::new(demux_config);
            let mut buf = [0u8; 4096];

            loop {
                match stdout.read(&mut buf).await {
                    Ok(0) => break, // EOF: the worker closed its stdout
                    Ok(n) => {
                        for frame in decoder.push(&buf[..n]) {
                            for event in demux.feed(&frame) {
                                if tx.send(event).await.is_err() {
                                    return; // receiver dropped
                                }
                            }
                        }
                    }
                    Err(e) => {
                        warn!(session = %pump_session, error = %e, "Worker stdout read failed");
                        break;
                    }
                }
            }

            // Close any tool run left open by the stream ending.
            for event in demux.finish() {
                let _ = tx.send(event).await;
            }
            debug!(session = %pump_session, "Receive pump finished");
        });

        Ok(Self {
            session,
            child,
            stdin: Some(stdin),
            events,
            exited: false,
        })
    }

    /// This session's identifier.
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Send user text as a `message` frame. Fire-and-forget: replies arrive
    /// later through [`next_event`](Self::next_event).
    pub async fn send(&mut self, text: &str) -> Result<()> {
        self.write_frame(&Frame::message(text)).await
    }

    /// Send an out-of-band `command` frame (`"clear"`, `"exit"`).
    pub async fn send_command(&mut self, command: &str) -> Result<()> {
        self.write_frame(&Frame::command(command)).await
    }

    async fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| TransportError::Io("Worker stdin closed".into()))?;
        let bytes = codec::encode(frame);
        stdin
            .write_all(&bytes)
            .await
            .map_err(|e| TransportError::Io(e.to_string()))?;
        stdin
            .flush()
            .await
            .map_err(|e| TransportError::Io(e.to_string()))?;
        Ok(())
    }

    /// Receive the next event, in production order.
    ///
    /// Once the worker's output pipe closes and all pending events are
    /// drained, yields one final `WorkerExited` with the reaped exit code,
    /// then `None` forever.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        if let Some(event) = self.events.recv().await {
            return Some(event);
        }

        if !self.exited {
            let code = self.child.wait().await.ok().and_then(|s| s.code());
            self.exited = true;
            info!(session = %self.session, code = ?code, "Worker exited");
            return Some(StreamEvent::WorkerExited { code });
        }

        None
    }

    /// Hard stop: kill the worker immediately. Exit is still reported
    /// through [`next_event`](Self::next_event).
    pub fn kill(&mut self) {
        if let Err(e) = self.child.start_kill() {
            warn!(session = %self.session, error = %e, "Kill failed");
        }
    }

    /// Clean shutdown: ask the worker to exit, close its stdin, and drain
    /// events until it is gone. Returns the exit code.
    pub async fn shutdown(mut self) -> Option<i32> {
        let _ = self.send_command("exit").await;
        self.stdin = None;

        while let Some(event) = self.next_event().await {
            if let StreamEvent::WorkerExited { code } = event {
                return code;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat_config() -> WorkerConfig {
        WorkerConfig {
            command: "cat".into(),
            args: vec![],
            scrub_env: vec![],
        }
    }

    #[test]
    fn build_command_scrubs_configured_vars() {
        let config = WorkerConfig {
            command: "true".into(),
            args: vec![],
            scrub_env: vec!["PYTHONPATH".into(), "PYTHONHOME".into()],
        };
        let cmd = build_command(&config);

        // env_remove shows up as a (key, None) pair on the std command.
        let removed: Vec<_> = cmd
            .as_std()
            .get_envs()
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| k.to_string_lossy().to_string())
            .collect();
        assert!(removed.contains(&"PYTHONPATH".to_string()));
        assert!(removed.contains(&"PYTHONHOME".to_string()));
    }

    #[tokio::test]
    async fn spawn_failure_is_reported() {
        let config = WorkerConfig {
            command: "/nonexistent/agentwire-worker".into(),
            args: vec![],
            scrub_env: vec![],
        };
        let err = WorkerHandle::spawn(&config, DemuxConfig::default())
            .await
            .err()
            .expect("spawn should fail");
        assert!(err.to_string().contains("Failed to spawn"));
    }

    // `cat` echoes our frames back, exercising the full pipe → decoder →
    // demultiplexer path against a real child process.
    #[tokio::test]
    async fn echo_worker_roundtrip() {
        let mut handle = WorkerHandle::spawn(&cat_config(), DemuxConfig::default())
            .await
            .unwrap();

        handle.send("hello pipe").await.unwrap();
        let event = handle.next_event().await.unwrap();
        assert_eq!(
            event,
            StreamEvent::Text {
                content: "hello pipe".into()
            }
        );

        let code = handle.shutdown().await;
        assert_eq!(code, Some(0));
    }

    #[tokio::test]
    async fn shutdown_reports_exit_after_pending_events() {
        let mut handle = WorkerHandle::spawn(&cat_config(), DemuxConfig::default())
            .await
            .unwrap();

        handle.send("one").await.unwrap();
        handle.send("two").await.unwrap();

        // Drain both echoes, then shut down.
        assert_eq!(
            handle.next_event().await.unwrap(),
            StreamEvent::Text {
                content: "one".into()
            }
        );
        assert_eq!(
            handle.next_event().await.unwrap(),
            StreamEvent::Text {
                content: "two".into()
            }
        );
        assert_eq!(handle.shutdown().await, Some(0));
    }

    #[tokio::test]
    async fn kill_surfaces_worker_exit() {
        let mut handle = WorkerHandle::spawn(&cat_config(), DemuxConfig::default())
            .await
            .unwrap();

        handle.kill();
        // Drain until the exit event arrives; the killed process reports no
        // normal exit code.
        loop {
            match handle.next_event().await {
                Some(StreamEvent::WorkerExited { code }) => {
                    assert_eq!(code, None);
                    break;
                }
                Some(_) => continue,
                None => panic!("Channel closed without WorkerExited"),
            }
        }
    }
}
