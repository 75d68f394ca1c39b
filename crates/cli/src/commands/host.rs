//! `agentwire host` — spawn the worker and chat with it.
//!
//! The host never parses model output itself: everything it shows comes
//! from the ordered event stream the transport produces. Text events print
//! as they arrive, so tool-streamed responses appear while the worker is
//! still generating them.

use agentwire_config::AppConfig;
use agentwire_host::WorkerHandle;
use agentwire_protocol::{DemuxConfig, StreamEvent};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let demux_config = DemuxConfig {
        text_tools: config.streaming.text_tools.clone(),
        extract_key: config.streaming.extract_key.clone(),
        terminal_tool: config.streaming.terminal_tool.clone(),
    };

    let mut handle = WorkerHandle::spawn(&config.worker, demux_config).await?;

    if let Some(msg) = message {
        // Single message mode: one turn, then a clean shutdown.
        handle.send(&msg).await?;
        while let Some(event) = handle.next_event().await {
            match event {
                StreamEvent::Text { content } => {
                    print!("{content}");
                    std::io::stdout().flush()?;
                }
                StreamEvent::Error { message } => eprintln!("[error] {message}"),
                StreamEvent::RunFinished => break,
                StreamEvent::WorkerExited { code } => {
                    return Err(format!("Worker exited early (code: {code:?})").into());
                }
                other => debug!(event = other.kind(), "Event"),
            }
        }
        println!();
        handle.shutdown().await;
        return Ok(());
    }

    // Interactive mode.
    println!();
    println!("  AgentWire — Interactive Mode");
    println!();
    println!("  Backend:  {}", config.provider.backend);
    println!("  Model:    {}", config.provider.model);
    println!("  Worker:   {}", config.worker.command);
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type '/clear' to reset memory, 'exit' to quit.");
    println!();

    // Feed user lines through a channel so we can select against events.
    let (line_tx, mut line_rx) = mpsc::channel::<String>(8);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    prompt()?;
    loop {
        tokio::select! {
            maybe_line = line_rx.recv() => {
                let Some(line) = maybe_line else { break };
                let line = line.trim().to_string();
                if line.is_empty() {
                    prompt()?;
                    continue;
                }
                match line.as_str() {
                    "exit" | "quit" | "/exit" | "/quit" => break,
                    "/clear" => {
                        handle.send_command("clear").await?;
                        prompt()?;
                    }
                    _ => {
                        handle.send(&line).await?;
                        println!();
                    }
                }
            }
            maybe_event = handle.next_event() => {
                let Some(event) = maybe_event else { break };
                match event {
                    StreamEvent::Text { content } => {
                        print!("{content}");
                        std::io::stdout().flush()?;
                    }
                    StreamEvent::RunFinished => {
                        println!();
                        println!();
                        prompt()?;
                    }
                    StreamEvent::ToolStarted { name } => {
                        debug!(tool = %name, "Tool started");
                    }
                    StreamEvent::ToolFinished { name } => {
                        debug!(tool = %name, "Tool finished");
                    }
                    StreamEvent::Status { message } => {
                        debug!("{message}");
                    }
                    StreamEvent::Error { message } => {
                        eprintln!("  [worker error] {message}");
                    }
                    StreamEvent::WorkerExited { code } => {
                        eprintln!("  Worker exited (code: {code:?}). Session over.");
                        return Err("Worker exited unexpectedly".into());
                    }
                }
            }
        }
    }

    handle.shutdown().await;
    println!();
    println!("  Goodbye!");
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}
