//! `agentwire worker` — the agent loop on stdio.
//!
//! Stdin carries inbound frames from the host; stdout carries progress
//! frames; stderr carries logs. This is the process the `host` command
//! spawns, but it can also be driven by hand:
//!
//! ```text
//! $ agentwire worker
//! {"type": "message", "content": "who are you?"}
//! {"type": "command", "content": "exit"}
//! ```

use agentwire_agent::{pump_frames, AgentRunner, Worker};
use agentwire_config::AppConfig;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::info;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let provider = agentwire_providers::build_from_config(&config)?;

    let mut router = agentwire_tools::default_router();
    if let Some(namespace) = &config.agent.tool_namespace {
        router = router.with_namespace(namespace);
    }

    let (tx, rx) = mpsc::channel(256);
    let runner = AgentRunner::new(
        provider,
        &config.provider.model,
        router,
        config.agent.clone(),
        tx.clone(),
    )
    .with_temperature(config.provider.temperature)
    .with_max_tokens(config.provider.max_tokens)
    .with_special_tools(vec![config.streaming.terminal_tool.clone()]);

    // One writer task serializes every progress frame onto stdout.
    let writer = tokio::spawn(pump_frames(rx, tokio::io::stdout()));

    info!(
        backend = %config.provider.backend,
        model = %config.provider.model,
        "Worker ready"
    );

    let mut worker = Worker::new(runner, tx);
    let result = worker.run(BufReader::new(tokio::io::stdin())).await;

    // Dropping the worker closes the frame channel so the writer drains
    // everything and stops.
    drop(worker);
    let _ = writer.await;

    result.map_err(Into::into)
}
