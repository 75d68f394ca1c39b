//! AgentWire CLI — the main entry point.
//!
//! Commands:
//! - `host`   — Spawn the worker and chat with it (interactive or one-shot)
//! - `worker` — Run the agent loop on stdio (what `host` spawns)
//! - `doctor` — Check configuration and report what would run

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "agentwire",
    about = "AgentWire — a streaming host/worker agent runtime",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Spawn the worker and chat with it
    Host {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Run the agent worker loop on stdio
    Worker,

    /// Check configuration and report what would run
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr: in worker mode stdout is the frame stream, and in
    // host mode stdout is the user's conversation.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Host { message } => commands::host::run(message).await?,
        Commands::Worker => commands::worker::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
