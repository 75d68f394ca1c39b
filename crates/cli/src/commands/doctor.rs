//! `agentwire doctor` — check configuration and report what would run.

use agentwire_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!();
    println!("  AgentWire configuration");
    println!();
    println!("  Config dir:    {}", AppConfig::config_dir().display());
    println!("  Backend:       {}", config.provider.backend);
    println!("  Model:         {}", config.provider.model);
    println!(
        "  API key:       {}",
        if config.api_key.is_some() {
            "configured"
        } else {
            "missing"
        }
    );
    println!("  Worker:        {} {}", config.worker.command, config.worker.args.join(" "));
    println!("  Scrubbed env:  {}", config.worker.scrub_env.join(", "));
    println!("  Max steps:     {}", config.agent.max_steps);
    println!("  Memory bound:  {} messages", config.agent.max_messages);
    println!("  Text tools:    {}", config.streaming.text_tools.join(", "));
    println!("  Extract key:   {}", config.streaming.extract_key);
    println!("  Terminal tool: {}", config.streaming.terminal_tool);
    println!();

    if config.provider.backend == "openai" && config.api_key.is_none() {
        println!("  WARNING: the openai backend needs an API key.");
        println!("  Set AGENTWIRE_API_KEY or OPENAI_API_KEY, or add api_key to:");
        println!("    {}", AppConfig::config_dir().join("config.toml").display());
        println!();
        println!("  Tip: set AGENTWIRE_BACKEND=scripted to try the pipeline offline.");
        println!();
    }

    Ok(())
}
