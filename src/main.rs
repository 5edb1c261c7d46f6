use anyhow::{Context, Result};
use clap::Parser;
use erma::cli::{run_console, Cli};
use erma::{Config, MonitoringEngine};
use tokio::io::{self, BufReader};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments first to get debug flag
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load_or_default(&cli.config).context("Failed to load config")?;
    let mut manager = config
        .build_manager(MonitoringEngine::global())
        .await
        .context("Failed to configure monitoring engine manager")?;

    println!("🎯 erma console");
    println!("📂 Config file: {}", cli.config.display());
    if !cli.manual {
        manager.startup().await;
        println!("🚀 Monitoring engine started");
    }
    println!("💡 Type 'help' for commands, Ctrl+C to stop");

    let stdin = BufReader::new(io::stdin());
    tokio::select! {
        result = run_console(&mut manager, stdin, io::stdout()) => result?,
        result = signal::ctrl_c() => {
            result.context("Failed to listen for ctrl_c")?;
            println!("\n🛑 Received Ctrl+C, shutting down...");
        }
    }

    if manager.is_started() {
        manager.shutdown().await?;
    }
    println!("🧹 Shut down");

    Ok(())
}
