mod beacon;
mod commands;
mod config;
mod daemon;
mod error;
mod execution;
mod gateway;
mod reward;
mod rpc;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

/// Ethereum Rewards API - block rewards and sync committee duties over HTTP
#[derive(Parser, Debug)]
#[command(name = "eth-rewards-api")]
#[command(about = "Read-only HTTP gateway for Ethereum block rewards and sync committee duties")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format: text or json
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP gateway
    Serve(commands::ServeArgs),

    /// Compute the priority-fee reward for the block at a slot
    Reward(commands::RewardArgs),

    /// List sync committee validators for a slot's epoch
    Duties(commands::DutiesArgs),

    /// Inspect configuration
    Config(commands::ConfigArgs),
}

fn init_logging(verbose: bool, format: &str) -> Result<()> {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if format == "json" {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
    } else {
        builder
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, &cli.log_format)?;

    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file loaded: {}", e);
    }

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args).await,
        Commands::Reward(args) => commands::query::run_reward(args).await,
        Commands::Duties(args) => commands::query::run_duties(args).await,
        Commands::Config(args) => commands::config::run(args).await,
    }
}
