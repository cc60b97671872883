//! Configuration management command

use crate::config::Config;
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration (after applying all overrides)
    Show,

    /// Validate configuration
    Validate,

    /// Print example configuration file
    Example,

    /// Show configuration file search paths
    Paths,
}

pub async fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => run_show()?,
        ConfigCommands::Validate => run_validate()?,
        ConfigCommands::Example => run_example(),
        ConfigCommands::Paths => run_paths(),
    }

    Ok(())
}

fn run_show() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration:");
    println!("=====================\n");
    println!("{}", toml::to_string_pretty(&config)?);
    println!("Priority: CLI flags > Environment variables > Config file > Defaults");

    Ok(())
}

fn run_validate() -> Result<()> {
    println!("Validating configuration...\n");

    if !Config::config_file_paths().iter().any(|p| p.exists()) {
        println!("{}\n", Config::config_not_found_help());
    }

    let config = Config::load()?;
    match config.validate() {
        Ok(()) => {
            println!("✓ Configuration is valid");
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration validation failed: {}", e);
            Err(e)
        }
    }
}

fn run_example() {
    println!(
        r#"# Ethereum Rewards API Configuration File
#
# Location priority (first found is used):
#   1. ./eth-rewards-api.toml (current directory)
#   2. ~/.config/eth-rewards-api/config.toml (user config)
#   3. /etc/eth-rewards-api/config.toml (system)
#
# Override priority: CLI flags > Environment variables > Config file > Defaults
#
# Environment variables (a .env file in the working directory is also read):
#   ERA_ENDPOINT (or QUICKNODE_ENDPOINT), ERA_TIMEOUT_MS, ERA_LISTEN_ADDR,
#   ERA_PID_FILE, ERA_RELAY_THRESHOLD

[upstream]
# Node URL serving both the beacon REST API and execution JSON-RPC
endpoint = "http://localhost:5052"
# Per-request timeout in milliseconds; a timeout fails the query
timeout_ms = 10000

[server]
# HTTP listen address
listen_addr = "0.0.0.0:8080"
# PID file (optional)
# pid_file = "/run/eth-rewards-api.pid"

[reward]
# Blocks whose extra data is longer than this many bytes are reported as relay-built
relay_extra_data_threshold = 20
"#
    );
}

fn run_paths() {
    println!("Configuration File Search Paths:");
    println!("================================\n");

    for (i, path) in Config::config_file_paths().iter().enumerate() {
        let exists = if path.exists() { "✓ EXISTS" } else { "  " };
        println!("{}. {} {}", i + 1, path.display(), exists);
    }

    println!("\nThe first file found will be used.");
}
