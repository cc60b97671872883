//! Serve command - run the HTTP gateway

use crate::config::Config;
use crate::daemon::{shutdown_signal, PidFile};
use crate::gateway::Gateway;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

/// Serve command arguments
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Upstream node URL (beacon REST and execution JSON-RPC)
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Address to listen on
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Upstream request timeout in milliseconds
    #[arg(short, long)]
    pub timeout_ms: Option<u64>,

    /// PID file path
    #[arg(long)]
    pub pid_file: Option<PathBuf>,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(endpoint) = args.endpoint {
        config.upstream.endpoint = endpoint;
    }
    if let Some(listen) = args.listen {
        config.server.listen_addr = listen;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.upstream.timeout_ms = timeout_ms;
    }
    config.validate()?;

    let pid_path = args
        .pid_file
        .or_else(|| config.server.pid_file.as_ref().map(PathBuf::from));
    let _pid_file = match pid_path {
        Some(ref path) => {
            let pid_file = PidFile::create(path)?;
            info!("PID {} written to {}", pid_file.pid(), path.display());
            Some(pid_file)
        }
        None => None,
    };

    info!("Starting rewards gateway");
    info!("Upstream endpoint: {}", config.upstream.endpoint);
    info!("Upstream timeout: {}ms", config.upstream.timeout_ms);
    info!(
        "Relay extra-data threshold: {} bytes",
        config.reward.relay_extra_data_threshold
    );

    let gateway = Gateway::new(&config).context("Failed to create upstream clients")?;

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let shutdown = shutdown_signal().await?;
    crate::server::serve(listener, gateway, shutdown)
        .await
        .context("HTTP server failed")?;

    info!("Gateway stopped");
    Ok(())
}
