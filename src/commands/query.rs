//! One-shot query commands against the configured upstream node

use crate::config::Config;
use crate::gateway::{parse_slot, Gateway};
use crate::rpc::decode_hex_data;
use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

/// Reward command arguments
#[derive(Args, Debug)]
pub struct RewardArgs {
    /// Slot to query
    pub slot: String,

    /// Upstream node URL
    #[arg(short, long)]
    pub endpoint: Option<String>,
}

/// Duties command arguments
#[derive(Args, Debug)]
pub struct DutiesArgs {
    /// Slot to query
    pub slot: String,

    /// Upstream node URL
    #[arg(short, long)]
    pub endpoint: Option<String>,
}

fn gateway_for(endpoint: Option<String>) -> Result<Gateway> {
    let mut config = Config::load()?;
    if let Some(endpoint) = endpoint {
        config.upstream.endpoint = endpoint;
    }
    config.validate()?;
    Gateway::new(&config).context("Failed to create upstream clients")
}

/// Run the reward command
pub async fn run_reward(args: RewardArgs) -> Result<()> {
    let gateway = gateway_for(args.endpoint)?;
    let slot = parse_slot(&args.slot)?;
    let result = gateway.block_reward(slot).await?;

    info!("Block reward for slot {}", result.slot);
    info!("─────────────────────────────────────────");
    info!("Status:        {}", result.reward.status);
    info!("Reward:        {} gwei", result.reward.reward_gwei);
    info!("Reward (wei):  {}", result.reward.total_reward_wei);
    info!("Block number:  {}", result.block_number);
    info!("Fee recipient: {}", result.fee_recipient);
    info!("Gas used:      {}", result.gas_used);
    match decode_hex_data(&result.extra_data)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
    {
        Some(text) => info!("Extra data:    {} ({:?})", result.extra_data, text),
        None => info!("Extra data:    {}", result.extra_data),
    }
    info!(
        "Transactions:  {} ({} paying priority fees, {} skipped)",
        result.transaction_count,
        result.reward.counted_transactions,
        result.reward.skipped_transactions
    );

    Ok(())
}

/// Run the duties command
pub async fn run_duties(args: DutiesArgs) -> Result<()> {
    let gateway = gateway_for(args.endpoint)?;
    let slot = parse_slot(&args.slot)?;
    let duties = gateway.sync_duties(slot).await?;

    info!("Sync committee for slot {}", duties.slot);
    info!("─────────────────────────────────────────");
    info!("Epoch:      {}", duties.epoch);
    info!("State ID:   {}", duties.state_id);
    info!("Validators: {}", duties.validators.len());

    for chunk in duties.validators.chunks(8) {
        info!("  {}", chunk.join(", "));
    }

    Ok(())
}
