//! Proposer priority-fee reward for an execution block
//!
//! The reward is the sum over transactions of `(gasPrice - baseFee) * gas`,
//! counting only transactions priced strictly above the base fee, converted
//! to gwei with truncating division. Transactions whose quantities do not
//! parse are left out of the sum; a malformed base fee fails the whole block.

use crate::error::Error;
use crate::rpc::{decode_hex_data, parse_hex_quantity, ExecutionBlock};
use alloy_primitives::U256;
use serde::Serialize;
use std::fmt;
use thiserror::Error as ThisError;
use tracing::debug;

/// Wei per gwei
pub const WEI_PER_GWEI: u64 = 1_000_000_000;

/// Extra-data length (bytes) above which a block is classed as relay-built
pub const DEFAULT_RELAY_EXTRA_DATA_THRESHOLD: usize = 20;

/// How the block was most likely built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStatus {
    /// Built locally by the proposer's own execution client
    Vanilla,
    /// Built by an external builder and delivered through an MEV relay
    Relay,
}

impl BlockStatus {
    /// Classify from decoded extra-data length; heuristic, not provenance proof
    pub fn classify(extra_data_len: usize, threshold: usize) -> Self {
        if extra_data_len > threshold {
            BlockStatus::Relay
        } else {
            BlockStatus::Vanilla
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockStatus::Vanilla => "vanilla",
            BlockStatus::Relay => "relay",
        }
    }
}

impl fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Block-level failures; per-transaction problems never surface here
#[derive(Debug, ThisError)]
pub enum RewardError {
    #[error("invalid base fee: {0}")]
    BaseFee(#[source] Error),

    #[error("invalid extra data: {0}")]
    ExtraData(#[source] Error),

    #[error("reward sum exceeds 256 bits")]
    Overflow,
}

impl From<RewardError> for Error {
    fn from(e: RewardError) -> Self {
        Error::Parse(e.to_string())
    }
}

/// Derived reward for one block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardResult {
    pub status: BlockStatus,
    pub reward_gwei: U256,
    pub total_reward_wei: U256,
    /// Transactions that contributed a positive priority fee
    pub counted_transactions: usize,
    /// Transactions left out because gas or gasPrice did not parse
    pub skipped_transactions: usize,
}

/// Computes priority-fee rewards and relay classification
#[derive(Debug, Clone, Copy)]
pub struct RewardCalculator {
    relay_threshold: usize,
}

impl Default for RewardCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_EXTRA_DATA_THRESHOLD)
    }
}

impl RewardCalculator {
    pub fn new(relay_threshold: usize) -> Self {
        Self { relay_threshold }
    }

    pub fn compute(&self, block: &ExecutionBlock) -> Result<RewardResult, RewardError> {
        let base_fee = parse_hex_quantity(&block.base_fee_per_gas).map_err(RewardError::BaseFee)?;

        let mut total = U256::ZERO;
        let mut counted = 0usize;
        let mut skipped = 0usize;

        for tx in &block.transactions {
            let (gas_price, gas) = match (
                parse_hex_quantity(&tx.gas_price),
                parse_hex_quantity(&tx.gas),
            ) {
                (Ok(price), Ok(gas)) => (price, gas),
                _ => {
                    debug!("Skipping transaction {} with unparseable gas fields", tx.hash);
                    skipped += 1;
                    continue;
                }
            };

            if gas_price <= base_fee {
                continue;
            }

            let Some(contribution) = (gas_price - base_fee).checked_mul(gas) else {
                debug!("Skipping transaction {} with out-of-range gas fields", tx.hash);
                skipped += 1;
                continue;
            };

            total = total.checked_add(contribution).ok_or(RewardError::Overflow)?;
            counted += 1;
        }

        let extra_data = decode_hex_data(&block.extra_data).map_err(RewardError::ExtraData)?;

        Ok(RewardResult {
            status: BlockStatus::classify(extra_data.len(), self.relay_threshold),
            reward_gwei: total / U256::from(WEI_PER_GWEI),
            total_reward_wei: total,
            counted_transactions: counted,
            skipped_transactions: skipped,
        })
    }
}
