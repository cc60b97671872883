//! Execution-layer access over JSON-RPC

use crate::config::UpstreamConfig;
use crate::error::Error;
use crate::rpc::{ExecutionBlock, RpcClient};
use tracing::debug;

/// Fetches full execution blocks by number
#[derive(Clone)]
pub struct ExecutionClient {
    rpc: RpcClient,
}

impl ExecutionClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, Error> {
        Ok(Self {
            rpc: RpcClient::new(config)?,
        })
    }

    /// Block `block_number_hex` (0x-prefixed) with full transaction objects.
    ///
    /// A `null` result or an empty `number` means the node has no data for
    /// that number yet and is reported as `NotFound`.
    pub async fn get_execution_block_by_number(
        &self,
        block_number_hex: &str,
    ) -> Result<ExecutionBlock, Error> {
        if !block_number_hex.starts_with("0x") {
            return Err(Error::InvalidInput(format!(
                "block number must be 0x-prefixed hex, got {:?}",
                block_number_hex
            )));
        }

        let block: Option<ExecutionBlock> = self
            .rpc
            .call("eth_getBlockByNumber", (block_number_hex, true))
            .await?;

        match block {
            Some(block) if !block.number.is_empty() => {
                debug!(
                    "Fetched execution block {} with {} transactions",
                    block.number,
                    block.transactions.len()
                );
                Ok(block)
            }
            _ => Err(Error::NotFound(format!(
                "block {} not found on execution layer",
                block_number_hex
            ))),
        }
    }
}
