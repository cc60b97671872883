//! Request orchestration for reward and sync-duty queries
//!
//! Each query is stateless: head check, then the upstream fetches in data
//! dependency order. Nothing is cached between queries.

use crate::beacon::ConsensusClient;
use crate::config::Config;
use crate::error::{Error, QueryError, QueryResultExt};
use crate::execution::ExecutionClient;
use crate::reward::{RewardCalculator, RewardError, RewardResult};
use crate::rpc::block_number_to_hex;
use tracing::{debug, info, warn};

/// Reward query outcome with the beacon payload context it was derived from
#[derive(Debug, Clone)]
pub struct BlockReward {
    pub slot: u64,
    /// Decimal execution block number from the beacon payload
    pub block_number: String,
    pub fee_recipient: String,
    pub gas_used: String,
    /// Raw 0x-prefixed extra data as carried by the beacon payload
    pub extra_data: String,
    pub transaction_count: usize,
    pub reward: RewardResult,
}

/// Sync committee for the epoch containing a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncDuties {
    pub slot: u64,
    pub epoch: u64,
    pub state_id: u64,
    pub validators: Vec<String>,
}

#[derive(Clone)]
pub struct Gateway {
    consensus: ConsensusClient,
    execution: ExecutionClient,
    calculator: RewardCalculator,
}

/// Parse a slot path parameter as a base-10 unsigned integer
pub fn parse_slot(raw: &str) -> Result<u64, QueryError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(QueryError::new(
            "invalid slot parameter",
            Error::InvalidInput(raw.to_string()),
        ));
    }
    raw.parse::<u64>()
        .map_err(|e| Error::InvalidInput(format!("{:?}: {}", raw, e)))
        .public("invalid slot parameter")
}

impl Gateway {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self::from_parts(
            ConsensusClient::new(&config.upstream)?,
            ExecutionClient::new(&config.upstream)?,
            RewardCalculator::new(config.reward.relay_extra_data_threshold),
        ))
    }

    pub fn from_parts(
        consensus: ConsensusClient,
        execution: ExecutionClient,
        calculator: RewardCalculator,
    ) -> Self {
        Self {
            consensus,
            execution,
            calculator,
        }
    }

    /// Reject slots beyond the node's head before anything else is fetched
    async fn check_not_future(&self, slot: u64, message: &'static str) -> Result<(), QueryError> {
        let head = self
            .consensus
            .get_head_slot()
            .await
            .public("failed to fetch head slot")
            .inspect_err(log_failure)?;

        if slot > head {
            debug!("Rejecting slot {} beyond head {}", slot, head);
            return Err(QueryError::new(message, Error::FutureSlot { slot, head }));
        }
        Ok(())
    }

    /// Total priority-fee reward and build pathway for the block at `slot`
    pub async fn block_reward(&self, slot: u64) -> Result<BlockReward, QueryError> {
        debug!("Block reward query for slot {}", slot);
        self.check_not_future(slot, "requested slot is in the future")
            .await?;

        let beacon_block = self
            .consensus
            .get_beacon_block_by_slot(slot)
            .await
            .public_by_kind("slot not found/missed", "failed to get beacon block")
            .inspect_err(log_failure)?;

        let payload = beacon_block.execution_payload();
        if payload.is_empty() {
            return Err(QueryError::new(
                "no execution payload for this slot",
                Error::NotFound(format!("slot {} has no execution payload", slot)),
            ));
        }

        let block_number_hex = block_number_to_hex(&payload.block_number)
            .public("invalid block number format")
            .inspect_err(log_failure)?;

        let execution_block = self
            .execution
            .get_execution_block_by_number(&block_number_hex)
            .await
            .public_by_kind("execution block not found", "failed to get execution block")
            .inspect_err(log_failure)?;

        let reward = self
            .calculator
            .compute(&execution_block)
            .map_err(|e| {
                let message = match e {
                    RewardError::BaseFee(_) => "invalid base fee",
                    RewardError::ExtraData(_) => "invalid extra data",
                    RewardError::Overflow => "failed to compute reward",
                };
                QueryError::new(message, e.into())
            })
            .inspect_err(log_failure)?;

        info!(
            slot,
            block_number = %payload.block_number,
            status = %reward.status,
            reward_gwei = %reward.reward_gwei,
            skipped = reward.skipped_transactions,
            "Computed block reward"
        );

        Ok(BlockReward {
            slot,
            block_number: payload.block_number.clone(),
            fee_recipient: payload.fee_recipient.clone(),
            gas_used: payload.gas_used.clone(),
            extra_data: payload.extra_data.clone(),
            transaction_count: execution_block.transactions.len(),
            reward,
        })
    }

    /// Sync committee validators for the epoch containing `slot`
    pub async fn sync_duties(&self, slot: u64) -> Result<SyncDuties, QueryError> {
        debug!("Sync duties query for slot {}", slot);
        self.check_not_future(slot, "requested slot is too far in the future")
            .await?;

        let (window, validators) = self
            .consensus
            .get_sync_committee_duties(slot)
            .await
            .public_by_kind(
                "sync committee duties not found",
                "failed to get sync committee duties",
            )
            .inspect_err(log_failure)?;

        Ok(SyncDuties {
            slot,
            epoch: window.epoch,
            state_id: window.state_id,
            validators,
        })
    }
}

fn log_failure(e: &QueryError) {
    if e.source.is_client_facing() {
        debug!("{}: {}", e.message, e.source);
    } else {
        warn!("{}: {}", e.message, e.source);
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::config::Config;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const HEAD_SLOT: u64 = 10591000;
    pub const RELAY_SLOT: u64 = 10590951;
    pub const VANILLA_SLOT: u64 = 10589928;
    pub const MISSED_SLOT: u64 = 10590000;

    /// "Titan (titanbuilder.xyz)", 24 bytes
    pub const RELAY_EXTRA_DATA: &str = "0x546974616e2028746974616e6275696c6465722e78797a29";
    /// "Nethermind", 10 bytes
    pub const VANILLA_EXTRA_DATA: &str = "0x4e65746865726d696e64";

    pub fn config_for(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.upstream.endpoint = server.uri();
        config.upstream.timeout_ms = 1000;
        config
    }

    pub async fn mount_head(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/eth/v1/beacon/headers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"header": {"message": {"slot": HEAD_SLOT.to_string()}}}]
            })))
            .mount(server)
            .await;
    }

    pub async fn mount_beacon_block(server: &MockServer, slot: u64, block_number: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/eth/v2/beacon/blocks/{}", slot)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "version": "deneb",
                "data": {"message": {"slot": slot.to_string(), "body": {
                    "execution_payload": {
                        "block_number": block_number,
                        "fee_recipient": "0x4838b106fce9647bdf1e7877bf73ce8b0bad5f97",
                        "extra_data": "0x546974616e",
                        "base_fee_per_gas": "12000000000",
                        "gas_used": "20850"
                    }
                }}}
            })))
            .mount(server)
            .await;
    }

    pub async fn mount_missed_slot(server: &MockServer, slot: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/eth/v2/beacon/blocks/{}", slot)))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": 404, "message": "NOT_FOUND: beacon block"
            })))
            .mount(server)
            .await;
    }

    /// Block worth 20850 gwei: one 1-gwei tip on 20850 gas, one under base
    /// fee, one without a gasPrice field
    pub fn execution_block(number_hex: &str, extra_data: &str) -> Value {
        json!({
            "number": number_hex,
            "hash": "0x9f0b",
            "baseFeePerGas": "0x2cb417800",
            "extraData": extra_data,
            "transactions": [
                {"hash": "0xa1", "gas": "0x5172", "gasPrice": "0x306dc4200", "type": "0x2"},
                {"hash": "0xa2", "gas": "0x5208", "gasPrice": "0x28fa6ae00", "type": "0x0"},
                {"hash": "0xa3", "gas": "0x5208", "type": "0x7e"}
            ]
        })
    }

    pub async fn mount_execution_block(server: &MockServer, block: Value) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 1, "result": block
            })))
            .mount(server)
            .await;
    }

    pub async fn mount_sync_committee(server: &MockServer, validators: &[&str]) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/eth/v1/beacon/states/\d+/sync_committees$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "execution_optimistic": false,
                "finalized": true,
                "data": {"validators": validators}
            })))
            .mount(server)
            .await;
    }

    /// Any execution-layer call fails the test when the server is verified
    pub async fn forbid_execution_calls(server: &MockServer) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(server)
            .await;
    }
}
