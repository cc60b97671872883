use serde::Deserialize;

/// Response from GET /eth/v1/beacon/headers
#[derive(Debug, Clone, Deserialize)]
pub struct HeadersResponse {
    #[serde(default)]
    pub data: Vec<HeaderEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeaderEntry {
    pub header: SignedHeader,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignedHeader {
    pub message: HeaderMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeaderMessage {
    /// Decimal slot number
    pub slot: String,
}

/// Response from GET /eth/v2/beacon/blocks/{slot}
#[derive(Debug, Clone, Deserialize)]
pub struct BeaconBlockResponse {
    pub data: SignedBeaconBlock,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignedBeaconBlock {
    pub message: BeaconBlockMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BeaconBlockMessage {
    pub body: BeaconBlockBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BeaconBlockBody {
    /// Absent before the merge
    #[serde(default)]
    pub execution_payload: ExecutionPayload,
}

/// Subset of the execution payload embedded in a beacon block.
///
/// Numeric fields are decimal strings; `extra_data` is 0x-prefixed hex.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExecutionPayload {
    pub block_number: String,
    pub fee_recipient: String,
    pub extra_data: String,
    pub gas_used: String,
}

impl ExecutionPayload {
    /// A payload with no block number carries no execution block
    pub fn is_empty(&self) -> bool {
        self.block_number.is_empty()
    }
}

impl BeaconBlockResponse {
    pub fn execution_payload(&self) -> &ExecutionPayload {
        &self.data.message.body.execution_payload
    }
}

/// Response from GET /eth/v1/beacon/states/{state_id}/sync_committees
#[derive(Debug, Clone, Deserialize)]
pub struct SyncCommitteeResponse {
    pub data: SyncCommittee,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncCommittee {
    /// Validator indices as decimal strings, in committee order
    pub validators: Vec<String>,
}
