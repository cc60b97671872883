use super::timing::CommitteeWindow;
use super::types::{BeaconBlockResponse, HeadersResponse, SyncCommitteeResponse};
use crate::config::UpstreamConfig;
use crate::error::Error;
use crate::rpc::http_client;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Consensus-layer REST client
#[derive(Clone)]
pub struct ConsensusClient {
    client: Client,
    endpoint: String,
}

impl ConsensusClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, Error> {
        Ok(Self {
            client: http_client(config.timeout())?,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Slot of the most recent header known to the node
    pub async fn get_head_slot(&self) -> Result<u64, Error> {
        let url = format!("{}/eth/v1/beacon/headers", self.endpoint);
        let headers: HeadersResponse = self
            .get_json(&url)
            .await?
            .ok_or_else(|| Error::Upstream("headers endpoint returned 404".to_string()))?;

        let header = headers
            .data
            .first()
            .ok_or_else(|| Error::Upstream("no header data returned".to_string()))?;

        let slot = &header.header.message.slot;
        slot.parse::<u64>()
            .map_err(|e| Error::Parse(format!("invalid head slot {:?}: {}", slot, e)))
    }

    /// Beacon block at `slot`, or `NotFound` when the slot was missed
    pub async fn get_beacon_block_by_slot(&self, slot: u64) -> Result<BeaconBlockResponse, Error> {
        let url = format!("{}/eth/v2/beacon/blocks/{}", self.endpoint, slot);
        self.get_json(&url)
            .await?
            .ok_or_else(|| Error::NotFound(format!("no beacon block at slot {}", slot)))
    }

    /// Sync committee validator indices for the epoch containing `slot`,
    /// together with the window that was queried
    pub async fn get_sync_committee_duties(
        &self,
        slot: u64,
    ) -> Result<(CommitteeWindow, Vec<String>), Error> {
        let window = CommitteeWindow::for_slot(slot);
        let url = format!(
            "{}/eth/v1/beacon/states/{}/sync_committees?epoch={}",
            self.endpoint, window.state_id, window.epoch
        );

        let committee: SyncCommitteeResponse = self.get_json(&url).await?.ok_or_else(|| {
            Error::NotFound(format!("no sync committee for epoch {}", window.epoch))
        })?;

        Ok((window, committee.data.validators))
    }

    /// GET and decode; `Ok(None)` on 404, `Upstream` on any other non-2xx
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, Error> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "unexpected status code {} from {}",
                status.as_u16(),
                url
            )));
        }

        let body = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }
}
