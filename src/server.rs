//! HTTP boundary: maps slot queries onto the gateway and results onto JSON
//!
//! - `GET /blockreward/{slot}` → `{"status", "reward"}`
//! - `GET /syncduties/{slot}`  → `{"validators": [...]}`
//! - `GET /healthz`            → liveness probe

use crate::error::{Error, QueryError};
use crate::gateway::{parse_slot, Gateway};
use crate::reward::BlockStatus;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Serialize)]
struct RewardResponse {
    status: BlockStatus,
    reward: String,
}

#[derive(Debug, Serialize)]
struct SyncDutiesResponse {
    validators: Vec<String>,
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = match self.source {
            Error::InvalidInput(_) | Error::FutureSlot { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Upstream(_) | Error::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.message }))).into_response()
    }
}

async fn block_reward_handler(
    Path(slot): Path<String>,
    State(gateway): State<Arc<Gateway>>,
) -> Result<Json<RewardResponse>, QueryError> {
    let slot = parse_slot(&slot)?;
    let result = gateway.block_reward(slot).await?;

    Ok(Json(RewardResponse {
        status: result.reward.status,
        reward: result.reward.reward_gwei.to_string(),
    }))
}

async fn sync_duties_handler(
    Path(slot): Path<String>,
    State(gateway): State<Arc<Gateway>>,
) -> Result<Json<SyncDutiesResponse>, QueryError> {
    let slot = parse_slot(&slot)?;
    let duties = gateway.sync_duties(slot).await?;

    Ok(Json(SyncDutiesResponse {
        validators: duties.validators,
    }))
}

async fn healthz_handler() -> StatusCode {
    StatusCode::OK
}

async fn fallback_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/blockreward/{slot}", get(block_reward_handler))
        .route("/syncduties/{slot}", get(sync_duties_handler))
        .route("/healthz", get(healthz_handler))
        .fallback(fallback_handler)
        .with_state(gateway)
}

/// Serve until `shutdown` resolves; in-flight requests are allowed to finish
pub async fn serve(
    listener: TcpListener,
    gateway: Gateway,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(Arc::new(gateway)))
        .with_graceful_shutdown(shutdown)
        .await
}
