use crate::config::UpstreamConfig;
use crate::error::Error;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Serialize)]
struct JsonRpcRequest<P: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: String,
    params: P,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Build an HTTP client with a fixed per-request timeout
pub fn http_client(timeout: Duration) -> Result<Client, Error> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Upstream(format!("failed to build HTTP client: {}", e)))
}

/// JSON-RPC 2.0 client over HTTP POST
#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    endpoint: String,
}

impl RpcClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, Error> {
        Ok(Self {
            client: http_client(config.timeout())?,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Issue `method` with `params`; a `null` result comes back as `None`
    pub async fn call<P, R>(&self, method: &str, params: P) -> Result<Option<R>, Error>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: REQUEST_ID.fetch_add(1, Ordering::SeqCst),
            method: method.to_string(),
            params,
        };
        debug!("POST {} {} (id {})", self.endpoint, method, request.id);

        let response = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "unexpected status code {} for {}",
                status.as_u16(),
                method
            )));
        }

        let body = response.bytes().await?;
        let rpc_response: JsonRpcResponse<R> = serde_json::from_slice(&body)?;

        if let Some(error) = rpc_response.error {
            return Err(Error::Upstream(format!(
                "RPC error {}: {}",
                error.code, error.message
            )));
        }

        Ok(rpc_response.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> RpcClient {
        RpcClient::new(&UpstreamConfig {
            endpoint: server.uri(),
            timeout_ms: 500,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_call_sends_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "jsonrpc": "2.0",
                "method": "eth_chainId",
                "params": []
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 1, "result": "0x1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result: Option<String> = client_for(&server)
            .call("eth_chainId", Vec::<()>::new())
            .await
            .unwrap();
        assert_eq!(result.as_deref(), Some("0x1"));
    }

    #[tokio::test]
    async fn test_null_result_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 1, "result": null
            })))
            .mount(&server)
            .await;

        let result: Option<String> = client_for(&server)
            .call("eth_getBlockByNumber", ("0x1", true))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_rpc_error_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 1,
                "error": {"code": -32000, "message": "header not found"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .call::<_, String>("eth_getBlockByNumber", ("0x1", true))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(ref m) if m.contains("header not found")));
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .call::<_, String>("eth_blockNumber", Vec::<()>::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn test_garbage_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .call::<_, String>("eth_blockNumber", Vec::<()>::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
