//! Error taxonomy shared by the data clients, the reward calculator and the gateway

use thiserror::Error;

/// Failure kinds surfaced by upstream queries and request validation
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-supplied value is malformed (slot parameter, block number form)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Requested slot lies beyond the node's current head
    #[error("slot {slot} is beyond head slot {head}")]
    FutureSlot { slot: u64, head: u64 },

    /// Expected absence: missed slot, no payload, no committee, unknown block
    #[error("not found: {0}")]
    NotFound(String),

    /// Transport failure, timeout, or unexpected status from the upstream node
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Malformed field in an otherwise successful response
    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// True for outcomes caused by the caller or by absent chain data
    pub fn is_client_facing(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::FutureSlot { .. } | Error::NotFound(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Parse(e.to_string())
        } else {
            Error::Upstream(e.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

/// A query failure paired with the short message returned to callers.
///
/// `source` keeps the full detail for logs; `message` is all that leaves the process.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct QueryError {
    pub message: &'static str,
    #[source]
    pub source: Error,
}

impl QueryError {
    pub fn new(message: &'static str, source: Error) -> Self {
        Self { message, source }
    }
}

/// Attach a public message to a fallible step, in the style of `anyhow::Context`
pub trait QueryResultExt<T> {
    fn public(self, message: &'static str) -> Result<T, QueryError>;

    /// Pick the message by outcome: absence versus failure
    fn public_by_kind(
        self,
        not_found: &'static str,
        failed: &'static str,
    ) -> Result<T, QueryError>;
}

impl<T> QueryResultExt<T> for Result<T, Error> {
    fn public(self, message: &'static str) -> Result<T, QueryError> {
        self.map_err(|source| QueryError::new(message, source))
    }

    fn public_by_kind(
        self,
        not_found: &'static str,
        failed: &'static str,
    ) -> Result<T, QueryError> {
        self.map_err(|source| match source {
            Error::NotFound(_) => QueryError::new(not_found, source),
            _ => QueryError::new(failed, source),
        })
    }
}
