//! Decision Client port
//!
//! Defines the interface for asking the decision-maker what to do next.

use async_trait::async_trait;
use converge_domain::{DecisionRequest, DecisionResponse};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur while obtaining a decision.
///
/// Every variant is fatal to the run; retrying is the client's own concern.
#[derive(Error, Debug)]
pub enum DecisionError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Request/response access to the decision-maker.
///
/// Called exactly once per round and never concurrently with action
/// execution. Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait DecisionClient: Send + Sync {
    /// Produce the next round's intent.
    ///
    /// `cancellation` covers the whole run; long-running clients should
    /// stop early when it fires.
    async fn call(
        &self,
        request: &DecisionRequest,
        cancellation: &CancellationToken,
    ) -> Result<DecisionResponse, DecisionError>;
}
