//! Type definitions for the RunActions use case.

use crate::ports::clock::{Clock, SystemClock};
use crate::ports::decision_client::DecisionError;
use converge_domain::{ActionRequest, DomainError, FinishReason, RunId, Transcript};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Fatal errors that abort a run.
///
/// Everything recoverable (unknown actions, failing actions, duplicates,
/// rejected finish, malformed arguments within budget) ends up in the
/// transcript instead.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid action set: {0}")]
    Catalog(#[from] DomainError),

    #[error(
        "arguments could not be repaired: request {request_id} ({action_name}) after {attempts} correction attempt(s)"
    )]
    ArgumentsUnrepairable {
        request_id: String,
        action_name: String,
        attempts: u32,
    },

    #[error("action {signature} failed {failures} consecutive times")]
    ConsecutiveFailures { signature: String, failures: u32 },

    #[error("Decision client error: {0}")]
    Decision(#[from] DecisionError),
}

/// Everything a run needs besides the seed transcript.
#[derive(Clone)]
pub struct RunContext {
    pub run_id: RunId,
    pub clock: Arc<dyn Clock>,
    /// Overrides [`LoopParams::max_rounds`](crate::config::LoopParams) for this run.
    pub max_rounds: Option<usize>,
    pub cancellation: CancellationToken,
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            run_id: RunId::generate(),
            clock: Arc::new(SystemClock),
            max_rounds: None,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_run_id(mut self, run_id: impl Into<RunId>) -> Self {
        self.run_id = run_id.into();
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("run_id", &self.run_id)
            .field("max_rounds", &self.max_rounds)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopReason {
    /// The finish action was accepted.
    Finished { reason: FinishReason },
    /// A request repeated an action that already succeeded.
    Converged,
    /// The decision-maker returned an empty response.
    NoFurtherActions,
    Cancelled,
    /// The round budget ran out before any termination signal.
    RoundBudgetExhausted,
}

impl StopReason {
    /// `false` only when the round budget ran out.
    pub fn is_done(&self) -> bool {
        !matches!(self, Self::RoundBudgetExhausted)
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finished { reason } => write!(f, "finished ({})", reason),
            Self::Converged => write!(f, "converged"),
            Self::NoFurtherActions => write!(f, "no further actions"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::RoundBudgetExhausted => write!(f, "round budget exhausted"),
        }
    }
}

/// Output from the RunActions use case
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    /// `false` only when the round budget was exhausted.
    pub done: bool,
    /// Seed transcript plus every turn the run appended.
    pub transcript: Transcript,
    /// Requests of the final round that did not resolve successfully.
    pub pending_actions: Vec<ActionRequest>,
    pub stop_reason: StopReason,
    /// Number of rounds started.
    pub rounds: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrepairable_message() {
        let error = RunError::ArgumentsUnrepairable {
            request_id: "call-3-0".to_string(),
            action_name: "search".to_string(),
            attempts: 3,
        };
        assert!(error.to_string().starts_with("arguments could not be repaired"));
    }

    #[test]
    fn test_stop_reason_done() {
        assert!(StopReason::Cancelled.is_done());
        assert!(StopReason::Converged.is_done());
        assert!(!StopReason::RoundBudgetExhausted.is_done());
        assert_eq!(
            StopReason::Finished {
                reason: FinishReason::NoActionsNeeded
            }
            .to_string(),
            "finished (no actions needed)"
        );
    }
}
