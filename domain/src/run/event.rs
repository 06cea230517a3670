//! Run events delivered to an optional observer.

use crate::action::{ActionOutcome, ActionRequestId};
use serde::Serialize;

/// Progress notification emitted by the orchestration loop.
///
/// For every scheduled request the loop emits `ActionDispatched` right
/// before invoking it and `ActionResolved` once its outcome is known. Events
/// are emitted in the same order as the transcript turns they describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    RoundStarted {
        round: usize,
    },
    ActionDispatched {
        round: usize,
        request_id: ActionRequestId,
        action_name: String,
    },
    ActionResolved {
        round: usize,
        request_id: ActionRequestId,
        action_name: String,
        success: bool,
        /// Single-line rendering of the outcome, at most 200 bytes.
        summary: String,
    },
}

impl RunEvent {
    pub fn resolved(
        round: usize,
        request_id: ActionRequestId,
        action_name: impl Into<String>,
        outcome: &ActionOutcome,
    ) -> Self {
        Self::ActionResolved {
            round,
            request_id,
            action_name: action_name.into(),
            success: outcome.is_success(),
            summary: outcome.summary(),
        }
    }

    pub fn round(&self) -> usize {
        match self {
            Self::RoundStarted { round }
            | Self::ActionDispatched { round, .. }
            | Self::ActionResolved { round, .. } => *round,
        }
    }
}
