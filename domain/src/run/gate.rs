//! Dedup and concurrency gate.
//!
//! [`RoundPlan::build`] decides, for every request of a round, whether it is
//! executed or answered with a synthetic result. Checks run in this order
//! and the first match wins:
//!
//! ```text
//! unknown name ─▶ malformed arguments ─▶ already succeeded ─▶ duplicate ─▶ ceiling
//!     Unknown           Malformed            Converged        Duplicate   CeilingExceeded
//! ```
//!
//! Anything left is `Execute`.

use super::state::RunState;
use crate::action::{
    ActionCatalog, ActionOutcome, ActionRequest, ActionRequestId, Signature, failure_kind,
};
use crate::core::error::ArgumentError;
use serde_json::Value;
use std::collections::HashMap;

/// What happens to one request this round.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    Execute,
    /// Same signature as an earlier request of this round.
    Duplicate { first_request_id: ActionRequestId },
    /// Signature already succeeded earlier in the run.
    Converged,
    CeilingExceeded { ceiling: usize },
    Unknown { reason: String },
    Malformed { error: ArgumentError },
}

impl Disposition {
    pub fn is_execute(&self) -> bool {
        matches!(self, Self::Execute)
    }
}

/// One request with its disposition and, when parsable, its signature.
#[derive(Debug, Clone)]
pub struct PlannedRequest {
    pub request: ActionRequest,
    pub disposition: Disposition,
    pub signature: Option<Signature>,
    /// Parsed argument object the action is invoked with.
    pub arguments: Option<Value>,
}

impl PlannedRequest {
    /// Result turn for requests that are not executed.
    ///
    /// Returns `None` for `Execute`.
    pub fn synthetic_outcome(&self) -> Option<ActionOutcome> {
        let outcome = match &self.disposition {
            Disposition::Execute => return None,
            Disposition::Duplicate { first_request_id } => ActionOutcome::failure(
                format!(
                    "duplicate action call: same action and arguments as request {} in this round; not executed again",
                    first_request_id
                ),
                failure_kind::DUPLICATE,
            ),
            Disposition::Converged => ActionOutcome::failure(
                format!(
                    "calls already completed: {} succeeded earlier in this run; stopping",
                    self.signature
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| self.request.name.clone())
                ),
                failure_kind::ALREADY_COMPLETED,
            ),
            Disposition::CeilingExceeded { ceiling } => ActionOutcome::failure(
                format!(
                    "ceiling exceeded: at most {} distinct actions run per round; request it again in a later round",
                    ceiling
                ),
                failure_kind::CEILING_EXCEEDED,
            ),
            Disposition::Unknown { reason } => {
                ActionOutcome::failure(reason.clone(), failure_kind::UNKNOWN_ACTION)
            }
            Disposition::Malformed { error } => ActionOutcome::failure(
                super::repair::parse_failure_message(&self.request, error),
                failure_kind::MALFORMED_ARGUMENTS,
            ),
        };
        Some(outcome)
    }
}

/// Per-round schedule produced by the gate.
#[derive(Debug, Clone, Default)]
pub struct RoundPlan {
    entries: Vec<PlannedRequest>,
}

impl RoundPlan {
    /// Assign a disposition to every request, in request order.
    pub fn build(
        requests: Vec<ActionRequest>,
        state: &RunState,
        catalog: &ActionCatalog,
        ceiling: usize,
    ) -> Self {
        let mut first_seen: HashMap<Signature, ActionRequestId> = HashMap::new();
        let mut scheduled = 0usize;
        let mut entries = Vec::with_capacity(requests.len());

        for request in requests {
            if let Err(reason) = catalog.check(&request.name) {
                entries.push(PlannedRequest {
                    request,
                    disposition: Disposition::Unknown { reason },
                    signature: None,
                    arguments: None,
                });
                continue;
            }

            let (signature, arguments) = match Signature::canonicalize(&request) {
                Ok(parsed) => parsed,
                Err(error) => {
                    entries.push(PlannedRequest {
                        request,
                        disposition: Disposition::Malformed { error },
                        signature: None,
                        arguments: None,
                    });
                    continue;
                }
            };

            let disposition = if state.has_succeeded(&signature) {
                Disposition::Converged
            } else if let Some(first) = first_seen.get(&signature) {
                Disposition::Duplicate {
                    first_request_id: first.clone(),
                }
            } else {
                first_seen.insert(signature.clone(), request.id.clone());
                if scheduled < ceiling {
                    scheduled += 1;
                    Disposition::Execute
                } else {
                    Disposition::CeilingExceeded { ceiling }
                }
            };

            entries.push(PlannedRequest {
                request,
                disposition,
                signature: Some(signature),
                arguments: Some(arguments),
            });
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[PlannedRequest] {
        &self.entries
    }

    /// Whether any request repeats a signature that already succeeded.
    pub fn converged(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.disposition, Disposition::Converged))
    }

    pub fn executable(&self) -> impl Iterator<Item = &PlannedRequest> {
        self.entries.iter().filter(|e| e.disposition.is_execute())
    }
}
