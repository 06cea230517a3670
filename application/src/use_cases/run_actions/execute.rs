//! Round execution for the RunActions use case.
//!
//! One round takes the decision-maker's requests through the gate, the
//! repair protocol, concurrent execution and finish evaluation, and turns
//! the result into transcript entries.

use super::RunActionsUseCase;
use super::types::{RunContext, RunError, StopReason};
use crate::ports::action::Action;
use crate::ports::decision_client::DecisionClient;
use crate::ports::run_observer::RunObserver;
use converge_domain::{
    ActionCatalog, ActionOutcome, ActionRequest, ActionRequestId, BatchResult, DecisionResponse,
    Disposition, FINISH_ACTION, FinishEvaluator, FinishVerdict, RepairVerdict, RoundPlan,
    RunEvent, RunState, Turn, failure_kind, run::repair_instruction,
};
use futures::FutureExt;
use futures::stream::{FuturesOrdered, StreamExt};
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// What a round produced.
pub(super) enum RoundResult {
    Completed {
        turns: Vec<Turn>,
        /// Requests of this round that did not resolve successfully.
        pending: Vec<ActionRequest>,
        stop: Option<StopReason>,
    },
    /// Cancelled before the round's results were in; nothing is appended.
    Cancelled { pending: Vec<ActionRequest> },
}

/// What the decision-maker asked for in one round.
pub(super) struct RoundIntent {
    pub requests: Vec<ActionRequest>,
    /// Finish request id and optional summary.
    pub finish: Option<(ActionRequestId, Option<String>)>,
}

impl RoundIntent {
    pub fn from_response(response: &DecisionResponse) -> Self {
        Self {
            requests: response.action_requests(),
            finish: response
                .finish_request()
                .map(|(id, summary)| (id.clone(), summary.map(str::to_string))),
        }
    }

    /// Requests as recorded in the assistant turn, finish included.
    pub fn assistant_requests(&self) -> Vec<ActionRequest> {
        let mut requests = self.requests.clone();
        if let Some((id, summary)) = &self.finish {
            let arguments = match summary {
                Some(summary) => serde_json::json!({ "summary": summary }),
                None => Value::Object(Map::new()),
            };
            requests.push(ActionRequest::new(id.clone(), FINISH_ACTION, arguments));
        }
        requests
    }
}

impl<D: DecisionClient + 'static> RunActionsUseCase<D> {
    pub(super) async fn execute_round(
        &self,
        round: usize,
        intent: RoundIntent,
        catalog: &ActionCatalog,
        state: &mut RunState,
        context: &RunContext,
        observer: &dyn RunObserver,
    ) -> Result<RoundResult, RunError> {
        let RoundIntent { requests, finish } = intent;
        let round_requests = requests.clone();
        let plan = RoundPlan::build(requests, state, catalog, self.params.concurrency_ceiling);

        // Repair budget is settled before anything executes.
        let mut instructions: HashMap<usize, String> = HashMap::new();
        for (index, entry) in plan.entries().iter().enumerate() {
            let Disposition::Malformed { error } = &entry.disposition else {
                continue;
            };
            match state.repairs_mut().record() {
                RepairVerdict::Retry { attempt, remaining } => {
                    warn!(
                        "Round {}: malformed arguments for {} (request {}), correction attempt {}",
                        round, entry.request.name, entry.request.id, attempt
                    );
                    instructions.insert(index, repair_instruction(&entry.request, error, remaining));
                    state.record_malformed(&entry.request.name);
                }
                RepairVerdict::Exhausted { attempts } => {
                    error!(
                        "Round {}: correction budget of {} exhausted after {} attempt(s)",
                        round,
                        state.repairs().budget(),
                        attempts
                    );
                    return Err(RunError::ArgumentsUnrepairable {
                        request_id: entry.request.id.to_string(),
                        action_name: entry.request.name.clone(),
                        attempts,
                    });
                }
            }
        }

        if context.cancellation.is_cancelled() {
            return Ok(RoundResult::Cancelled {
                pending: round_requests,
            });
        }

        let converged = plan.converged();
        let mut outcomes: Vec<Option<ActionOutcome>> = plan
            .entries()
            .iter()
            .map(|entry| entry.synthetic_outcome())
            .collect();

        if converged {
            info!("Round {}: repeated an already completed action, run converged", round);
            for (slot, entry) in outcomes.iter_mut().zip(plan.entries()) {
                if entry.disposition.is_execute() {
                    *slot = Some(ActionOutcome::failure(
                        "not executed: run converged",
                        failure_kind::NOT_EXECUTED,
                    ));
                }
            }
        } else {
            let Some(executed) = self.dispatch(round, &plan, context, observer).await else {
                info!("Round {}: cancelled while actions were running", round);
                return Ok(RoundResult::Cancelled {
                    pending: round_requests,
                });
            };

            let mut fatal = None;
            for (index, outcome) in executed {
                if let Some(signature) = &plan.entries()[index].signature {
                    let streak = state.record_outcome(signature, outcome.is_success());
                    if streak >= self.params.failure_limit && fatal.is_none() {
                        fatal = Some(RunError::ConsecutiveFailures {
                            signature: signature.to_string(),
                            failures: streak,
                        });
                    }
                }
                outcomes[index] = Some(outcome);
            }
            if let Some(err) = fatal {
                error!("Round {}: {}", round, err);
                return Err(err);
            }

            for entry in plan.entries() {
                if let (Disposition::CeilingExceeded { .. }, Some(signature)) =
                    (&entry.disposition, &entry.signature)
                {
                    state.record_rejected(signature);
                }
            }
        }

        let resolved = resolve(&plan, &outcomes);

        let mut stop = converged.then_some(StopReason::Converged);
        let finish_outcome = finish.map(|(id, summary)| {
            let outcome = if converged {
                ActionOutcome::failure("not evaluated: run converged", failure_kind::NOT_EXECUTED)
            } else {
                let batch: Vec<BatchResult> = plan
                    .entries()
                    .iter()
                    .zip(&resolved)
                    .map(|(entry, ok)| BatchResult::new(entry.request.name.clone(), *ok))
                    .collect();
                let verdict = FinishEvaluator::evaluate(&batch, state);
                match &verdict {
                    FinishVerdict::Accepted(reason) => {
                        info!("Round {}: finish accepted ({})", round, reason);
                        stop = Some(StopReason::Finished {
                            reason: reason.clone(),
                        });
                    }
                    FinishVerdict::Rejected(reason) => {
                        warn!("Round {}: finish rejected ({})", round, reason);
                    }
                }
                finish_outcome_with_summary(&verdict, summary.as_deref())
            };
            (id, outcome)
        });

        let mut turns = Vec::with_capacity(outcomes.len() + instructions.len() + 1);
        for (index, (entry, outcome)) in plan.entries().iter().zip(outcomes).enumerate() {
            let outcome = outcome.unwrap_or_else(|| {
                ActionOutcome::failure("not executed", failure_kind::NOT_EXECUTED)
            });
            turns.push(Turn::action_result(
                entry.request.id.clone(),
                entry.request.name.clone(),
                outcome,
                context.clock.now_millis(),
            ));
            if let Some(text) = instructions.remove(&index) {
                turns.push(Turn::system(text, context.clock.now_millis()));
            }
        }
        if let Some((id, outcome)) = finish_outcome {
            turns.push(Turn::action_result(
                id,
                FINISH_ACTION,
                outcome,
                context.clock.now_millis(),
            ));
        }

        let pending = plan
            .entries()
            .iter()
            .zip(&resolved)
            .filter(|(_, ok)| !**ok)
            .map(|(entry, _)| entry.request.clone())
            .collect();

        Ok(RoundResult::Completed {
            turns,
            pending,
            stop,
        })
    }

    /// Run every `Execute` entry concurrently.
    ///
    /// Each `ActionResolved` event is emitted as soon as that invocation and
    /// every earlier one have finished. Returns `(entry index, outcome)` in
    /// request order, or `None` when the run was cancelled before all of
    /// them finished.
    async fn dispatch(
        &self,
        round: usize,
        plan: &RoundPlan,
        context: &RunContext,
        observer: &dyn RunObserver,
    ) -> Option<Vec<(usize, ActionOutcome)>> {
        let mut indices = Vec::new();
        let mut invocations = Vec::new();

        for (index, entry) in plan.entries().iter().enumerate() {
            if !entry.disposition.is_execute() {
                continue;
            }
            let action = self.action(&entry.request.name);
            let name = entry.request.name.clone();
            let arguments = entry
                .arguments
                .clone()
                .unwrap_or_else(|| Value::Object(Map::new()));
            let token = context.cancellation.clone();
            let recorder = self.audit_recorder.clone();
            let run_id = context.run_id.clone();

            debug!("Round {}: dispatching {}", round, entry.request.describe());
            observer.on_event(&RunEvent::ActionDispatched {
                round,
                request_id: entry.request.id.clone(),
                action_name: name.clone(),
            });

            indices.push(index);
            invocations.push(async move {
                let outcome = match action {
                    Some(action) => invoke_guarded(&*action, arguments, &token).await,
                    None => ActionOutcome::failure(
                        format!("no implementation registered for '{}'", name),
                        failure_kind::UNKNOWN_ACTION,
                    ),
                };
                if let Err(e) = recorder.record_action_result(&run_id, &name, &outcome) {
                    warn!("Failed to record result of '{}': {}", name, e);
                }
                outcome
            });
        }

        // Invocations run concurrently; results are yielded in request order.
        let mut running: FuturesOrdered<_> = invocations.into_iter().collect();
        let mut outcomes = Vec::with_capacity(indices.len());
        loop {
            let next = tokio::select! {
                biased;
                _ = context.cancellation.cancelled() => return None,
                next = running.next() => next,
            };
            let Some(outcome) = next else {
                break;
            };

            let entry = &plan.entries()[indices[outcomes.len()]];
            if !outcome.is_success() {
                warn!(
                    "Round {}: {} failed: {}",
                    round,
                    entry.request.name,
                    outcome.summary()
                );
            }
            observer.on_event(&RunEvent::resolved(
                round,
                entry.request.id.clone(),
                entry.request.name.clone(),
                &outcome,
            ));
            outcomes.push(outcome);
        }

        Some(indices.into_iter().zip(outcomes).collect())
    }
}

/// Whether each entry resolved successfully.
///
/// A duplicate resolves the way its first occurrence did; a converged entry
/// already succeeded earlier in the run.
fn resolve(plan: &RoundPlan, outcomes: &[Option<ActionOutcome>]) -> Vec<bool> {
    let succeeded = |index: usize| {
        outcomes
            .get(index)
            .and_then(|o| o.as_ref())
            .is_some_and(ActionOutcome::is_success)
    };

    plan.entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| match &entry.disposition {
            Disposition::Duplicate { first_request_id } => plan
                .entries()
                .iter()
                .position(|e| &e.request.id == first_request_id)
                .is_some_and(succeeded),
            Disposition::Converged => true,
            _ => succeeded(index),
        })
        .collect()
}

fn finish_outcome_with_summary(verdict: &FinishVerdict, summary: Option<&str>) -> ActionOutcome {
    match (verdict, summary) {
        (FinishVerdict::Accepted(reason), Some(summary)) if !summary.trim().is_empty() => {
            ActionOutcome::success(format!("finished: {}. {}", reason, summary.trim()))
        }
        _ => verdict.outcome(),
    }
}

async fn invoke_guarded(
    action: &dyn Action,
    arguments: Value,
    token: &CancellationToken,
) -> ActionOutcome {
    match AssertUnwindSafe(action.invoke(arguments, token))
        .catch_unwind()
        .await
    {
        Ok(Ok(value)) => ActionOutcome::Success { value },
        Ok(Err(err)) => err.into(),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!("Action '{}' panicked: {}", action.name(), message);
            ActionOutcome::failure(format!("action panicked: {}", message), failure_kind::PANIC)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
