//! Run Actions use case
//!
//! Drives a decision-maker through bounded rounds until it finishes, stops
//! asking for anything, repeats itself, or runs out of rounds:
//!
//! ```text
//!            ┌──────────────────────────────────────────────┐
//!            ▼                                              │
//!   DecisionClient::call ─▶ empty? ──yes──▶ done            │
//!            │                                              │
//!            ▼                                              │
//!   assistant turn ─▶ RoundPlan (gate) ─▶ repair budget     │
//!                              │                            │
//!                              ▼                            │
//!                 concurrent execution ─▶ result turns      │
//!                              │                            │
//!                              ▼                            │
//!               converged / finish accepted? ──no───────────┘
//!                              │
//!                             yes ─▶ done
//! ```
//!
//! Fatal conditions (correction budget, consecutive failures, decision
//! client errors) surface as [`RunError`]; everything else is reported to
//! the decision-maker through the transcript.

mod execute;
mod types;

pub use types::{RunContext, RunError, RunOutput, StopReason};

use execute::{RoundIntent, RoundResult};

use crate::config::LoopParams;
use crate::ports::action::Action;
use crate::ports::audit_recorder::{AuditRecorder, NoAuditRecorder};
use crate::ports::decision_client::DecisionClient;
use crate::ports::run_observer::{NoRunObserver, RunObserver};
use converge_domain::{
    ActionCatalog, ActionRequest, Availability, DecisionRequest, RunEvent, RunState, Transcript,
    Turn,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Use case for running the action orchestration loop
pub struct RunActionsUseCase<D: DecisionClient + 'static> {
    pub(super) decision_client: Arc<D>,
    pub(super) actions: Vec<Arc<dyn Action>>,
    pub(super) params: LoopParams,
    pub(super) audit_recorder: Arc<dyn AuditRecorder>,
}

impl<D: DecisionClient + 'static> Clone for RunActionsUseCase<D> {
    fn clone(&self) -> Self {
        Self {
            decision_client: self.decision_client.clone(),
            actions: self.actions.clone(),
            params: self.params.clone(),
            audit_recorder: self.audit_recorder.clone(),
        }
    }
}

impl<D: DecisionClient + 'static> RunActionsUseCase<D> {
    pub fn new(decision_client: Arc<D>, actions: Vec<Arc<dyn Action>>) -> Self {
        Self {
            decision_client,
            actions,
            params: LoopParams::default(),
            audit_recorder: Arc::new(NoAuditRecorder),
        }
    }

    pub fn with_params(mut self, params: LoopParams) -> Self {
        self.params = params;
        self
    }

    /// Record every executed action result through `recorder`
    pub fn with_audit_recorder(mut self, recorder: Arc<dyn AuditRecorder>) -> Self {
        self.audit_recorder = recorder;
        self
    }

    pub fn params(&self) -> &LoopParams {
        &self.params
    }

    /// Run the loop without an observer.
    pub async fn run(
        &self,
        seed: Transcript,
        context: RunContext,
    ) -> Result<RunOutput, RunError> {
        self.run_with_observer(seed, context, &NoRunObserver).await
    }

    /// Run the loop, reporting progress to `observer`.
    pub async fn run_with_observer(
        &self,
        seed: Transcript,
        context: RunContext,
        observer: &dyn RunObserver,
    ) -> Result<RunOutput, RunError> {
        self.params.validate().map_err(RunError::InvalidConfig)?;
        let max_rounds = context.max_rounds.unwrap_or(self.params.max_rounds);
        if max_rounds == 0 {
            return Err(RunError::InvalidConfig(
                "max_rounds must be at least 1".to_string(),
            ));
        }

        let catalog = self.build_catalog().await?;
        info!(
            "Starting run {} with {} available action(s), up to {} round(s)",
            context.run_id,
            catalog.available_names().count(),
            max_rounds
        );

        let mut transcript = seed;
        let mut state = RunState::new(self.params.correction_budget);
        let mut pending: Vec<ActionRequest> = Vec::new();

        let stop_reason = loop {
            if context.cancellation.is_cancelled() {
                break StopReason::Cancelled;
            }
            if state.round() >= max_rounds {
                warn!(
                    "Run {}: round budget of {} exhausted without termination",
                    context.run_id, max_rounds
                );
                break StopReason::RoundBudgetExhausted;
            }

            let round = state.begin_round();
            debug!("Round {} starting ({} turns so far)", round, transcript.len());
            observer.on_event(&RunEvent::RoundStarted { round });

            let request = DecisionRequest {
                round,
                transcript: transcript.clone(),
                available_actions: catalog.advertised(),
                system_note: catalog.system_note(),
                model_selector: self.params.model_selector.clone(),
            };

            let response = tokio::select! {
                biased;
                _ = context.cancellation.cancelled() => None,
                response = self.decision_client.call(&request, &context.cancellation) => Some(response),
            };
            let Some(response) = response else {
                info!("Round {}: cancelled while waiting for a decision", round);
                break StopReason::Cancelled;
            };
            let response = response?;

            if response.is_empty() {
                debug!("Round {}: empty response, nothing left to do", round);
                pending.clear();
                break StopReason::NoFurtherActions;
            }

            let intent = RoundIntent::from_response(&response);
            debug!(
                "Round {}: {} action request(s){}",
                round,
                intent.requests.len(),
                if intent.finish.is_some() { " + finish" } else { "" }
            );
            transcript.push(Turn::assistant(
                response.text_content(),
                intent.assistant_requests(),
                context.clock.now_millis(),
            ));

            match self
                .execute_round(round, intent, &catalog, &mut state, &context, observer)
                .await?
            {
                RoundResult::Cancelled {
                    pending: unresolved,
                } => {
                    pending = unresolved;
                    break StopReason::Cancelled;
                }
                RoundResult::Completed {
                    turns,
                    pending: unresolved,
                    stop,
                } => {
                    for turn in turns {
                        transcript.push(turn);
                    }
                    pending = unresolved;
                    if let Some(stop) = stop {
                        break stop;
                    }
                }
            }
        };

        info!(
            "Run {} stopped after {} round(s): {}",
            context.run_id,
            state.round(),
            stop_reason
        );

        Ok(RunOutput {
            done: stop_reason.is_done(),
            transcript,
            pending_actions: pending,
            stop_reason,
            rounds: state.round(),
        })
    }

    /// Check every action's configuration once and build the run's catalog.
    async fn build_catalog(&self) -> Result<ActionCatalog, RunError> {
        let mut catalog = ActionCatalog::new();
        for action in &self.actions {
            let availability = action.verify_configuration().await;
            if let Availability::Unavailable { reason } = &availability {
                warn!("Action '{}' is unavailable: {}", action.name(), reason);
            }
            catalog.register(action.descriptor(), availability)?;
        }
        Ok(catalog)
    }

    pub(super) fn action(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.iter().find(|a| a.name() == name).cloned()
    }
}
