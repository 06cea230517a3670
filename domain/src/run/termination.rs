//! Finish evaluation.
//!
//! The virtual finish action is judged against the other results of its
//! round (when there are any) or against the run history (when it comes
//! alone).

use super::state::RunState;
use crate::action::{ActionOutcome, failure_kind};
use serde::{Deserialize, Serialize};

/// Why a finish request was accepted or rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FinishReason {
    /// Finish alone with no successes and nothing standing failed.
    NoActionsNeeded,
    /// Finish alone after earlier successes and no standing failures.
    PriorSuccess,
    /// Every other request of the round succeeded.
    BatchSucceeded,
    BatchFailed { names: Vec<String> },
    PreviousFailures { names: Vec<String> },
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoActionsNeeded => write!(f, "no actions needed"),
            Self::PriorSuccess => write!(f, "all previously requested actions succeeded"),
            Self::BatchSucceeded => write!(f, "all actions in this round succeeded"),
            Self::BatchFailed { names } => {
                write!(f, "action(s) in this round failed: {}", names.join(", "))
            }
            Self::PreviousFailures { names } => {
                write!(f, "previous action(s) in this run failed: {}", names.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishVerdict {
    Accepted(FinishReason),
    Rejected(FinishReason),
}

impl FinishVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn reason(&self) -> &FinishReason {
        match self {
            Self::Accepted(reason) | Self::Rejected(reason) => reason,
        }
    }

    /// Result turn content for the finish request.
    pub fn outcome(&self) -> ActionOutcome {
        match self {
            Self::Accepted(reason) => ActionOutcome::success(format!("finished: {}", reason)),
            Self::Rejected(reason) => ActionOutcome::failure(
                format!("finish rejected: {}", reason),
                failure_kind::FINISH_REJECTED,
            ),
        }
    }
}

/// Resolution of one non-finish request of the round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub action_name: String,
    pub success: bool,
}

impl BatchResult {
    pub fn new(action_name: impl Into<String>, success: bool) -> Self {
        Self {
            action_name: action_name.into(),
            success,
        }
    }
}

pub struct FinishEvaluator;

impl FinishEvaluator {
    /// Judge a finish request.
    ///
    /// `batch` holds the other requests of the same round; an empty batch
    /// means finish came alone. `state` must already include this round's
    /// executed outcomes.
    pub fn evaluate(batch: &[BatchResult], state: &RunState) -> FinishVerdict {
        if !batch.is_empty() {
            let failed = dedup_names(batch.iter().filter(|r| !r.success).map(|r| r.action_name.as_str()));
            return if failed.is_empty() {
                FinishVerdict::Accepted(FinishReason::BatchSucceeded)
            } else {
                FinishVerdict::Rejected(FinishReason::BatchFailed { names: failed })
            };
        }

        if state.has_standing_failures() {
            let names = dedup_names(state.standing_failures());
            FinishVerdict::Rejected(FinishReason::PreviousFailures { names })
        } else if state.any_succeeded() {
            FinishVerdict::Accepted(FinishReason::PriorSuccess)
        } else {
            FinishVerdict::Accepted(FinishReason::NoActionsNeeded)
        }
    }
}

fn dedup_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionRequest, Signature};
    use serde_json::json;

    fn sig(name: &str, args: serde_json::Value) -> Signature {
        Signature::canonicalize(&ActionRequest::new("id", name, args))
            .unwrap()
            .0
    }

    #[test]
    fn test_alone_with_no_history() {
        let verdict = FinishEvaluator::evaluate(&[], &RunState::new(3));
        assert_eq!(verdict, FinishVerdict::Accepted(FinishReason::NoActionsNeeded));
        assert!(verdict.outcome().render().contains("no actions needed"));
    }

    #[test]
    fn test_alone_after_failure_is_rejected() {
        let mut state = RunState::new(3);
        state.record_outcome(&sig("search", json!({"q": "x"})), false);

        let verdict = FinishEvaluator::evaluate(&[], &state);
        assert_eq!(
            verdict,
            FinishVerdict::Rejected(FinishReason::PreviousFailures {
                names: vec!["search".to_string()]
            })
        );
        let outcome = verdict.outcome();
        assert_eq!(outcome.kind(), Some(failure_kind::FINISH_REJECTED));
        assert!(outcome.render().contains("previous action(s) in this run failed"));
    }

    #[test]
    fn test_alone_after_unrepaired_arguments_is_rejected() {
        let mut state = RunState::new(3);
        state.record_malformed("search");

        assert_eq!(
            FinishEvaluator::evaluate(&[], &state),
            FinishVerdict::Rejected(FinishReason::PreviousFailures {
                names: vec!["search".to_string()]
            })
        );
    }

    #[test]
    fn test_alone_after_ceiling_rejection_is_rejected() {
        let mut state = RunState::new(3);
        state.record_outcome(&sig("fetch", json!({"url": "a"})), true);
        state.record_rejected(&sig("fetch", json!({"url": "e"})));

        assert!(!FinishEvaluator::evaluate(&[], &state).is_accepted());
    }

    #[test]
    fn test_alone_after_success() {
        let mut state = RunState::new(3);
        let s = sig("search", json!({"q": "x"}));
        state.record_outcome(&s, false);
        state.record_outcome(&s, true);

        assert_eq!(
            FinishEvaluator::evaluate(&[], &state),
            FinishVerdict::Accepted(FinishReason::PriorSuccess)
        );
    }

    #[test]
    fn test_batch_failure_names_failed_actions_once() {
        let batch = vec![
            BatchResult::new("search", false),
            BatchResult::new("fetch", true),
            BatchResult::new("search", false),
        ];
        let verdict = FinishEvaluator::evaluate(&batch, &RunState::new(3));
        assert_eq!(
            verdict,
            FinishVerdict::Rejected(FinishReason::BatchFailed {
                names: vec!["search".to_string()]
            })
        );
    }

    #[test]
    fn test_batch_success_ignores_history() {
        let mut state = RunState::new(3);
        state.record_outcome(&sig("other", json!({})), false);

        let verdict = FinishEvaluator::evaluate(&[BatchResult::new("fetch", true)], &state);
        assert!(verdict.is_accepted());
    }
}
