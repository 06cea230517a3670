//! Loop parameters: orchestration loop control.
//!
//! [`LoopParams`] groups the static limits that bound a run of
//! [`RunActionsUseCase`](crate::use_cases::run_actions::RunActionsUseCase).

use serde::{Deserialize, Serialize};

/// Orchestration loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopParams {
    /// Maximum number of rounds before the run gives up with `done = false`.
    pub max_rounds: usize,
    /// Maximum number of distinct actions executed concurrently per round.
    pub concurrency_ceiling: usize,
    /// Malformed-argument events tolerated per run; reaching it is fatal.
    pub correction_budget: u32,
    /// Consecutive failures of one signature that abort the run.
    pub failure_limit: u32,
    /// Forwarded to the decision client untouched.
    pub model_selector: Option<String>,
}

impl Default for LoopParams {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            concurrency_ceiling: 4,
            correction_budget: 3,
            failure_limit: 3,
            model_selector: None,
        }
    }
}

impl LoopParams {
    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max: usize) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn with_concurrency_ceiling(mut self, ceiling: usize) -> Self {
        self.concurrency_ceiling = ceiling;
        self
    }

    pub fn with_correction_budget(mut self, budget: u32) -> Self {
        self.correction_budget = budget;
        self
    }

    pub fn with_failure_limit(mut self, limit: u32) -> Self {
        self.failure_limit = limit;
        self
    }

    pub fn with_model_selector(mut self, model: impl Into<String>) -> Self {
        self.model_selector = Some(model.into());
        self
    }

    /// Reject limits that would make a run meaningless.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_rounds == 0 {
            return Err("max_rounds must be at least 1".to_string());
        }
        if self.concurrency_ceiling == 0 {
            return Err("concurrency_ceiling must be at least 1".to_string());
        }
        if self.correction_budget == 0 {
            return Err("correction_budget must be at least 1".to_string());
        }
        if self.failure_limit == 0 {
            return Err("failure_limit must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = LoopParams::default();
        assert_eq!(params.max_rounds, 10);
        assert_eq!(params.concurrency_ceiling, 4);
        assert_eq!(params.correction_budget, 3);
        assert_eq!(params.failure_limit, 3);
        assert!(params.model_selector.is_none());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let params = LoopParams::default()
            .with_max_rounds(25)
            .with_concurrency_ceiling(2)
            .with_model_selector("fast");

        assert_eq!(params.max_rounds, 25);
        assert_eq!(params.concurrency_ceiling, 2);
        assert_eq!(params.model_selector.as_deref(), Some("fast"));
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(LoopParams::default().with_max_rounds(0).validate().is_err());
        assert!(
            LoopParams::default()
                .with_concurrency_ceiling(0)
                .validate()
                .is_err()
        );
        assert!(
            LoopParams::default()
                .with_correction_budget(0)
                .validate()
                .is_err()
        );
        let err = LoopParams::default()
            .with_failure_limit(0)
            .validate()
            .unwrap_err();
        assert!(err.contains("failure_limit"));
    }
}
