//! Run configuration from TOML (`[run]` section)

use converge_application::LoopParams;
use converge_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw loop limits from TOML
///
/// # Example
///
/// ```toml
/// [run]
/// max_rounds = 10
/// concurrency = 4          # distinct actions per round
/// correction_budget = 3    # malformed-argument events per run
/// failure_limit = 3        # consecutive failures of one call
/// model = "gpt-5.2-codex"  # forwarded to the decision client
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRunConfig {
    pub max_rounds: usize,
    pub concurrency: usize,
    pub correction_budget: u32,
    pub failure_limit: u32,
    pub model: Option<String>,
}

impl Default for FileRunConfig {
    fn default() -> Self {
        let params = LoopParams::default();
        Self {
            max_rounds: params.max_rounds,
            concurrency: params.concurrency_ceiling,
            correction_budget: params.correction_budget,
            failure_limit: params.failure_limit,
            model: params.model_selector,
        }
    }
}

impl FileRunConfig {
    pub fn to_loop_params(&self) -> LoopParams {
        let params = LoopParams::default()
            .with_max_rounds(self.max_rounds)
            .with_concurrency_ceiling(self.concurrency)
            .with_correction_budget(self.correction_budget)
            .with_failure_limit(self.failure_limit);
        match &self.model {
            Some(model) => params.with_model_selector(model.clone()),
            None => params,
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.max_rounds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroRoundBudget,
                "run.max_rounds is 0: no round would ever start",
            ));
        }
        if self.concurrency == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroConcurrency,
                "run.concurrency is 0: no action could ever execute",
            ));
        }
        if self.correction_budget == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroCorrectionBudget,
                "run.correction_budget is 0: the first malformed call would abort the run",
            ));
        }
        if self.failure_limit == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroFailureLimit,
                "run.failure_limit is 0: must be at least 1",
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_loop_params() {
        assert_eq!(FileRunConfig::default().to_loop_params(), LoopParams::default());
    }

    #[test]
    fn test_to_loop_params() {
        let config = FileRunConfig {
            max_rounds: 5,
            concurrency: 2,
            correction_budget: 1,
            failure_limit: 4,
            model: Some("fast".to_string()),
        };
        let params = config.to_loop_params();
        assert_eq!(params.max_rounds, 5);
        assert_eq!(params.concurrency_ceiling, 2);
        assert_eq!(params.correction_budget, 1);
        assert_eq!(params.failure_limit, 4);
        assert_eq!(params.model_selector.as_deref(), Some("fast"));
    }

    #[test]
    fn test_validate_zero_values() {
        let config = FileRunConfig {
            max_rounds: 0,
            concurrency: 0,
            ..Default::default()
        };
        let codes: Vec<_> = config.validate().iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![ConfigIssueCode::ZeroRoundBudget, ConfigIssueCode::ZeroConcurrency]
        );
        assert!(config.validate().iter().all(|i| i.is_error()));
    }
}
