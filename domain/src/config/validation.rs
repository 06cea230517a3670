//! Configuration issues.
//!
//! Loaders report problems as structured issues instead of failing, so the
//! caller can print warnings and still decide whether to proceed.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration cannot work at all.
    Error,
    /// The configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `run.max_rounds = 0`: no round would ever be started.
    ZeroRoundBudget,
    /// `run.concurrency = 0`: no action could ever execute.
    ZeroConcurrency,
    /// `run.correction_budget = 0`
    ZeroCorrectionBudget,
    /// `run.failure_limit = 0`
    ZeroFailureLimit,
    /// `actions.command_timeout_secs = 0`
    ZeroCommandTimeout,
    /// Every built-in action is switched off; only finish remains.
    NoActionsEnabled,
}

/// A detected issue in the loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}
