//! Action value objects: the outcome side of an action invocation.
//!
//! An [`ActionOutcome`] is either a success carrying a JSON value or a
//! failure carrying a message and an open-ended `kind` string. The loop never
//! interprets `kind`; it is passed through to the transcript and the audit
//! recorder untouched. The constants in [`failure_kind`] cover the kinds the
//! loop itself produces plus the common ones built-in actions use.

use crate::core::string::summarize;
use serde::{Deserialize, Serialize};

/// Well-known failure kinds.
pub mod failure_kind {
    /// Missing or wrong parameters.
    pub const INVALID_ARGUMENT: &str = "invalid_argument";
    /// Resource (file, directory, ...) does not exist.
    pub const NOT_FOUND: &str = "not_found";
    /// Access denied by the environment.
    pub const PERMISSION_DENIED: &str = "permission_denied";
    /// Runtime failure inside the action.
    pub const EXECUTION_FAILED: &str = "execution_failed";
    /// Operation exceeded its own deadline.
    pub const TIMEOUT: &str = "timeout";
    /// Network or remote-service failure.
    pub const TRANSPORT: &str = "transport";
    /// The action panicked while running.
    pub const PANIC: &str = "panic";
    /// Invocation was cancelled.
    pub const CANCELLED: &str = "cancelled";

    /// Name not registered, or excluded by its configuration check.
    pub const UNKNOWN_ACTION: &str = "unknown_action";
    /// Raw arguments could not be parsed; a correction was requested.
    pub const MALFORMED_ARGUMENTS: &str = "malformed_arguments";
    /// Same signature already scheduled earlier in the round.
    pub const DUPLICATE: &str = "duplicate";
    /// More distinct signatures than the concurrency ceiling allows.
    pub const CEILING_EXCEEDED: &str = "ceiling_exceeded";
    /// Signature already succeeded earlier in the run.
    pub const ALREADY_COMPLETED: &str = "already_completed";
    /// Not executed because the run converged in the same round.
    pub const NOT_EXECUTED: &str = "not_executed";
    /// Finish request was rejected.
    pub const FINISH_REJECTED: &str = "finish_rejected";
}

/// Maximum length of a rendered outcome summary (bytes).
pub const SUMMARY_MAX_LEN: usize = 200;

/// Outcome of one action invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionOutcome {
    Success { value: serde_json::Value },
    Failure { message: String, kind: String },
}

impl ActionOutcome {
    pub fn success(value: impl Into<serde_json::Value>) -> Self {
        Self::Success {
            value: value.into(),
        }
    }

    pub fn failure(message: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
            kind: kind.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Success { value } => Some(value),
            Self::Failure { .. } => None,
        }
    }

    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(kind),
        }
    }

    /// Full text as shown to the decision-maker.
    ///
    /// String values are rendered bare, other JSON values compactly.
    pub fn render(&self) -> String {
        match self {
            Self::Success { value } => match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            },
            Self::Failure { message, kind } => format!("[{}] {}", kind, message),
        }
    }

    /// Bounded single-line rendering for events and logs.
    pub fn summary(&self) -> String {
        summarize(&self.render(), SUMMARY_MAX_LEN)
    }
}
