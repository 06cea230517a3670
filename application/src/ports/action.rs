//! Action port
//!
//! One implementation per registered action. Actions are injected into the
//! use case at construction time; there is no global registry.

use async_trait::async_trait;
use converge_domain::{ActionDescriptor, ActionOutcome, Availability, failure_kind};
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Failure returned by an action invocation.
///
/// `kind` is an open classification string carried through to the
/// transcript and audit log untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ActionError {
    pub message: String,
    pub kind: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: kind.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(message, failure_kind::INVALID_ARGUMENT)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, failure_kind::NOT_FOUND)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(message, failure_kind::PERMISSION_DENIED)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(message, failure_kind::EXECUTION_FAILED)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(message, failure_kind::TIMEOUT)
    }

    pub fn cancelled() -> Self {
        Self::new("cancelled", failure_kind::CANCELLED)
    }

    /// Map an I/O error onto the closest failure kind.
    pub fn from_io(context: &str, error: &std::io::Error) -> Self {
        let message = format!("{}: {}", context, error);
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(message),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(message),
            std::io::ErrorKind::TimedOut => Self::timeout(message),
            std::io::ErrorKind::InvalidInput => Self::invalid_argument(message),
            _ => Self::execution_failed(message),
        }
    }
}

impl From<ActionError> for ActionOutcome {
    fn from(error: ActionError) -> Self {
        ActionOutcome::failure(error.message, error.kind)
    }
}

/// A named, side-effecting capability the decision-maker may request.
///
/// Implementations must tolerate concurrent invocation, including from
/// unrelated runs.
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn descriptor(&self) -> ActionDescriptor {
        ActionDescriptor::new(self.name(), self.description())
    }

    /// Run the action with its parsed argument object.
    async fn invoke(
        &self,
        arguments: Value,
        cancellation: &CancellationToken,
    ) -> Result<Value, ActionError>;

    /// Consulted once per run before the first round.
    ///
    /// Unavailable actions are not advertised and are listed, with the
    /// reason, in the system note of every decision request.
    async fn verify_configuration(&self) -> Availability {
        Availability::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_kinds() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(
            ActionError::from_io("read a.txt", &missing).kind,
            failure_kind::NOT_FOUND
        );

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
        let error = ActionError::from_io("read b.txt", &denied);
        assert_eq!(error.kind, failure_kind::PERMISSION_DENIED);
        assert_eq!(error.message, "read b.txt: no");
    }

    #[test]
    fn test_into_outcome_keeps_kind() {
        let outcome: ActionOutcome = ActionError::new("quota exceeded", "transport").into();
        assert_eq!(outcome, ActionOutcome::failure("quota exceeded", "transport"));
    }
}
