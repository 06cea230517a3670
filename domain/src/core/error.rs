//! Domain error types

use thiserror::Error;

/// Errors raised while assembling the action catalog for a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Action '{0}' is registered more than once")]
    DuplicateAction(String),

    #[error("Action name '{0}' is reserved")]
    ReservedActionName(String),

    #[error("Action name must not be empty")]
    EmptyActionName,
}

/// Why a request's raw arguments could not be turned into structured data.
///
/// Produced by the canonicalizer and consumed by the repair protocol, which
/// feeds the message back to the decision-maker verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("arguments are not valid JSON: {0}")]
    Unparsable(String),

    #[error("arguments must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_display() {
        assert_eq!(
            DomainError::DuplicateAction("search".to_string()).to_string(),
            "Action 'search' is registered more than once"
        );
        assert_eq!(
            DomainError::ReservedActionName("finish".to_string()).to_string(),
            "Action name 'finish' is reserved"
        );
    }

    #[test]
    fn test_argument_error_display() {
        let err = ArgumentError::NotAnObject("array");
        assert_eq!(err.to_string(), "arguments must be a JSON object, got array");
        assert!(
            ArgumentError::Unparsable("EOF".to_string())
                .to_string()
                .starts_with("arguments are not valid JSON")
        );
    }
}
