//! Argument repair protocol.
//!
//! Unparsable arguments are never invoked. Each occurrence consumes one
//! correction attempt from a budget shared by the whole run; the attempt
//! that reaches the budget is fatal.

use crate::action::ActionRequest;
use crate::core::error::ArgumentError;

/// Outcome of registering one malformed-arguments event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairVerdict {
    /// Ask the decision-maker to resubmit.
    Retry { attempt: u32, remaining: u32 },
    /// The budget is spent; the run must fail.
    Exhausted { attempts: u32 },
}

/// Run-global correction counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairLedger {
    budget: u32,
    attempts: u32,
}

impl RepairLedger {
    pub fn new(budget: u32) -> Self {
        Self {
            budget,
            attempts: 0,
        }
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Consume one correction attempt.
    pub fn record(&mut self) -> RepairVerdict {
        self.attempts += 1;
        self.verdict_for(self.attempts)
    }

    fn verdict_for(&self, attempt: u32) -> RepairVerdict {
        if attempt >= self.budget {
            RepairVerdict::Exhausted { attempts: attempt }
        } else {
            RepairVerdict::Retry {
                attempt,
                remaining: self.budget - attempt,
            }
        }
    }
}

/// Failure message for the result turn of a malformed request.
pub fn parse_failure_message(request: &ActionRequest, error: &ArgumentError) -> String {
    format!(
        "could not parse arguments for '{}': {}",
        request.name, error
    )
}

/// System turn asking the decision-maker to resubmit a request.
pub fn repair_instruction(request: &ActionRequest, error: &ArgumentError, remaining: u32) -> String {
    format!(
        "The arguments for request {} ({}) could not be parsed: {}. \
         Resubmit the request with arguments encoded as a single JSON object. \
         {} correction attempt(s) remain for this run.",
        request.id, request.name, error, remaining
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_of_three_fails_on_third_event() {
        let mut ledger = RepairLedger::new(3);
        assert_eq!(
            ledger.record(),
            RepairVerdict::Retry {
                attempt: 1,
                remaining: 2
            }
        );
        assert_eq!(
            ledger.record(),
            RepairVerdict::Retry {
                attempt: 2,
                remaining: 1
            }
        );
        assert_eq!(ledger.record(), RepairVerdict::Exhausted { attempts: 3 });
        assert_eq!(ledger.budget(), 3);
    }

    #[test]
    fn test_instruction_names_request() {
        let request = ActionRequest::new("call-7", "search", "{bad");
        let error = ArgumentError::Unparsable("expected value".to_string());
        let text = repair_instruction(&request, &error, 2);
        assert!(text.contains("call-7"));
        assert!(text.contains("search"));
        assert!(text.contains("2 correction attempt(s) remain"));
        assert!(parse_failure_message(&request, &error).contains("expected value"));
    }
}
