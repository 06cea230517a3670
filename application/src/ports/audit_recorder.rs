//! Port for recording executed action results.
//!
//! Separate from `tracing`-based diagnostics: tracing carries
//! human-readable operation logs, while this port captures every executed
//! action outcome in a machine-readable form (e.g. JSONL).

use converge_domain::{ActionOutcome, RunId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Audit recorder unavailable: {0}")]
    Unavailable(String),
}

/// Records one entry per executed, non-duplicate action.
///
/// Called right after the outcome is known. Errors are logged by the loop
/// and never abort the run.
pub trait AuditRecorder: Send + Sync {
    fn record_action_result(
        &self,
        run_id: &RunId,
        action_name: &str,
        outcome: &ActionOutcome,
    ) -> Result<(), AuditError>;
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditRecorder;

impl AuditRecorder for NoAuditRecorder {
    fn record_action_result(
        &self,
        _run_id: &RunId,
        _action_name: &str,
        _outcome: &ActionOutcome,
    ) -> Result<(), AuditError> {
        Ok(())
    }
}
