//! Application layer for converge
//!
//! This crate contains the orchestration use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::LoopParams;
pub use ports::{
    action::{Action, ActionError},
    audit_recorder::{AuditError, AuditRecorder, NoAuditRecorder},
    clock::{Clock, FixedClock, SystemClock},
    decision_client::{DecisionClient, DecisionError},
    run_observer::{NoRunObserver, RunObserver},
};
pub use use_cases::run_actions::{
    RunActionsUseCase, RunContext, RunError, RunOutput, StopReason,
};
