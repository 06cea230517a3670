//! Domain layer for converge
//!
//! This crate contains the pure types and decision logic of the action
//! orchestration loop. It has no dependencies on infrastructure or
//! presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Round
//!
//! A run proceeds in rounds. Each round the decision-maker answers with a
//! [`DecisionResponse`]: free text, zero or more action requests and
//! optionally a finish intent.
//!
//! ## Signature
//!
//! Every request is canonicalized into a [`Signature`] before anything else
//! happens. Signatures are the unit of deduplication within a round and of
//! convergence detection across rounds.
//!
//! ## Gate, repair and finish
//!
//! - [`RoundPlan`] decides which requests execute and which get a synthetic
//!   result (duplicate, already completed, ceiling exceeded, unknown,
//!   malformed).
//! - [`RepairLedger`] bounds how often malformed arguments may be corrected.
//! - [`FinishEvaluator`] accepts or rejects the virtual finish action.

pub mod action;
pub mod config;
pub mod core;
pub mod decision;
pub mod run;
pub mod transcript;

// Re-export commonly used types
pub use action::{
    ActionCatalog, ActionDescriptor, ActionOutcome, ActionRequest, ActionRequestId, Availability,
    FINISH_ACTION, RawArguments, Signature, failure_kind,
};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::error::{ArgumentError, DomainError};
pub use decision::{ContentBlock, DecisionRequest, DecisionResponse};
pub use run::{
    BatchResult, Disposition, FinishEvaluator, FinishReason, FinishVerdict, PlannedRequest,
    RepairLedger, RepairVerdict, RoundPlan, RunEvent, RunId, RunState,
};
pub use transcript::{Transcript, Turn};
