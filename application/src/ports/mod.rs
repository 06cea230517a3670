//! Port definitions (interfaces for external dependencies)

pub mod action;
pub mod audit_recorder;
pub mod clock;
pub mod decision_client;
pub mod run_observer;
