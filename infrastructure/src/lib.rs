//! Infrastructure layer for converge
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod actions;
pub mod audit;
pub mod config;
pub mod decision;

// Re-export commonly used types
pub use actions::{BuiltinActions, GlobSearchAction, ReadFileAction, RunCommandAction};
pub use audit::JsonlAuditRecorder;
pub use config::{
    ConfigLoader, FileActionsConfig, FileAuditConfig, FileConfig, FileOutputConfig, FileRunConfig,
};
pub use decision::{ScriptError, ScriptedDecisionClient};
