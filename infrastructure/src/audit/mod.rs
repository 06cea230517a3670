//! Audit infrastructure: persistent records of executed actions.
//!
//! Provides [`JsonlAuditRecorder`], a JSONL file writer that implements the
//! [`AuditRecorder`](converge_application::AuditRecorder) port.

mod jsonl;

pub use jsonl::JsonlAuditRecorder;
