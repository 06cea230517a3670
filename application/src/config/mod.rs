//! Application-level configuration.
//!
//! - [`LoopParams`]: round budget, concurrency ceiling, correction budget
//!   and failure limit of the orchestration loop

pub mod loop_params;

pub use loop_params::LoopParams;
