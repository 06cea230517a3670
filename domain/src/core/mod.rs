//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: catalog assembly errors
//! - [`error::ArgumentError`]: raw argument parse failures
//! - [`string`]: summary rendering helpers

pub mod error;
pub mod string;
