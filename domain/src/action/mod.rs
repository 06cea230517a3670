//! Action domain module
//!
//! Actions are the named, side-effecting capabilities a decision-maker may
//! request. This module holds their pure definitions:
//!
//! ```text
//! ┌───────────────┐   canonicalize   ┌─────────────┐   invoke   ┌───────────────┐
//! │ ActionRequest │ ───────────────▶ │  Signature  │ ─────────▶ │ ActionOutcome │
//! │ (raw args)    │                  │ (dedup key) │            │ (result)      │
//! └───────────────┘                  └─────────────┘            └───────────────┘
//! ```
//!
//! - [`ActionRequest`]: what the decision-maker asked for, arguments unparsed
//! - [`Signature`]: canonical `(name, arguments)` identity
//! - [`ActionOutcome`]: `Success(value)` or `Failure(message, kind)`
//! - [`ActionCatalog`]: which actions are registered and available this run
//!
//! Invocation itself is an application-layer port (`Action`).

pub mod catalog;
pub mod entities;
pub mod signature;
pub mod value_objects;

pub use catalog::{ActionCatalog, FINISH_ACTION};
pub use entities::{ActionDescriptor, ActionRequest, ActionRequestId, Availability, RawArguments};
pub use signature::Signature;
pub use value_objects::{ActionOutcome, failure_kind};
