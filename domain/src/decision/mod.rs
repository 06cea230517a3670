//! Decision domain module
//!
//! Request and response shapes exchanged with the decision-maker once per
//! round. The transport that carries them is an application-layer port.

pub mod request;
pub mod response;

pub use request::DecisionRequest;
pub use response::{ContentBlock, DecisionResponse};
