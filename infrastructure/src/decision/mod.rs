//! Decision client adapters

mod error;
mod scripted;

pub use error::{Result, ScriptError};
pub use scripted::ScriptedDecisionClient;
