//! Decision requests

use crate::action::ActionDescriptor;
use crate::transcript::Transcript;
use serde::Serialize;

/// Everything the decision-maker is given for one round.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRequest {
    /// 1-based round number.
    pub round: usize,
    pub transcript: Transcript,
    /// Available actions plus the virtual finish action.
    pub available_actions: Vec<ActionDescriptor>,
    /// Note enumerating unavailable actions and why.
    pub system_note: Option<String>,
    pub model_selector: Option<String>,
}

impl DecisionRequest {
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.available_actions.iter().map(|a| a.name.as_str())
    }
}
