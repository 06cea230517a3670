//! Transcript entities

use crate::action::{ActionOutcome, ActionRequest, ActionRequestId};
use serde::{Deserialize, Serialize};

/// One entry of a run's transcript.
///
/// `at_ms` is taken from the run clock when the turn is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Turn {
    Human {
        content: String,
        at_ms: u64,
    },
    System {
        content: String,
        at_ms: u64,
    },
    /// What the decision-maker said and requested in one round.
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        requests: Vec<ActionRequest>,
        at_ms: u64,
    },
    /// Result of one action request, real or synthetic.
    ActionResult {
        request_id: ActionRequestId,
        action_name: String,
        outcome: ActionOutcome,
        at_ms: u64,
    },
}

impl Turn {
    pub fn human(content: impl Into<String>, at_ms: u64) -> Self {
        Self::Human {
            content: content.into(),
            at_ms,
        }
    }

    pub fn system(content: impl Into<String>, at_ms: u64) -> Self {
        Self::System {
            content: content.into(),
            at_ms,
        }
    }

    pub fn assistant(content: impl Into<String>, requests: Vec<ActionRequest>, at_ms: u64) -> Self {
        Self::Assistant {
            content: content.into(),
            requests,
            at_ms,
        }
    }

    pub fn action_result(
        request_id: impl Into<ActionRequestId>,
        action_name: impl Into<String>,
        outcome: ActionOutcome,
        at_ms: u64,
    ) -> Self {
        Self::ActionResult {
            request_id: request_id.into(),
            action_name: action_name.into(),
            outcome,
            at_ms,
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Self::Human { .. } => "human",
            Self::System { .. } => "system",
            Self::Assistant { .. } => "assistant",
            Self::ActionResult { .. } => "action_result",
        }
    }

    pub fn at_ms(&self) -> u64 {
        match self {
            Self::Human { at_ms, .. }
            | Self::System { at_ms, .. }
            | Self::Assistant { at_ms, .. }
            | Self::ActionResult { at_ms, .. } => *at_ms,
        }
    }

    /// Returns the outcome if this is an `ActionResult` turn.
    pub fn as_action_result(&self) -> Option<(&ActionRequestId, &str, &ActionOutcome)> {
        match self {
            Self::ActionResult {
                request_id,
                action_name,
                outcome,
                ..
            } => Some((request_id, action_name, outcome)),
            _ => None,
        }
    }

    /// Text body of the turn, with action results rendered.
    pub fn text(&self) -> String {
        match self {
            Self::Human { content, .. } | Self::System { content, .. } => content.clone(),
            Self::Assistant {
                content, requests, ..
            } => {
                let calls: Vec<String> = requests.iter().map(|r| r.describe()).collect();
                match (content.is_empty(), calls.is_empty()) {
                    (_, true) => content.clone(),
                    (true, false) => calls.join(", "),
                    (false, false) => format!("{}\n{}", content, calls.join(", ")),
                }
            }
            Self::ActionResult { outcome, .. } => outcome.render(),
        }
    }
}

/// Append-only conversation record of a run.
///
/// Seeded by the caller and grown only by the orchestration loop. There is
/// no removal API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns appended after the first `len` ones.
    pub fn since(&self, len: usize) -> &[Turn] {
        self.turns.get(len..).unwrap_or(&[])
    }
}

impl From<Vec<Turn>> for Transcript {
    fn from(turns: Vec<Turn>) -> Self {
        Self { turns }
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
