//! Action domain entities

use serde::{Deserialize, Serialize};

/// Identifier the decision-maker assigned to a single action request.
///
/// Used to correlate result turns with the request that produced them. It
/// never participates in signature equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionRequestId(String);

impl ActionRequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActionRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: Into<String>> From<T> for ActionRequestId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

/// Arguments exactly as the decision-maker sent them.
///
/// Some providers deliver tool arguments as a JSON-encoded string, others as
/// structured JSON. Both shapes are accepted here and only normalized by
/// [`Signature::canonicalize`](super::signature::Signature::canonicalize).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawArguments {
    /// JSON text that still has to be parsed.
    Encoded(String),
    /// Already-structured JSON.
    Structured(serde_json::Value),
}

impl RawArguments {
    /// Empty structured arguments (`{}`).
    pub fn empty() -> Self {
        Self::Structured(serde_json::Value::Object(serde_json::Map::new()))
    }

    /// Short single-line rendering for logs and assistant turns.
    pub fn preview(&self) -> String {
        match self {
            Self::Encoded(text) => text.clone(),
            Self::Structured(value) => value.to_string(),
        }
    }
}

impl Default for RawArguments {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<serde_json::Value> for RawArguments {
    fn from(value: serde_json::Value) -> Self {
        Self::Structured(value)
    }
}

impl From<&str> for RawArguments {
    fn from(text: &str) -> Self {
        Self::Encoded(text.to_string())
    }
}

impl From<String> for RawArguments {
    fn from(text: String) -> Self {
        Self::Encoded(text)
    }
}

/// A request from the decision-maker to run one named action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub id: ActionRequestId,
    pub name: String,
    #[serde(rename = "arguments", default)]
    pub raw_arguments: RawArguments,
}

impl ActionRequest {
    pub fn new(
        id: impl Into<ActionRequestId>,
        name: impl Into<String>,
        raw_arguments: impl Into<RawArguments>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            raw_arguments: raw_arguments.into(),
        }
    }

    /// `name(arguments)` rendering used in transcript text.
    pub fn describe(&self) -> String {
        format!("{}({})", self.name, self.raw_arguments.preview())
    }
}

/// Name and description of an action, as advertised to the decision-maker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub name: String,
    pub description: String,
}

impl ActionDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Result of an action's configuration check, taken once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Availability {
    Available,
    Unavailable { reason: String },
}

impl Availability {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}
