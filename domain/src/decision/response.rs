//! Decision-maker responses.
//!
//! A response is an ordered list of content blocks. Finishing is its own
//! block variant rather than an action with a reserved name, so the loop
//! never has to special-case a string to recognise it.
//!
//! ```text
//! DecisionResponse
//! ├── Text { "Looking it up." }
//! ├── ActionUse { id: "call-1", name: "search", arguments: {"q": "x"} }
//! └── Finish { id: "call-2", summary: None }
//! ```

use crate::action::{ActionRequest, ActionRequestId, FINISH_ACTION, RawArguments};
use serde::{Deserialize, Serialize};

/// A single block of content within a decision response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    /// Request to run a named action.
    ActionUse {
        id: ActionRequestId,
        name: String,
        #[serde(default)]
        arguments: RawArguments,
    },
    /// Request to end the run.
    Finish {
        id: ActionRequestId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        summary: Option<String>,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Build an action-use block, mapping the advertised finish name onto
    /// [`ContentBlock::Finish`].
    ///
    /// Adapters call this at the boundary so that the rest of the system
    /// only ever sees the tagged variant.
    pub fn action_use(
        id: impl Into<ActionRequestId>,
        name: impl Into<String>,
        arguments: impl Into<RawArguments>,
    ) -> Self {
        let name = name.into();
        if name == FINISH_ACTION {
            let summary = match arguments.into() {
                RawArguments::Structured(value) => value
                    .get("summary")
                    .and_then(|s| s.as_str())
                    .map(str::to_string),
                RawArguments::Encoded(text) => serde_json::from_str::<serde_json::Value>(&text)
                    .ok()
                    .and_then(|v| v.get("summary").and_then(|s| s.as_str()).map(str::to_string)),
            };
            return Self::Finish {
                id: id.into(),
                summary,
            };
        }
        Self::ActionUse {
            id: id.into(),
            name,
            arguments: arguments.into(),
        }
    }

    pub fn finish(id: impl Into<ActionRequestId>) -> Self {
        Self::Finish {
            id: id.into(),
            summary: None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// One round's answer from the decision-maker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub content: Vec<ContentBlock>,
    /// Model that produced the response, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl DecisionResponse {
    /// A response with no content at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            model: None,
        }
    }

    pub fn new(content: Vec<ContentBlock>) -> Self {
        Self {
            content,
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Concatenate all text blocks.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Action requests in the order they were emitted.
    pub fn action_requests(&self) -> Vec<ActionRequest> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ActionUse {
                    id,
                    name,
                    arguments,
                } => Some(ActionRequest::new(id.clone(), name.clone(), arguments.clone())),
                _ => None,
            })
            .collect()
    }

    /// Id of the first finish block, if the response asks to finish.
    ///
    /// Repeated finish blocks collapse into the first one.
    pub fn finish_request(&self) -> Option<(&ActionRequestId, Option<&str>)> {
        self.content.iter().find_map(|b| match b {
            ContentBlock::Finish { id, summary } => Some((id, summary.as_deref())),
            _ => None,
        })
    }

    pub fn finish_requested(&self) -> bool {
        self.finish_request().is_some()
    }

    /// No action requests, no finish intent and no non-blank text.
    pub fn is_empty(&self) -> bool {
        !self.finish_requested()
            && !self
                .content
                .iter()
                .any(|b| matches!(b, ContentBlock::ActionUse { .. }))
            && self.text_content().trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_response() {
        assert!(DecisionResponse::empty().is_empty());
        assert!(DecisionResponse::from_text("  \n").is_empty());
        assert!(!DecisionResponse::from_text("done").is_empty());
        assert!(!DecisionResponse::new(vec![ContentBlock::finish("f")]).is_empty());
    }

    #[test]
    fn test_finish_name_becomes_finish_block() {
        let block = ContentBlock::action_use("f", "finish", json!({"summary": "all set"}));
        assert_eq!(
            block,
            ContentBlock::Finish {
                id: "f".into(),
                summary: Some("all set".to_string())
            }
        );

        let encoded = ContentBlock::action_use("f", "finish", "not json");
        assert_eq!(encoded, ContentBlock::finish("f"));
    }

    #[test]
    fn test_action_requests_preserve_order() {
        let response = DecisionResponse::new(vec![
            ContentBlock::text("Working. "),
            ContentBlock::action_use("1", "b", json!({})),
            ContentBlock::text("Still working."),
            ContentBlock::action_use("2", "a", "{\"x\":1}"),
            ContentBlock::finish("3"),
        ]);

        let names: Vec<String> = response.action_requests().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(response.text_content(), "Working. Still working.");
        assert_eq!(response.finish_request().map(|(id, _)| id.as_str()), Some("3"));
    }

    #[test]
    fn test_deserialize_content_blocks() {
        let response: DecisionResponse = serde_json::from_value(json!({
            "content": [
                {"type": "text", "text": "hi"},
                {"type": "action_use", "id": "1", "name": "search", "arguments": "{\"q\":\"x\"}"},
                {"type": "finish", "id": "2"}
            ]
        }))
        .unwrap();
        assert_eq!(response.action_requests().len(), 1);
        assert!(response.finish_requested());
    }
}
