//! Scripted decision client
//!
//! Replays a fixed list of rounds from a JSON file. Useful for demos,
//! reproducible runs and end-to-end tests of the loop without a model.
//!
//! ```json
//! [
//!   { "text": "Looking around.",
//!     "actions": [{ "name": "glob_search", "arguments": { "pattern": "*.rs" } }] },
//!   { "actions": [{ "id": "r1", "name": "read_file", "arguments": "{\"path\":\"a.rs\"}" }],
//!     "finish": { "summary": "read it" } }
//! ]
//! ```
//!
//! Action ids default to `call-<round>-<index>` (both 1-based). Once the
//! script is exhausted every call returns an empty response, which stops
//! the run.

use super::error::{Result, ScriptError};
use async_trait::async_trait;
use converge_application::{DecisionClient, DecisionError};
use converge_domain::{ContentBlock, DecisionRequest, DecisionResponse, RawArguments};
use serde::Deserialize;
use std::path::Path;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const MODEL_NAME: &str = "scripted";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptedRound {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    actions: Vec<ScriptedAction>,
    #[serde(default)]
    finish: Option<ScriptedFinish>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptedAction {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    arguments: RawArguments,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ScriptedFinish {
    Flag(bool),
    Detailed {
        #[serde(default)]
        summary: Option<String>,
    },
}

impl ScriptedRound {
    fn to_response(&self, round: usize) -> DecisionResponse {
        let mut content = Vec::new();

        if let Some(text) = &self.text {
            content.push(ContentBlock::text(text.clone()));
        }

        for (index, action) in self.actions.iter().enumerate() {
            let id = action
                .id
                .clone()
                .unwrap_or_else(|| format!("call-{}-{}", round, index + 1));
            content.push(ContentBlock::action_use(
                id,
                action.name.clone(),
                action.arguments.clone(),
            ));
        }

        let finish_id = format!("call-{}-finish", round);
        match &self.finish {
            Some(ScriptedFinish::Flag(true)) => content.push(ContentBlock::finish(finish_id)),
            Some(ScriptedFinish::Detailed { summary }) => content.push(ContentBlock::Finish {
                id: finish_id.into(),
                summary: summary.clone(),
            }),
            Some(ScriptedFinish::Flag(false)) | None => {}
        }

        DecisionResponse::new(content).with_model(MODEL_NAME)
    }
}

/// Decision client that answers from a pre-recorded script.
pub struct ScriptedDecisionClient {
    rounds: Vec<ScriptedRound>,
    state: Mutex<ScriptState>,
}

#[derive(Default)]
struct ScriptState {
    cursor: usize,
    received: Vec<DecisionRequest>,
}

impl ScriptedDecisionClient {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let rounds: Vec<ScriptedRound> = serde_json::from_str(text)?;
        Ok(Self {
            rounds,
            state: Mutex::new(ScriptState::default()),
        })
    }

    /// Number of scripted rounds.
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Requests received so far, in call order.
    pub fn received(&self) -> Vec<DecisionRequest> {
        match self.state.lock() {
            Ok(state) => state.received.clone(),
            Err(poisoned) => poisoned.into_inner().received.clone(),
        }
    }
}

#[async_trait]
impl DecisionClient for ScriptedDecisionClient {
    async fn call(
        &self,
        request: &DecisionRequest,
        cancellation: &CancellationToken,
    ) -> std::result::Result<DecisionResponse, DecisionError> {
        if cancellation.is_cancelled() {
            return Err(DecisionError::Other("cancelled".to_string()));
        }

        let mut state = self
            .state
            .lock()
            .map_err(|_| DecisionError::Other("script state poisoned".to_string()))?;
        state.received.push(request.clone());

        let Some(round) = self.rounds.get(state.cursor) else {
            debug!("Script exhausted at round {}", request.round);
            return Ok(DecisionResponse::empty());
        };
        state.cursor += 1;

        Ok(round.to_response(request.round))
    }
}
