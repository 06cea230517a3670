//! Search action: glob_search

use super::{DISABLED_REASON, optional_u64, require_str};
use async_trait::async_trait;
use converge_application::{Action, ActionError};
use converge_domain::Availability;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

pub const GLOB_SEARCH: &str = "glob_search";

/// Maximum number of results to return
const MAX_RESULTS: usize = 1000;

pub struct GlobSearchAction {
    base_dir: PathBuf,
    enabled: bool,
}

impl GlobSearchAction {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            enabled: true,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    fn full_pattern(&self, pattern: &str) -> String {
        if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            format!("{}/{}", self.base_dir.display(), pattern)
        }
    }

    /// Paths are reported relative to the base directory when possible.
    fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.base_dir)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

#[async_trait]
impl Action for GlobSearchAction {
    fn name(&self) -> &str {
        GLOB_SEARCH
    }

    fn description(&self) -> &str {
        "Find files matching a glob pattern (e.g. '**/*.rs'). Arguments: pattern, limit?"
    }

    async fn invoke(
        &self,
        arguments: Value,
        _cancellation: &CancellationToken,
    ) -> Result<Value, ActionError> {
        let pattern = require_str(&arguments, "pattern")?;
        let limit = optional_u64(&arguments, "limit")?
            .map(|n| n as usize)
            .unwrap_or(MAX_RESULTS)
            .min(MAX_RESULTS);

        let entries = glob::glob(&self.full_pattern(pattern)).map_err(|e| {
            ActionError::invalid_argument(format!("Invalid glob pattern: {}", e))
        })?;

        let mut matches = Vec::new();
        let mut unreadable = 0usize;
        let mut truncated = false;

        for entry in entries {
            match entry {
                Ok(path) => {
                    if matches.len() >= limit {
                        truncated = true;
                        break;
                    }
                    matches.push(self.display_path(&path));
                }
                Err(_) => unreadable += 1,
            }
        }

        Ok(json!({
            "matches": matches,
            "truncated": truncated,
            "unreadable": unreadable,
        }))
    }

    async fn verify_configuration(&self) -> Availability {
        if self.enabled {
            Availability::Available
        } else {
            Availability::unavailable(DISABLED_REASON)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_glob_search_basic() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "1").unwrap();
        fs::write(dir.path().join("b.txt"), "2").unwrap();
        fs::write(dir.path().join("c.md"), "3").unwrap();

        let action = GlobSearchAction::new(dir.path());
        let value = action
            .invoke(json!({"pattern": "*.txt"}), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(value["matches"], json!(["a.txt", "b.txt"]));
        assert_eq!(value["truncated"], json!(false));
    }

    #[tokio::test]
    async fn test_glob_search_limit() {
        let dir = tempdir().unwrap();
        for name in ["1.log", "2.log", "3.log"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let action = GlobSearchAction::new(dir.path());
        let value = action
            .invoke(json!({"pattern": "*.log", "limit": 2}), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(value["matches"].as_array().unwrap().len(), 2);
        assert_eq!(value["truncated"], json!(true));
    }

    #[tokio::test]
    async fn test_glob_search_no_matches() {
        let dir = tempdir().unwrap();
        let action = GlobSearchAction::new(dir.path());
        let value = action
            .invoke(json!({"pattern": "*.xyz"}), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(value["matches"], json!([]));
    }

    #[tokio::test]
    async fn test_glob_search_invalid_pattern() {
        let action = GlobSearchAction::new(".");
        let error = action
            .invoke(json!({"pattern": "[unclosed"}), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(error.kind, "invalid_argument");
    }
}
