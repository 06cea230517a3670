//! Built-in actions: read_file, glob_search, run_command
//!
//! Each action implements the [`Action`] port. Relative paths are resolved
//! against the configured working directory, so the same action set behaves
//! identically no matter where the binary was started.

mod command;
mod file;
mod search;

pub use command::{RUN_COMMAND, RunCommandAction};
pub use file::{READ_FILE, ReadFileAction};
pub use search::{GLOB_SEARCH, GlobSearchAction};

use converge_application::{Action, ActionError};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Default timeout for run_command (60 seconds)
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 60;

/// Which built-in actions are enabled and how they are configured.
#[derive(Debug, Clone)]
pub struct BuiltinActions {
    working_dir: PathBuf,
    read_file: bool,
    glob_search: bool,
    run_command: bool,
    command_timeout: Duration,
}

impl Default for BuiltinActions {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            read_file: true,
            glob_search: true,
            run_command: false,
            command_timeout: Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS),
        }
    }
}

impl BuiltinActions {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_read_file(mut self, enabled: bool) -> Self {
        self.read_file = enabled;
        self
    }

    pub fn with_glob_search(mut self, enabled: bool) -> Self {
        self.glob_search = enabled;
        self
    }

    pub fn with_run_command(mut self, enabled: bool) -> Self {
        self.run_command = enabled;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Build the action set.
    ///
    /// Disabled actions are still registered; they report themselves as
    /// unavailable from `verify_configuration`, so the decision-maker is
    /// told why they cannot be used.
    pub fn build(&self) -> Vec<Arc<dyn Action>> {
        vec![
            Arc::new(ReadFileAction::new(&self.working_dir).with_enabled(self.read_file)),
            Arc::new(GlobSearchAction::new(&self.working_dir).with_enabled(self.glob_search)),
            Arc::new(
                RunCommandAction::new(&self.working_dir)
                    .with_enabled(self.run_command)
                    .with_default_timeout(self.command_timeout),
            ),
        ]
    }
}

const DISABLED_REASON: &str = "disabled by configuration";

fn require_str<'a>(arguments: &'a Value, key: &str) -> Result<&'a str, ActionError> {
    match arguments.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(ActionError::invalid_argument(format!(
            "'{}' must be a string, got {}",
            key, other
        ))),
        None => Err(ActionError::invalid_argument(format!(
            "missing required argument '{}'",
            key
        ))),
    }
}

fn optional_str<'a>(arguments: &'a Value, key: &str) -> Result<Option<&'a str>, ActionError> {
    match arguments.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => require_str(arguments, key).map(Some),
    }
}

fn optional_u64(arguments: &Value, key: &str) -> Result<Option<u64>, ActionError> {
    match arguments.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            ActionError::invalid_argument(format!(
                "'{}' must be a non-negative integer, got {}",
                key, value
            ))
        }),
    }
}

fn resolve_path(base: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use converge_domain::Availability;
    use serde_json::json;

    #[test]
    fn test_require_str() {
        let args = json!({"path": "a.txt", "n": 3});
        assert_eq!(require_str(&args, "path").unwrap(), "a.txt");

        let missing = require_str(&args, "other").unwrap_err();
        assert_eq!(missing.kind, "invalid_argument");
        assert!(missing.message.contains("missing required argument 'other'"));

        let wrong = require_str(&args, "n").unwrap_err();
        assert!(wrong.message.contains("must be a string"));
    }

    #[test]
    fn test_optional_u64() {
        let args = json!({"limit": 5, "offset": null, "bad": -1});
        assert_eq!(optional_u64(&args, "limit").unwrap(), Some(5));
        assert_eq!(optional_u64(&args, "offset").unwrap(), None);
        assert_eq!(optional_u64(&args, "absent").unwrap(), None);
        assert!(optional_u64(&args, "bad").is_err());
    }

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/work");
        assert_eq!(resolve_path(base, "src/lib.rs"), PathBuf::from("/work/src/lib.rs"));
        assert_eq!(resolve_path(base, "/etc/hosts"), PathBuf::from("/etc/hosts"));
    }

    #[tokio::test]
    async fn test_builtin_set_names_and_toggles() {
        let actions = BuiltinActions::new(".")
            .with_glob_search(false)
            .with_run_command(false)
            .build();

        let names: Vec<&str> = actions.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec![READ_FILE, GLOB_SEARCH, RUN_COMMAND]);

        assert!(actions[0].verify_configuration().await.is_available());
        assert_eq!(
            actions[1].verify_configuration().await,
            Availability::unavailable(DISABLED_REASON)
        );
        assert!(!actions[2].verify_configuration().await.is_available());
    }
}
