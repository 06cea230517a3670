//! Built-in action configuration from TOML (`[actions]` section)

use crate::actions::{BuiltinActions, DEFAULT_COMMAND_TIMEOUT_SECS};
use converge_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw built-in action settings from TOML
///
/// # Example
///
/// ```toml
/// [actions]
/// read_file = true
/// glob_search = true
/// run_command = false        # shell access is opt-in
/// working_dir = "."
/// command_timeout_secs = 60
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileActionsConfig {
    pub read_file: bool,
    pub glob_search: bool,
    pub run_command: bool,
    /// Base for relative paths; defaults to the current directory.
    pub working_dir: Option<PathBuf>,
    pub command_timeout_secs: u64,
}

impl Default for FileActionsConfig {
    fn default() -> Self {
        Self {
            read_file: true,
            glob_search: true,
            run_command: false,
            working_dir: None,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }
}

impl FileActionsConfig {
    pub fn to_builtin_actions(&self) -> BuiltinActions {
        let working_dir = self
            .working_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        BuiltinActions::new(working_dir)
            .with_read_file(self.read_file)
            .with_glob_search(self.glob_search)
            .with_run_command(self.run_command)
            .with_command_timeout(Duration::from_secs(self.command_timeout_secs))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if !self.read_file && !self.glob_search && !self.run_command {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoActionsEnabled,
                "all built-in actions are disabled: only finish can be requested",
            ));
        }
        if self.run_command && self.command_timeout_secs == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroCommandTimeout,
                "actions.command_timeout_secs is 0: every command will time out",
            ));
        }

        issues
    }
}
