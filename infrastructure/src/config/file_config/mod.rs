//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! (`LoopParams`, `BuiltinActions`) by the binary.

mod actions;
mod audit;
mod output;
mod run;

pub use actions::FileActionsConfig;
pub use audit::FileAuditConfig;
pub use output::FileOutputConfig;
pub use run::FileRunConfig;

use converge_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Loop limits and model selection
    pub run: FileRunConfig,
    /// Built-in action toggles
    pub actions: FileActionsConfig,
    /// JSONL audit log
    pub audit: FileAuditConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.run.validate();
        issues.extend(self.actions.validate());
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use converge_domain::{ConfigIssueCode, OutputFormat};
    use std::path::PathBuf;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[run]
max_rounds = 6
concurrency = 2
correction_budget = 5
failure_limit = 2
model = "gpt-5.2-codex"

[actions]
run_command = true
working_dir = "/srv/work"
command_timeout_secs = 30

[audit]
jsonl_path = "/tmp/converge.jsonl"

[output]
format = "json"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.run.max_rounds, 6);
        assert_eq!(config.run.concurrency, 2);
        assert_eq!(config.run.model.as_deref(), Some("gpt-5.2-codex"));
        assert!(config.actions.run_command);
        assert!(config.actions.read_file);
        assert_eq!(config.actions.working_dir, Some(PathBuf::from("/srv/work")));
        assert_eq!(config.actions.command_timeout_secs, 30);
        assert_eq!(
            config.audit.jsonl_path,
            Some(PathBuf::from("/tmp/converge.jsonl"))
        );
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[run]
max_rounds = 3
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.run.max_rounds, 3);
        // Defaults should apply
        assert_eq!(config.run.concurrency, 4);
        assert!(!config.actions.run_command);
        assert!(config.audit.jsonl_path.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_all_sections() {
        let toml_str = r#"
[run]
failure_limit = 0

[actions]
read_file = false
glob_search = false
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let codes: Vec<_> = config.validate().iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![ConfigIssueCode::ZeroFailureLimit, ConfigIssueCode::NoActionsEnabled]
        );
    }
}
