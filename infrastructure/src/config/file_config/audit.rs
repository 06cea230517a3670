//! Audit configuration from TOML (`[audit]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw audit configuration from TOML
///
/// ```toml
/// [audit]
/// jsonl_path = "~/.local/share/converge/audit.jsonl"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    /// Append one JSON line per action result here. Unset disables auditing.
    pub jsonl_path: Option<PathBuf>,
}

impl FileAuditConfig {
    /// Configured path with a leading `~/` expanded to the home directory.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        let path = self.jsonl_path.as_ref()?;
        match path.strip_prefix("~") {
            Ok(rest) => dirs::home_dir().map(|home| home.join(rest)),
            Err(_) => Some(path.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_by_default() {
        assert!(FileAuditConfig::default().resolved_path().is_none());
    }

    #[test]
    fn test_plain_path_kept() {
        let config = FileAuditConfig {
            jsonl_path: Some(PathBuf::from("/var/log/converge.jsonl")),
        };
        assert_eq!(
            config.resolved_path(),
            Some(PathBuf::from("/var/log/converge.jsonl"))
        );
    }

    #[test]
    fn test_home_expanded() {
        let config = FileAuditConfig {
            jsonl_path: Some(PathBuf::from("~/audit.jsonl")),
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.resolved_path(), Some(home.join("audit.jsonl")));
        }
    }
}
