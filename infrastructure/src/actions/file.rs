//! File action: read_file

use super::{DISABLED_REASON, optional_u64, require_str, resolve_path};
use async_trait::async_trait;
use converge_application::{Action, ActionError};
use converge_domain::Availability;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

pub const READ_FILE: &str = "read_file";

/// Maximum file size to read (10 MB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

/// Read a text file, optionally a window of its lines.
///
/// Arguments: `path` (required), `offset` (0-indexed first line),
/// `limit` (maximum number of lines).
pub struct ReadFileAction {
    base_dir: PathBuf,
    enabled: bool,
}

impl ReadFileAction {
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
}

#[async_trait]
impl Action for ReadFileAction {
    fn name(&self) -> &str {
        READ_FILE
    }

    fn description(&self) -> &str {
        "Read the contents of a file. Arguments: path, offset? (first line, 0-indexed), limit? (max lines)"
    }

    async fn invoke(
        &self,
        arguments: Value,
        _cancellation: &CancellationToken,
    ) -> Result<Value, ActionError> {
        let path_str = require_str(&arguments, "path")?;
        let offset = optional_u64(&arguments, "offset")?.unwrap_or(0) as usize;
        let limit = optional_u64(&arguments, "limit")?.map(|l| l as usize);

        let path = resolve_path(&self.base_dir, path_str);

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| ActionError::from_io(&format!("cannot access {}", path_str), &e))?;

        if !metadata.is_file() {
            return Err(ActionError::invalid_argument(format!(
                "'{}' is not a file",
                path_str
            )));
        }

        if metadata.len() > MAX_READ_SIZE {
            return Err(ActionError::invalid_argument(format!(
                "File too large ({} bytes). Maximum size is {} bytes",
                metadata.len(),
                MAX_READ_SIZE
            )));
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ActionError::from_io(&format!("failed to read {}", path_str), &e))?;

        Ok(Value::String(slice_lines(content, offset, limit)))
    }

    async fn verify_configuration(&self) -> Availability {
        if self.enabled {
            Availability::Available
        } else {
            Availability::unavailable(DISABLED_REASON)
        }
    }
}

fn slice_lines(content: String, offset: usize, limit: Option<usize>) -> String {
    if offset == 0 && limit.is_none() {
        return content;
    }

    let lines: Vec<&str> = content.lines().collect();
    if offset >= lines.len() {
        return String::new();
    }
    let end = match limit {
        Some(l) => offset.saturating_add(l).min(lines.len()),
        None => lines.len(),
    };
    lines[offset..end].join("\n")
}
