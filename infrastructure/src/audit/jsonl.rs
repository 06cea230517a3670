//! JSONL file writer for executed action results.
//!
//! Each recorded result becomes one JSON line:
//!
//! ```json
//! {"type":"action_result","timestamp":"2026-01-01T00:00:00.000Z","run_id":"run-...","action":"read_file","success":true,"value":"..."}
//! {"type":"action_result","timestamp":"...","run_id":"run-...","action":"run_command","success":false,"message":"...","kind":"timeout"}
//! ```

use converge_application::ports::audit_recorder::{AuditError, AuditRecorder};
use converge_domain::{ActionOutcome, RunId};
use serde_json::{Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// JSONL audit recorder that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record and
/// on `Drop`.
pub struct JsonlAuditRecorder {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditRecorder {
    /// Open (or create) the audit file at `path` for appending.
    ///
    /// Parent directories are created as needed.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the audit file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(run_id: &RunId, action_name: &str, outcome: &ActionOutcome) -> Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let mut record = json!({
            "type": "action_result",
            "timestamp": timestamp,
            "run_id": run_id.as_str(),
            "action": action_name,
            "success": outcome.is_success(),
        });
        if let Value::Object(map) = &mut record {
            match outcome {
                ActionOutcome::Success { value } => {
                    map.insert("value".to_string(), value.clone());
                }
                ActionOutcome::Failure { message, kind } => {
                    map.insert("message".to_string(), Value::String(message.clone()));
                    map.insert("kind".to_string(), Value::String(kind.clone()));
                }
            }
        }
        record
    }
}

impl AuditRecorder for JsonlAuditRecorder {
    fn record_action_result(
        &self,
        run_id: &RunId,
        action_name: &str,
        outcome: &ActionOutcome,
    ) -> Result<(), AuditError> {
        let line = serde_json::to_string(&Self::record(run_id, action_name, outcome))
            .map_err(|e| AuditError::Serialization(e.to_string()))?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| AuditError::Unavailable("audit writer lock poisoned".to_string()))?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlAuditRecorder {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
